//! # Object storage
//!
//! Abstract capability over the object store holding videos and transcripts,
//! plus reading content through a signed URL.
//! Implementations: `gcs` signs with a service-account key, `s3` talks to
//! any S3-compatible API with an HMAC key pair.

pub mod gcs;
#[cfg(feature = "vendor-s3")]
pub mod s3;

pub use gcs::{GcsObjectStorage, ServiceAccountSigner};
#[cfg(feature = "vendor-s3")]
pub use s3::S3ObjectStorage;

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use transcript_qc_core::StorageObjectRef;

use crate::error::GatewayError;

/// Time-limited URL permitting a read of one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAccessGrant {
    /// Signed URL
    pub url: String,
    /// When the URL stops working
    pub expires_at: DateTime<Utc>,
}

impl SignedAccessGrant {
    /// Grant for `url` valid for `ttl` from now.
    pub fn expiring_in(url: String, ttl: Duration) -> Result<Self, GatewayError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| GatewayError::AccessGrant(format!("grant lifetime out of range: {e}")))?;
        Ok(Self {
            url,
            expires_at: Utc::now() + ttl,
        })
    }
}

/// Metadata attached to a saved corrected transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Video identifier exactly as the client sent it
    pub original_video_id: String,
    /// Save time
    pub last_modified: DateTime<Utc>,
}

impl ObjectMetadata {
    /// Metadata entries (`originalVideoId`, `lastModified`). Header-based
    /// backends send the names lower-cased.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (
                "originalVideoId".to_string(),
                self.original_video_id.clone(),
            ),
            (
                "lastModified".to_string(),
                self.last_modified
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        ])
    }
}

/// Result of reading through a signed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchedContent {
    /// The object body
    Found(String),
    /// Storage answered with a non-success status (HTTP status code)
    Missing(u16),
}

/// Object storage interface.
///
/// Backed by Cloud Storage with a service-account key, or by any
/// S3-compatible store (AWS S3, MinIO, ...) with an HMAC key pair.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Issues a signed read URL for `object` valid for `ttl`.
    ///
    /// Does not check that the object exists; a missing object shows up when
    /// the URL is used.
    async fn grant_read(
        &self,
        object: &StorageObjectRef,
        ttl: Duration,
    ) -> Result<SignedAccessGrant, GatewayError>;

    /// Stores `content` as `text/plain` at `object`, replacing any existing
    /// object unconditionally.
    async fn write_content(
        &self,
        object: &StorageObjectRef,
        content: &str,
        metadata: &ObjectMetadata,
    ) -> Result<(), GatewayError>;
}

/// Reads an object through a signed URL.
///
/// A non-success status is reported as [`FetchedContent::Missing`] so
/// callers can tell "not there" apart from a transport failure.
pub async fn fetch_content(
    client: &reqwest::Client,
    grant: &SignedAccessGrant,
) -> Result<FetchedContent, GatewayError> {
    let response = client
        .get(&grant.url)
        .send()
        .await
        .map_err(|e| GatewayError::Backend(format!("HTTP request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Ok(FetchedContent::Missing(status.as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| GatewayError::Backend(format!("failed to read response body: {e}")))?;
    Ok(FetchedContent::Found(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_metadata_map() {
        let metadata = ObjectMetadata {
            original_video_id: "4003 c1 t1".to_string(),
            last_modified: Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap(),
        };
        let map = metadata.to_map();
        assert_eq!(map["originalVideoId"], "4003 c1 t1");
        assert_eq!(map["lastModified"], "2024-03-05T14:07:09.000Z");
    }

    #[test]
    fn test_grant_expiry() {
        let before = Utc::now();
        let grant = SignedAccessGrant::expiring_in(
            "http://storage/obj".to_string(),
            Duration::from_secs(900),
        )
        .unwrap();
        let lifetime = grant.expires_at - before;
        assert!(lifetime >= chrono::Duration::seconds(899));
        assert!(lifetime <= chrono::Duration::seconds(901));
    }

    #[tokio::test]
    async fn test_fetch_distinguishes_missing_from_unreachable() {
        let storage = crate::endpoints::test_helpers::MockObjectStorage::start().await;
        storage.insert("tb", "mcnulty/T1/4003/C1", "hello").await;
        let client = reqwest::Client::new();

        let found = storage
            .grant_read(
                &StorageObjectRef {
                    bucket: "tb".to_string(),
                    key: "mcnulty/T1/4003/C1".to_string(),
                },
                Duration::from_secs(60),
            )
            .await
            .unwrap();
        assert_eq!(
            fetch_content(&client, &found).await.unwrap(),
            FetchedContent::Found("hello".to_string())
        );

        let missing = storage
            .grant_read(
                &StorageObjectRef {
                    bucket: "tb".to_string(),
                    key: "corrected/T1/4003/C1".to_string(),
                },
                Duration::from_secs(60),
            )
            .await
            .unwrap();
        assert_eq!(
            fetch_content(&client, &missing).await.unwrap(),
            FetchedContent::Missing(404)
        );

        let unreachable = SignedAccessGrant {
            url: "http://127.0.0.1:1/nothing".to_string(),
            expires_at: Utc::now(),
        };
        assert!(matches!(
            fetch_content(&client, &unreachable).await,
            Err(GatewayError::Backend(_))
        ));
    }
}
