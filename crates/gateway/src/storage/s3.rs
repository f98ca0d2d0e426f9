//! # S3-compatible object storage
//!
//! Implementation over any S3-compatible API, used when the gateway is
//! configured with an HMAC key pair (Cloud Storage interoperability keys,
//! MinIO for local development).

use std::collections::HashMap;
use std::time::Duration;

use transcript_qc_core::StorageObjectRef;

use super::{ObjectMetadata, ObjectStorage, SignedAccessGrant};
use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// Object storage backed by pre-built S3 bucket handles.
pub struct S3ObjectStorage {
    /// Bucket handles by bucket name
    buckets: HashMap<String, s3::Bucket>,
}

impl S3ObjectStorage {
    /// Builds the storage from `(bucket name, handle)` pairs.
    pub fn new(buckets: impl IntoIterator<Item = (String, s3::Bucket)>) -> Self {
        Self {
            buckets: buckets.into_iter().collect(),
        }
    }

    /// Initializes one bucket handle.
    fn init_bucket(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket_name: &str,
    ) -> anyhow::Result<s3::Bucket> {
        let region = s3::Region::Custom {
            region: region.to_string(),
            endpoint: endpoint.to_string(),
        };

        let credentials = s3::creds::Credentials::new(
            Some(access_key),
            Some(secret_key),
            None,
            None,
            None,
        )?;

        let bucket = s3::Bucket::new(bucket_name, region, credentials)?.with_path_style();

        Ok(*bucket)
    }

    /// Builds handles for the transcript and video buckets of `config`,
    /// signing with an HMAC key pair.
    pub fn from_config(
        config: &GatewayConfig,
        access_key: &str,
        secret_key: &str,
    ) -> anyhow::Result<Self> {
        let buckets = [&config.transcript_bucket, &config.video_bucket]
            .into_iter()
            .map(|name| -> anyhow::Result<(String, s3::Bucket)> {
                tracing::info!(
                    bucket = %name,
                    endpoint = %config.storage_endpoint,
                    "initializing bucket handle"
                );
                let bucket = Self::init_bucket(
                    &config.storage_endpoint,
                    &config.storage_region,
                    access_key,
                    secret_key,
                    name,
                )?;
                Ok((name.clone(), bucket))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self::new(buckets))
    }

    fn bucket(&self, name: &str) -> Result<&s3::Bucket, GatewayError> {
        self.buckets
            .get(name)
            .ok_or_else(|| GatewayError::Internal(format!("bucket not configured: {name}")))
    }
}

#[async_trait::async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn grant_read(
        &self,
        object: &StorageObjectRef,
        ttl: Duration,
    ) -> Result<SignedAccessGrant, GatewayError> {
        let expiry_secs = u32::try_from(ttl.as_secs()).map_err(|_| {
            GatewayError::AccessGrant(format!("grant lifetime too long: {}s", ttl.as_secs()))
        })?;

        let url = self
            .bucket(&object.bucket)?
            .presign_get(&object.key, expiry_secs, None)
            .await
            .map_err(|e| GatewayError::AccessGrant(format!("presign failed for {object}: {e}")))?;

        SignedAccessGrant::expiring_in(url, ttl)
    }

    async fn write_content(
        &self,
        object: &StorageObjectRef,
        content: &str,
        metadata: &ObjectMetadata,
    ) -> Result<(), GatewayError> {
        // Per-request copy so metadata headers do not leak into other calls.
        let mut bucket = self.bucket(&object.bucket)?.clone();
        for (name, value) in metadata.to_map() {
            bucket.add_header(&format!("x-amz-meta-{}", name.to_ascii_lowercase()), &value);
        }

        let response = bucket
            .put_object_with_content_type(&object.key, content.as_bytes(), "text/plain")
            .await
            .map_err(|e| GatewayError::Write(format!("upload failed for {object}: {e}")))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(GatewayError::Write(format!(
                "upload of {object} returned HTTP {status}"
            )));
        }
        Ok(())
    }
}
