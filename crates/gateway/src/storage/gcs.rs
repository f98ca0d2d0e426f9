//! # Google Cloud Storage
//!
//! Signs V4 URLs (`GOOG4-RSA-SHA256`) with a service-account private key.
//! Reads hand the signed URL to the caller. Writes `PUT` through a
//! short-lived signed URL whose signature covers the content type and the
//! `x-goog-meta-*` headers.

use std::collections::BTreeMap;
use std::time::Duration;

use base64::Engine;
use chrono::{DateTime, Utc};
use ring::rand::SystemRandom;
use ring::signature::{RsaKeyPair, RSA_PKCS1_SHA256};
use sha2::{Digest, Sha256};
use transcript_qc_core::StorageObjectRef;

use super::{ObjectMetadata, ObjectStorage, SignedAccessGrant};
use crate::error::GatewayError;

const SIGNING_ALGORITHM: &str = "GOOG4-RSA-SHA256";

/// Longest lifetime a V4 signed URL may have (7 days).
const MAX_SIGNED_URL_SECS: u64 = 604_800;

/// Lifetime of the URL an upload is sent through.
const WRITE_URL_TTL: Duration = Duration::from_secs(900);

/// Service-account key used to sign URLs.
pub struct ServiceAccountSigner {
    client_email: String,
    key_pair: RsaKeyPair,
    rng: SystemRandom,
}

impl ServiceAccountSigner {
    /// Parses a PEM private key, PKCS#8 (`BEGIN PRIVATE KEY`, as issued in
    /// service-account key files) or PKCS#1 (`BEGIN RSA PRIVATE KEY`).
    pub fn from_pem(client_email: &str, pem: &str) -> Result<Self, GatewayError> {
        let body: String = pem
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with("-----"))
            .collect();
        let der = base64::engine::general_purpose::STANDARD
            .decode(body)
            .map_err(|e| GatewayError::Internal(format!("private key is not valid PEM: {e}")))?;
        let key_pair = RsaKeyPair::from_pkcs8(&der)
            .or_else(|_| RsaKeyPair::from_der(&der))
            .map_err(|e| GatewayError::Internal(format!("unusable private key: {e}")))?;

        Ok(Self {
            client_email: client_email.to_string(),
            key_pair,
            rng: SystemRandom::new(),
        })
    }

    /// Service account the URLs are signed as.
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, GatewayError> {
        let mut signature = vec![0u8; self.key_pair.public().modulus_len()];
        self.key_pair
            .sign(&RSA_PKCS1_SHA256, &self.rng, message, &mut signature)
            .map_err(|_| GatewayError::Internal("RSA signing failed".to_string()))?;
        Ok(signature)
    }
}

/// Object storage on the Cloud Storage XML API.
pub struct GcsObjectStorage {
    /// Endpoint URL without trailing slash
    endpoint: String,
    /// `Host` header value the signature covers
    host: String,
    signer: ServiceAccountSigner,
    http_client: reqwest::Client,
}

impl GcsObjectStorage {
    pub fn new(
        endpoint: &str,
        signer: ServiceAccountSigner,
        http_client: reqwest::Client,
    ) -> Result<Self, GatewayError> {
        let url = reqwest::Url::parse(endpoint)
            .map_err(|e| GatewayError::Internal(format!("invalid storage endpoint {endpoint}: {e}")))?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(GatewayError::Internal(format!(
                    "storage endpoint has no host: {endpoint}"
                )))
            }
        };

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            host,
            signer,
            http_client,
        })
    }

    /// Builds a V4 signed URL for `method` on `object`.
    ///
    /// `headers` (lower-case names) must be sent unchanged with the request;
    /// `host` is always signed.
    fn signed_url(
        &self,
        method: &str,
        object: &StorageObjectRef,
        headers: &BTreeMap<String, String>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, GatewayError> {
        let expires = ttl.as_secs();
        if expires == 0 || expires > MAX_SIGNED_URL_SECS {
            return Err(GatewayError::AccessGrant(format!(
                "signed URL lifetime must be between 1 and {MAX_SIGNED_URL_SECS}s, got {expires}s"
            )));
        }

        let timestamp = now.format("%Y%m%dT%H%M%SZ").to_string();
        let scope = format!("{}/auto/storage/goog4_request", now.format("%Y%m%d"));

        let mut signed_headers = headers.clone();
        signed_headers.insert("host".to_string(), self.host.clone());
        let header_names = signed_headers
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(";");
        let canonical_headers: String = signed_headers
            .iter()
            .map(|(name, value)| format!("{name}:{}\n", value.trim()))
            .collect();

        let params = BTreeMap::from([
            ("X-Goog-Algorithm", SIGNING_ALGORITHM.to_string()),
            (
                "X-Goog-Credential",
                format!("{}/{scope}", self.signer.client_email()),
            ),
            ("X-Goog-Date", timestamp.clone()),
            ("X-Goog-Expires", expires.to_string()),
            ("X-Goog-SignedHeaders", header_names.clone()),
        ]);
        let query = params
            .iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        let path = format!(
            "/{}/{}",
            urlencoding::encode(&object.bucket),
            object
                .key
                .split('/')
                .map(urlencoding::encode)
                .collect::<Vec<_>>()
                .join("/")
        );

        let canonical_request = format!(
            "{method}\n{path}\n{query}\n{canonical_headers}\n{header_names}\nUNSIGNED-PAYLOAD"
        );
        let string_to_sign = format!(
            "{SIGNING_ALGORITHM}\n{timestamp}\n{scope}\n{}",
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );
        let signature = hex::encode(self.signer.sign(string_to_sign.as_bytes())?);

        Ok(format!(
            "{}{path}?{query}&X-Goog-Signature={signature}",
            self.endpoint
        ))
    }
}

#[async_trait::async_trait]
impl ObjectStorage for GcsObjectStorage {
    async fn grant_read(
        &self,
        object: &StorageObjectRef,
        ttl: Duration,
    ) -> Result<SignedAccessGrant, GatewayError> {
        let url = self.signed_url("GET", object, &BTreeMap::new(), ttl, Utc::now())?;
        SignedAccessGrant::expiring_in(url, ttl)
    }

    async fn write_content(
        &self,
        object: &StorageObjectRef,
        content: &str,
        metadata: &ObjectMetadata,
    ) -> Result<(), GatewayError> {
        // Metadata header names are case-insensitive; the signature needs them lower-case.
        let mut headers = BTreeMap::from([("content-type".to_string(), "text/plain".to_string())]);
        for (name, value) in metadata.to_map() {
            headers.insert(format!("x-goog-meta-{}", name.to_ascii_lowercase()), value);
        }

        let url = self
            .signed_url("PUT", object, &headers, WRITE_URL_TTL, Utc::now())
            .map_err(|e| GatewayError::Write(format!("cannot sign upload of {object}: {e}")))?;

        let mut request = self.http_client.put(&url).body(content.to_string());
        for (name, value) in &headers {
            request = request.header(name, value);
        }
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Write(format!("upload of {object} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::Write(format!(
                "upload of {object} returned HTTP {status}: {detail}"
            )));
        }
        Ok(())
    }
}
