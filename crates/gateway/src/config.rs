//! # Gateway configuration and shared state
//!
//! Settings are read once from the environment at start-up. Missing
//! credentials, buckets or password abort start-up instead of producing
//! signed URLs that can never work.

use transcript_qc_core::{StorageLayout, DEFAULT_PROJECT};

use crate::storage::ObjectStorage;

/// Default endpoint: the XML API of Google Cloud Storage.
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://storage.googleapis.com";

const DEFAULT_STORAGE_REGION: &str = "auto";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Storage credentials.
#[derive(Clone)]
pub enum StorageCredentials {
    /// Service-account key; URLs are V4-signed with RSA
    ServiceAccount {
        client_email: String,
        /// PEM private key with real line breaks
        private_key: String,
    },
    /// HMAC key pair for the S3-compatible API
    Hmac {
        access_key: String,
        secret_key: String,
    },
}

/// Settings read from the environment.
#[derive(Clone)]
pub struct GatewayConfig {
    /// S3-compatible endpoint URL
    pub storage_endpoint: String,
    /// Signing region (HMAC credentials only)
    pub storage_region: String,
    /// How requests to storage are signed
    pub credentials: StorageCredentials,
    /// Shared secret of the access gate
    pub password: String,
    /// Bucket with original and corrected transcripts
    pub transcript_bucket: String,
    /// Bucket with videos
    pub video_bucket: String,
    /// Top-level prefix of videos and original transcripts
    pub project: String,
    /// Listen address
    pub bind_addr: String,
}

impl GatewayConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |name: &str| -> anyhow::Result<String> {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("{name} must be set"))
        };
        let optional = |name: &str, default: &str| -> String {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let present = |name: &str| lookup(name).is_some_and(|v| !v.trim().is_empty());

        let credentials = if present("GCP_SERVICE_ACCOUNT_EMAIL") {
            StorageCredentials::ServiceAccount {
                client_email: required("GCP_SERVICE_ACCOUNT_EMAIL")?,
                // Keys pasted into env files usually carry escaped line breaks.
                private_key: required("GCP_PRIVATE_KEY")?.replace("\\n", "\n"),
            }
        } else if present("STORAGE_ACCESS_KEY") {
            StorageCredentials::Hmac {
                access_key: required("STORAGE_ACCESS_KEY")?,
                secret_key: required("STORAGE_SECRET_KEY")?,
            }
        } else {
            anyhow::bail!(
                "GCP_SERVICE_ACCOUNT_EMAIL and GCP_PRIVATE_KEY must be set \
                 (or STORAGE_ACCESS_KEY and STORAGE_SECRET_KEY)"
            );
        };

        Ok(Self {
            credentials,
            password: required("PASSWORD")?,
            transcript_bucket: required("TRANSCRIPT_BUCKET")?,
            video_bucket: required("VIDEO_BUCKET")?,
            storage_endpoint: optional("STORAGE_ENDPOINT", DEFAULT_STORAGE_ENDPOINT),
            storage_region: optional("STORAGE_REGION", DEFAULT_STORAGE_REGION),
            project: optional("TRANSCRIPT_PROJECT", DEFAULT_PROJECT),
            bind_addr: optional("BIND_ADDR", DEFAULT_BIND_ADDR),
        })
    }

    /// Storage layout described by this configuration.
    pub fn layout(&self) -> StorageLayout {
        StorageLayout::with_project(
            self.project.clone(),
            self.transcript_bucket.clone(),
            self.video_bucket.clone(),
        )
    }
}

/// Shared state of the gateway. Built once, read-only afterwards.
pub struct GatewayState {
    /// HTTP client used to read content through signed URLs
    pub http_client: reqwest::Client,
    /// Object storage capability (S3-compatible etc., abstracted by a trait)
    pub storage: Box<dyn ObjectStorage>,
    /// Where each artifact lives
    pub layout: StorageLayout,
    /// Shared secret of the access gate
    pub password: String,
}
