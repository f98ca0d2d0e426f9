//! # Transcript QC Gateway
//!
//! HTTP backend of the transcript correction workspace.
//!
//! ## Role
//! - Resolve video identifiers to object storage locations
//! - Fetch transcripts through short-lived signed URLs
//! - Hand out signed video URLs for direct streaming
//! - Overwrite corrected transcripts
//! - Check the shared workspace password
//!
//! ## API endpoints
//! - `POST /load`: original transcript + signed video URL
//! - `POST /load_corrected`: corrected transcript (404 when none)
//! - `POST /save`: save corrected transcript
//! - `POST /verify-password`: shared-secret gate

mod config;
mod endpoints;
mod error;
mod storage;
mod transcripts;

use std::sync::Arc;

use config::{GatewayConfig, GatewayState, StorageCredentials};
use endpoints::{handle_load, handle_load_corrected, handle_save, handle_verify_password};
use storage::{GcsObjectStorage, ObjectStorage, ServiceAccountSigner};

/// Builds the router over `state`.
fn router(state: Arc<GatewayState>) -> axum::Router {
    axum::Router::new()
        .route("/load", axum::routing::post(handle_load))
        .route("/load_corrected", axum::routing::post(handle_load_corrected))
        .route("/save", axum::routing::post(handle_save))
        .route("/verify-password", axum::routing::post(handle_verify_password))
        .with_state(state)
}

/// Picks the storage implementation matching the configured credentials.
fn build_storage(
    config: &GatewayConfig,
    http_client: &reqwest::Client,
) -> anyhow::Result<Box<dyn ObjectStorage>> {
    match &config.credentials {
        StorageCredentials::ServiceAccount {
            client_email,
            private_key,
        } => {
            tracing::info!(service_account = %client_email, "signing with service-account key");
            let signer = ServiceAccountSigner::from_pem(client_email, private_key)?;
            let storage =
                GcsObjectStorage::new(&config.storage_endpoint, signer, http_client.clone())?;
            Ok(Box::new(storage))
        }
        #[cfg(feature = "vendor-s3")]
        StorageCredentials::Hmac {
            access_key,
            secret_key,
        } => {
            tracing::info!("signing with HMAC key pair");
            let storage = storage::S3ObjectStorage::from_config(config, access_key, secret_key)?;
            Ok(Box::new(storage))
        }
        #[cfg(not(feature = "vendor-s3"))]
        StorageCredentials::Hmac { .. } => {
            anyhow::bail!("HMAC credentials need the vendor-s3 feature")
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    if let Ok(path) = dotenvy::dotenv() {
        tracing::info!(path = %path.display(), "loaded environment file");
    }

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        endpoint = %config.storage_endpoint,
        transcript_bucket = %config.transcript_bucket,
        video_bucket = %config.video_bucket,
        project = %config.project,
        "configuration loaded"
    );

    let http_client = reqwest::Client::new();
    let storage = build_storage(&config, &http_client)?;

    let state = Arc::new(GatewayState {
        http_client,
        storage,
        layout: config.layout(),
        password: config.password.clone(),
    });

    let app = router(state);

    tracing::info!("starting gateway on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use endpoints::test_helpers::{test_state, MockObjectStorage};

    /// Serves the full router on an ephemeral port.
    async fn start_gateway(storage: MockObjectStorage) -> String {
        let app = router(test_state(storage));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        format!("http://127.0.0.1:{port}")
    }

    async fn post(
        base: &str,
        path: &str,
        body: serde_json::Value,
    ) -> (u16, serde_json::Value) {
        let response = reqwest::Client::new()
            .post(format!("{base}{path}"))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    /// Whole editing round trip over HTTP.
    #[tokio::test]
    async fn test_http_round_trip() {
        let storage = MockObjectStorage::start().await;
        storage
            .insert("transcripts", "mcnulty/T1/4003/C1", "original")
            .await;
        let base = start_gateway(storage).await;

        let (status, body) = post(&base, "/verify-password", serde_json::json!({"password": "Room101"})).await;
        assert_eq!(status, 200);
        assert_eq!(body, serde_json::json!({"success": true}));

        let (status, body) = post(&base, "/verify-password", serde_json::json!({"password": "nope"})).await;
        assert_eq!(status, 401);
        assert_eq!(body, serde_json::json!({"success": false}));

        let (status, body) = post(&base, "/load", serde_json::json!({"videoId": "4003 C1 T1"})).await;
        assert_eq!(status, 200);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["transcriptText"], "original");
        assert!(body["data"]["videoUrl"].as_str().unwrap().contains("mcnulty/t1/4003/c1"));

        let (status, body) =
            post(&base, "/load_corrected", serde_json::json!({"videoId": "4003 C1 T1"})).await;
        assert_eq!(status, 404);
        assert_eq!(
            body,
            serde_json::json!({"success": false, "error": "No corrected version found"})
        );

        let (status, body) = post(
            &base,
            "/save",
            serde_json::json!({"videoId": "4003 C1 T1", "transcriptText": "corrected"}),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(
            body,
            serde_json::json!({"success": true, "message": "Transcript saved successfully"})
        );

        let (status, body) =
            post(&base, "/load_corrected", serde_json::json!({"videoId": "4003 C1 T1"})).await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["transcriptText"], "corrected");
    }

    /// Malformed JSON is answered with the failure envelope, not a plain-text body.
    #[tokio::test]
    async fn test_malformed_body_uses_envelope() {
        let base = start_gateway(MockObjectStorage::start().await).await;
        let (status, body) = post(&base, "/load", serde_json::json!({"video": 1})).await;
        assert_eq!(status, 422);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }
}
