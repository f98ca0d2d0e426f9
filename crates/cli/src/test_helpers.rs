//! # Client test helpers
//!
//! Mock gateway that speaks the real envelope format. Only `4003 C1 T1`
//! has an original transcript; the password is `room101`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tokio::sync::RwLock;

type Corrected = Arc<RwLock<Option<String>>>;

/// Running mock gateway.
pub struct MockGateway {
    pub base_url: String,
}

/// Starts the mock gateway on an ephemeral port.
pub async fn start_mock_gateway() -> MockGateway {
    let corrected: Corrected = Arc::new(RwLock::new(None));

    let app = axum::Router::new()
        .route("/verify-password", axum::routing::post(verify_password))
        .route("/load", axum::routing::post(load))
        .route("/load_corrected", axum::routing::post(load_corrected))
        .route("/save", axum::routing::post(save))
        .with_state(corrected);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    MockGateway {
        base_url: format!("http://127.0.0.1:{port}"),
    }
}

async fn verify_password(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"].as_str().unwrap_or_default().eq_ignore_ascii_case("room101") {
        (StatusCode::OK, Json(json!({"success": true})))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"success": false})))
    }
}

async fn load(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["videoId"] == "4003 C1 T1" {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "transcriptText": "original",
                    "videoUrl": "https://storage.example/video?sig=1"
                }
            })),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "error": "Failed to load files"})),
        )
    }
}

async fn load_corrected(State(corrected): State<Corrected>) -> (StatusCode, Json<Value>) {
    match corrected.read().await.clone() {
        Some(text) => (
            StatusCode::OK,
            Json(json!({"success": true, "data": {"transcriptText": text}})),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "error": "No corrected version found"})),
        ),
    }
}

async fn save(State(corrected): State<Corrected>, Json(body): Json<Value>) -> Json<Value> {
    let text = body["transcriptText"].as_str().unwrap_or_default().to_string();
    *corrected.write().await = Some(text);
    Json(json!({"success": true, "message": "Transcript saved successfully"}))
}
