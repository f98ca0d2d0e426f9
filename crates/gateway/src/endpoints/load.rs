//! # POST /load
//!
//! Original transcript plus a signed URL for the video.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use transcript_qc_types::{ApiResponse, LoadData, LoadRequest};

use crate::config::GatewayState;
use crate::error::ApiError;
use crate::transcripts;

/// POST /load: fetches the original transcript server-side and returns it
/// with a signed video URL the client streams from directly.
pub async fn handle_load(
    State(state): State<Arc<GatewayState>>,
    payload: Result<Json<LoadRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoadData>>, ApiError> {
    let Json(body) = payload?;

    let loaded = transcripts::load(&state, &body.video_id)
        .await
        .map_err(|e| e.into_api_error("Failed to load files"))?;

    Ok(Json(ApiResponse::data(LoadData {
        transcript_text: loaded.transcript_text,
        video_url: loaded.video_url,
    })))
}
