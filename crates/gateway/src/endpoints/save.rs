//! # POST /save
//!
//! Overwrites the corrected transcript.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use transcript_qc_types::{EmptyResponse, SaveRequest};

use crate::config::GatewayState;
use crate::error::ApiError;
use crate::transcripts;

/// POST /save: stores the corrected transcript, replacing any previous one.
pub async fn handle_save(
    State(state): State<Arc<GatewayState>>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let Json(body) = payload?;

    transcripts::save(&state, &body.video_id, &body.transcript_text, chrono::Utc::now())
        .await
        .map_err(|e| e.into_api_error("Failed to save transcript"))?;

    Ok(Json(EmptyResponse::message("Transcript saved successfully")))
}
