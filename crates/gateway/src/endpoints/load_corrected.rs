//! # POST /load_corrected
//!
//! Corrected transcript. A missing one answers 404, which clients treat as
//! "not edited yet" rather than as a failure.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use transcript_qc_types::{ApiResponse, CorrectedData, LoadRequest};

use crate::config::GatewayState;
use crate::error::ApiError;
use crate::transcripts::{self, CorrectedTranscript};

/// Message returned with the 404.
pub const NO_CORRECTED_VERSION: &str = "No corrected version found";

/// POST /load_corrected: fetches the corrected transcript.
pub async fn handle_load_corrected(
    State(state): State<Arc<GatewayState>>,
    payload: Result<Json<LoadRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CorrectedData>>, ApiError> {
    let Json(body) = payload?;

    let corrected = transcripts::load_corrected(&state, &body.video_id)
        .await
        .map_err(|e| e.into_api_error("Failed to load corrected transcript"))?;

    match corrected {
        CorrectedTranscript::Found(transcript_text) => {
            Ok(Json(ApiResponse::data(CorrectedData { transcript_text })))
        }
        CorrectedTranscript::Missing => Err(ApiError::not_found(NO_CORRECTED_VERSION)),
    }
}
