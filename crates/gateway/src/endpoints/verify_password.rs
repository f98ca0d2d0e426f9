//! # POST /verify-password
//!
//! Shared-secret gate in front of the workspace.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use transcript_qc_core::access;
use transcript_qc_types::{EmptyResponse, VerifyPasswordRequest};

use crate::config::GatewayState;
use crate::error::ApiError;

/// POST /verify-password: `{"success":true}` when the password matches
/// (case-insensitive), 401 `{"success":false}` otherwise.
pub async fn handle_verify_password(
    State(state): State<Arc<GatewayState>>,
    payload: Result<Json<VerifyPasswordRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let Json(body) = payload?;

    if access::verify(&body.password, &state.password) {
        Ok(Json(EmptyResponse::ok()))
    } else {
        tracing::warn!("password rejected");
        Err(ApiError::unauthorized())
    }
}
