//! # Transcript QC shared wire types
//!
//! JSON bodies exchanged between the gateway and its clients.
//!
//! ## Encoding rules
//! - Field names are camelCase on the wire (`videoId`, `transcriptText`).
//! - Every response is wrapped in an [`ApiResponse`] envelope carrying a
//!   `success` flag plus exactly one of `data`, `message` or `error`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `POST /load` and `POST /load_corrected`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRequest {
    /// Raw video identifier as typed by the user (e.g. `"4003 C1 T1"`)
    pub video_id: String,
}

/// Body of `POST /save`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    /// Raw video identifier
    pub video_id: String,
    /// Full corrected transcript; replaces whatever is stored
    pub transcript_text: String,
}

/// Body of `POST /verify-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPasswordRequest {
    /// Candidate shared secret
    pub password: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Payload of a successful `POST /load`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadData {
    /// Original transcript text, fetched server-side
    pub transcript_text: String,
    /// Signed URL the client streams the video from
    pub video_url: String,
}

/// Payload of a successful `POST /load_corrected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectedData {
    /// Most recently saved corrected transcript
    pub transcript_text: String,
}

/// Response envelope shared by every endpoint.
///
/// `T` is the endpoint-specific payload; endpoints without a payload use
/// `serde_json::Value` and leave `data` empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Payload on success. No `default` here: it would require `T: Default`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human readable confirmation on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Human readable reason on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying a payload.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// Successful response carrying only a confirmation message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    /// Bare success flag with nothing else (`{"success":true}`).
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
            error: None,
        }
    }

    /// Failure without a reason (`{"success":false}`).
    pub fn rejected() -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: None,
        }
    }

    /// Failure carrying a reason.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Envelope for endpoints that never return `data`.
pub type EmptyResponse = ApiResponse<serde_json::Value>;
