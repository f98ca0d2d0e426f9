//! # Gateway HTTP client
//!
//! Typed wrappers around the four gateway endpoints.

use serde::de::DeserializeOwned;
use serde::Serialize;
use transcript_qc_types::{
    ApiResponse, CorrectedData, EmptyResponse, LoadData, LoadRequest, SaveRequest,
    VerifyPasswordRequest,
};

/// Client error type.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The gateway refused the password
    #[error("Incorrect password")]
    Unauthorized,
    /// The gateway answered with a failure envelope
    #[error("{0}")]
    Rejected(String),
    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Response that is not a gateway envelope
    #[error("unexpected response from gateway: HTTP {0}")]
    Unexpected(u16),
}

/// Outcome of asking for the corrected transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Corrected {
    /// Saved corrected transcript
    Found(String),
    /// Not edited yet
    Missing,
}

/// Client of one gateway.
pub struct QcClient {
    base_url: String,
    http: reqwest::Client,
}

impl QcClient {
    /// Client for the gateway at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Checks the shared password. Surrounding whitespace is ignored.
    pub async fn verify_password(&self, password: &str) -> Result<(), ClientError> {
        let (status, response): (u16, EmptyResponse) = self
            .post(
                "/verify-password",
                &VerifyPasswordRequest {
                    password: password.trim().to_string(),
                },
            )
            .await?;
        match status {
            200 if response.success => Ok(()),
            401 => Err(ClientError::Unauthorized),
            _ => Err(ClientError::Unexpected(status)),
        }
    }

    /// Loads the original transcript and the signed video URL.
    pub async fn load(&self, video_id: &str) -> Result<LoadData, ClientError> {
        let (_, response): (u16, ApiResponse<LoadData>) = self
            .post(
                "/load",
                &LoadRequest {
                    video_id: video_id.to_string(),
                },
            )
            .await?;
        into_data(response, "Failed to load files")
    }

    /// Loads the corrected transcript; a 404 means none has been saved.
    pub async fn load_corrected(&self, video_id: &str) -> Result<Corrected, ClientError> {
        let (status, response): (u16, ApiResponse<CorrectedData>) = self
            .post(
                "/load_corrected",
                &LoadRequest {
                    video_id: video_id.to_string(),
                },
            )
            .await?;
        if status == 404 {
            return Ok(Corrected::Missing);
        }
        into_data(response, "Failed to load corrected transcript")
            .map(|data| Corrected::Found(data.transcript_text))
    }

    /// Saves the corrected transcript and returns the gateway's confirmation.
    pub async fn save(&self, video_id: &str, transcript_text: &str) -> Result<String, ClientError> {
        let (_, response): (u16, EmptyResponse) = self
            .post(
                "/save",
                &SaveRequest {
                    video_id: video_id.to_string(),
                    transcript_text: transcript_text.to_string(),
                },
            )
            .await?;
        if response.success {
            Ok(response.message.unwrap_or_default())
        } else {
            Err(ClientError::Rejected(
                response
                    .error
                    .unwrap_or_else(|| "Failed to save transcript".to_string()),
            ))
        }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(u16, ApiResponse<T>), ClientError> {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let envelope =
            serde_json::from_str(&text).map_err(|_| ClientError::Unexpected(status))?;
        Ok((status, envelope))
    }
}

fn into_data<T>(response: ApiResponse<T>, fallback: &str) -> Result<T, ClientError> {
    match response {
        ApiResponse {
            success: true,
            data: Some(data),
            ..
        } => Ok(data),
        ApiResponse { error, .. } => Err(ClientError::Rejected(
            error.unwrap_or_else(|| fallback.to_string()),
        )),
    }
}
