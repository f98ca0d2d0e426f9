//! # Workspace shell
//!
//! Unlocks the gateway once, then runs operations through the workspace
//! state machine so a failed call leaves the session in `Error` and a new
//! call cannot start while one is in flight.

use transcript_qc_core::{Operation, VideoIdentifier, Workspace, WorkspaceState};
use transcript_qc_types::LoadData;

use crate::client::{ClientError, Corrected, QcClient};

/// Unlocked editing session.
pub struct Shell {
    client: QcClient,
    workspace: Workspace,
}

impl Shell {
    /// Verifies `password` and opens a session.
    pub async fn unlock(client: QcClient, password: &str) -> anyhow::Result<Self> {
        client.verify_password(password).await.map_err(|e| match e {
            ClientError::Unauthorized => anyhow::anyhow!("Incorrect password"),
            other => anyhow::Error::new(other).context("Error verifying password"),
        })?;
        tracing::debug!("workspace unlocked");
        Ok(Self {
            client,
            workspace: Workspace::new(),
        })
    }

    /// Current workspace state.
    pub fn state(&self) -> &WorkspaceState {
        self.workspace.state()
    }

    /// Loads the original transcript and the signed video URL.
    pub async fn load(&mut self, raw_id: &str) -> anyhow::Result<LoadData> {
        let video_id = normalize_id(raw_id)?;
        self.workspace.begin(Operation::Load)?;
        let result = self.client.load(&video_id).await;
        self.settle(result, "Failed to load video and transcript")
    }

    /// Loads the corrected transcript, if one was saved.
    pub async fn load_corrected(&mut self, raw_id: &str) -> anyhow::Result<Corrected> {
        let video_id = normalize_id(raw_id)?;
        self.workspace.begin(Operation::LoadCorrected)?;
        let result = self.client.load_corrected(&video_id).await;
        self.settle(result, "Failed to load corrected transcript")
    }

    /// Saves `transcript_text` as the corrected transcript.
    pub async fn save(&mut self, raw_id: &str, transcript_text: &str) -> anyhow::Result<()> {
        let video_id = normalize_id(raw_id)?;
        self.workspace.begin(Operation::Save)?;
        let result = self.client.save(&video_id, transcript_text).await;
        self.settle(result, "Failed to save transcript").map(|_| ())
    }

    fn settle<T>(&mut self, result: Result<T, ClientError>, message: &str) -> anyhow::Result<T> {
        match result {
            Ok(value) => {
                self.workspace.succeed()?;
                Ok(value)
            }
            Err(e) => {
                tracing::debug!(error = %e, "operation failed");
                self.workspace.fail(message)?;
                Err(anyhow::Error::new(e).context(message.to_string()))
            }
        }
    }
}

/// Upper-cases the id the way the input box does, then checks its format.
fn normalize_id(raw_id: &str) -> anyhow::Result<String> {
    let video_id = raw_id.trim().to_uppercase();
    VideoIdentifier::parse(&video_id)?;
    Ok(video_id)
}
