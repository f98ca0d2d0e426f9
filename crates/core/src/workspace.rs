//! # Workspace state machine
//!
//! Client-side state of an editing session.
//!
//! ## Transitions
//! ```text
//! Idle | Error  --begin(Load)--------->  Loading
//! Idle | Error  --begin(LoadCorrected)->  LoadingCorrected
//! Idle | Error  --begin(Save)--------->  Saving
//! busy          --succeed()----------->  Idle
//! busy          --fail(msg)----------->  Error(msg)
//! ```
//! Starting an operation while another is in flight is rejected, which is
//! what disables the Load and Save buttons in a graphical shell.

use crate::error::CoreError;

/// Operation a client can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Load original transcript and video URL
    Load,
    /// Load the corrected transcript
    LoadCorrected,
    /// Save the corrected transcript
    Save,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Operation::Load => "load",
            Operation::LoadCorrected => "load-corrected",
            Operation::Save => "save",
        }
    }
}

/// Current state of the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkspaceState {
    /// Nothing in flight
    #[default]
    Idle,
    /// `load` in flight
    Loading,
    /// `load-corrected` in flight
    LoadingCorrected,
    /// `save` in flight
    Saving,
    /// Last operation failed with this message
    Error(String),
}

impl WorkspaceState {
    /// Whether an operation is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            WorkspaceState::Loading | WorkspaceState::LoadingCorrected | WorkspaceState::Saving
        )
    }

    fn describe(&self) -> &'static str {
        match self {
            WorkspaceState::Idle => "idle",
            WorkspaceState::Loading => "loading",
            WorkspaceState::LoadingCorrected => "loading the corrected transcript",
            WorkspaceState::Saving => "saving",
            WorkspaceState::Error(_) => "in error",
        }
    }
}

/// Editing session driven by a client shell.
#[derive(Debug, Default)]
pub struct Workspace {
    state: WorkspaceState,
}

impl Workspace {
    /// New idle workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    /// Starts `op`. Allowed from `Idle` and `Error`; clears a previous error.
    pub fn begin(&mut self, op: Operation) -> Result<(), CoreError> {
        if self.state.is_busy() {
            return Err(CoreError::InvalidTransition {
                requested: op.as_str(),
                current: self.state.describe(),
            });
        }
        self.state = match op {
            Operation::Load => WorkspaceState::Loading,
            Operation::LoadCorrected => WorkspaceState::LoadingCorrected,
            Operation::Save => WorkspaceState::Saving,
        };
        Ok(())
    }

    /// Marks the in-flight operation as finished.
    pub fn succeed(&mut self) -> Result<(), CoreError> {
        self.finish("succeed", WorkspaceState::Idle)
    }

    /// Marks the in-flight operation as failed.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), CoreError> {
        self.finish("fail", WorkspaceState::Error(message.into()))
    }

    fn finish(&mut self, requested: &'static str, next: WorkspaceState) -> Result<(), CoreError> {
        if !self.state.is_busy() {
            return Err(CoreError::InvalidTransition {
                requested,
                current: self.state.describe(),
            });
        }
        self.state = next;
        Ok(())
    }
}
