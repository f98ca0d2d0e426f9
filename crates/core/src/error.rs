//! # Core error type

/// Error type of the core crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The video identifier does not have the `XXXX CX TX` shape.
    /// The message is safe to show to the user verbatim.
    #[error("Please use format: XXXX CX TX (e.g., 4003 C1 T1)")]
    InvalidFormat,
    /// A workspace operation was started while another one was in flight.
    #[error("cannot start {requested} while {current}")]
    InvalidTransition {
        /// Operation that was requested
        requested: &'static str,
        /// Describes the state the workspace is in
        current: &'static str,
    },
}
