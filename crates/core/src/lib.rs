//! # Transcript QC Core
//!
//! Pure logic shared by the gateway and the terminal client. No I/O.
//!
//! ## Processing flow
//! 1. Parse the raw video identifier (`"4003 C1 T1"`) into a [`VideoIdentifier`]
//! 2. Resolve it, per [`ArtifactKind`], into a bucket/key pair with [`StorageLayout`]
//! 3. Gate clients with the case-insensitive shared secret ([`access::verify`])
//!
//! The client-side workspace state machine lives in [`workspace`].

pub mod access;
mod error;
mod identifier;
mod layout;
pub mod workspace;

pub use error::CoreError;
pub use identifier::VideoIdentifier;
pub use layout::{
    ArtifactKind, StorageLayout, StorageObjectRef, CORRECTED_PREFIX, DEFAULT_PROJECT,
};
pub use workspace::{Operation, Workspace, WorkspaceState};
