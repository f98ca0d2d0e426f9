//! # Gateway endpoints
//!
//! - `POST /load`: original transcript + signed video URL
//! - `POST /load_corrected`: corrected transcript, 404 when none exists
//! - `POST /save`: overwrite the corrected transcript
//! - `POST /verify-password`: shared-secret gate

pub mod load;
pub mod load_corrected;
pub mod save;
pub mod verify_password;

#[cfg(test)]
pub mod test_helpers;

pub use load::handle_load;
pub use load_corrected::handle_load_corrected;
pub use save::handle_save;
pub use verify_password::handle_verify_password;
