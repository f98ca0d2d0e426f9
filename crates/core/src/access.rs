//! # Access gate
//!
//! A single shared secret compared case-insensitively. This is a coarse
//! convenience gate for an internal tool, not authentication: no hashing,
//! no sessions, no rate limiting.

/// Returns whether `candidate` equals `secret`, ignoring case.
pub fn verify(candidate: &str, secret: &str) -> bool {
    candidate.to_uppercase() == secret.to_uppercase()
}
