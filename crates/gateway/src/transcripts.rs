//! # Transcript retrieval protocol
//!
//! Load, load-corrected and save, each a single round trip to object
//! storage:
//!
//! 1. Parse the raw video identifier
//! 2. Resolve the storage location of each artifact involved
//! 3. Grant a signed read (2h for video/original, 15m for corrected) or write
//! 4. For reads, fetch the transcript server-side; the video is streamed by
//!    the client directly from its signed URL
//!
//! No retries and no concurrency control: concurrent saves of the same video
//! race and the last write wins.

use chrono::{DateTime, Utc};
use transcript_qc_core::{ArtifactKind, StorageObjectRef, VideoIdentifier};

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::storage::{fetch_content, FetchedContent, ObjectMetadata};

/// Result of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTranscript {
    /// Original transcript text
    pub transcript_text: String,
    /// Signed video URL, still valid when returned
    pub video_url: String,
}

/// Result of looking up the corrected transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectedTranscript {
    /// A corrected version exists
    Found(String),
    /// Nothing saved yet; expected before the first edit
    Missing,
}

fn parse_id(raw_id: &str) -> Result<VideoIdentifier, GatewayError> {
    VideoIdentifier::parse(raw_id).map_err(GatewayError::InvalidId)
}

/// Loads the original transcript and a signed URL for the video.
pub async fn load(state: &GatewayState, raw_id: &str) -> Result<LoadedTranscript, GatewayError> {
    let id = parse_id(raw_id)?;
    let transcript_ref = state.layout.resolve(&id, ArtifactKind::OriginalTranscript);
    let video_ref = state.layout.resolve(&id, ArtifactKind::Video);

    let transcript_grant = state
        .storage
        .grant_read(&transcript_ref, ArtifactKind::OriginalTranscript.read_ttl())
        .await?;
    let video_grant = state
        .storage
        .grant_read(&video_ref, ArtifactKind::Video.read_ttl())
        .await?;

    let transcript_text = match fetch_content(&state.http_client, &transcript_grant).await? {
        FetchedContent::Found(text) => text,
        FetchedContent::Missing(status) => {
            return Err(GatewayError::Backend(format!(
                "original transcript {transcript_ref} returned HTTP {status}"
            )));
        }
    };

    tracing::info!(
        video_id = %id,
        transcript = %transcript_ref,
        video = %video_ref,
        video_url_expires_at = %video_grant.expires_at,
        "loaded original transcript"
    );

    Ok(LoadedTranscript {
        transcript_text,
        video_url: video_grant.url,
    })
}

/// Loads the corrected transcript, reporting [`CorrectedTranscript::Missing`]
/// when none has been saved.
pub async fn load_corrected(
    state: &GatewayState,
    raw_id: &str,
) -> Result<CorrectedTranscript, GatewayError> {
    let id = parse_id(raw_id)?;
    let corrected_ref = state.layout.resolve(&id, ArtifactKind::CorrectedTranscript);

    let grant = state
        .storage
        .grant_read(&corrected_ref, ArtifactKind::CorrectedTranscript.read_ttl())
        .await?;

    match fetch_content(&state.http_client, &grant).await? {
        FetchedContent::Found(text) => {
            tracing::info!(video_id = %id, transcript = %corrected_ref, "loaded corrected transcript");
            Ok(CorrectedTranscript::Found(text))
        }
        FetchedContent::Missing(status) => {
            tracing::info!(
                video_id = %id,
                transcript = %corrected_ref,
                status,
                "no corrected transcript"
            );
            Ok(CorrectedTranscript::Missing)
        }
    }
}

/// Saves `transcript_text` as the corrected transcript, replacing any
/// previous version. Returns where it was written.
pub async fn save(
    state: &GatewayState,
    raw_id: &str,
    transcript_text: &str,
    now: DateTime<Utc>,
) -> Result<StorageObjectRef, GatewayError> {
    let id = parse_id(raw_id)?;
    let corrected_ref = state.layout.resolve(&id, ArtifactKind::CorrectedTranscript);

    // Header-safe form of the id: tokens as typed, single-space separated.
    let metadata = ObjectMetadata {
        original_video_id: id.to_string(),
        last_modified: now,
    };

    state
        .storage
        .write_content(&corrected_ref, transcript_text, &metadata)
        .await?;

    tracing::info!(
        video_id = %id,
        transcript = %corrected_ref,
        bytes = transcript_text.len(),
        "saved corrected transcript"
    );
    Ok(corrected_ref)
}
