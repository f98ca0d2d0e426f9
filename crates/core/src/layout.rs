//! # Storage layout
//!
//! Maps a [`VideoIdentifier`] and an [`ArtifactKind`] to the bucket and key
//! where that artifact lives.
//!
//! ```text
//! video                video bucket       <project>/t1/4003/c1
//! original transcript  transcript bucket  <project>/T1/4003/C1
//! corrected transcript transcript bucket  corrected/T1/4003/C1
//! ```
//!
//! The casing differs between buckets because the existing objects were
//! uploaded that way; it must not be normalised.

use std::fmt;
use std::time::Duration;

use crate::identifier::VideoIdentifier;

/// Collection name used as the top-level prefix for videos and originals.
pub const DEFAULT_PROJECT: &str = "mcnulty";

/// Top-level prefix for corrected transcripts in the transcript bucket.
pub const CORRECTED_PREFIX: &str = "corrected";

/// Read grant lifetime for videos and original transcripts (2 hours).
const LONG_READ_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Read grant lifetime for corrected transcripts (15 minutes).
const SHORT_READ_TTL: Duration = Duration::from_secs(15 * 60);

/// Which artifact of a video a storage reference addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// The recording itself, streamed by the client
    Video,
    /// Machine-generated transcript, never modified
    OriginalTranscript,
    /// Human-corrected transcript, overwritten on every save
    CorrectedTranscript,
}

impl ArtifactKind {
    /// Lifetime of a signed read grant for this artifact.
    pub fn read_ttl(self) -> Duration {
        match self {
            ArtifactKind::Video | ArtifactKind::OriginalTranscript => LONG_READ_TTL,
            ArtifactKind::CorrectedTranscript => SHORT_READ_TTL,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Video => "video",
            ArtifactKind::OriginalTranscript => "original transcript",
            ArtifactKind::CorrectedTranscript => "corrected transcript",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of one object in object storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageObjectRef {
    /// Bucket name
    pub bucket: String,
    /// Object key inside the bucket
    pub key: String,
}

impl fmt::Display for StorageObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Bucket names and project prefix of one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    project: String,
    transcript_bucket: String,
    video_bucket: String,
}

impl StorageLayout {
    /// Layout using the default project prefix.
    pub fn new(transcript_bucket: impl Into<String>, video_bucket: impl Into<String>) -> Self {
        Self::with_project(DEFAULT_PROJECT, transcript_bucket, video_bucket)
    }

    /// Layout with an explicit project prefix.
    pub fn with_project(
        project: impl Into<String>,
        transcript_bucket: impl Into<String>,
        video_bucket: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            transcript_bucket: transcript_bucket.into(),
            video_bucket: video_bucket.into(),
        }
    }

    /// Project prefix.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Bucket holding original and corrected transcripts.
    pub fn transcript_bucket(&self) -> &str {
        &self.transcript_bucket
    }

    /// Bucket holding videos.
    pub fn video_bucket(&self) -> &str {
        &self.video_bucket
    }

    /// Resolves where `kind` of `id` is stored. Total and deterministic.
    pub fn resolve(&self, id: &VideoIdentifier, kind: ArtifactKind) -> StorageObjectRef {
        let subject = id.subject();
        match kind {
            ArtifactKind::Video => StorageObjectRef {
                bucket: self.video_bucket.clone(),
                key: format!(
                    "{}/{}/{subject}/{}",
                    self.project,
                    id.task().to_ascii_lowercase(),
                    id.condition().to_ascii_lowercase()
                ),
            },
            ArtifactKind::OriginalTranscript => StorageObjectRef {
                bucket: self.transcript_bucket.clone(),
                key: format!(
                    "{}/{}/{subject}/{}",
                    self.project,
                    id.task().to_ascii_uppercase(),
                    id.condition().to_ascii_uppercase()
                ),
            },
            ArtifactKind::CorrectedTranscript => StorageObjectRef {
                bucket: self.transcript_bucket.clone(),
                key: format!(
                    "{CORRECTED_PREFIX}/{}/{subject}/{}",
                    id.task().to_ascii_uppercase(),
                    id.condition().to_ascii_uppercase()
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn layout() -> StorageLayout {
        StorageLayout::new("transcript-bucket", "video-bucket")
    }

    #[test]
    fn test_resolve_each_kind() {
        let id = VideoIdentifier::parse("4003 C1 T1").unwrap();
        let layout = layout();

        assert_eq!(
            layout.resolve(&id, ArtifactKind::Video),
            StorageObjectRef {
                bucket: "video-bucket".to_string(),
                key: "mcnulty/t1/4003/c1".to_string(),
            }
        );
        assert_eq!(
            layout.resolve(&id, ArtifactKind::OriginalTranscript),
            StorageObjectRef {
                bucket: "transcript-bucket".to_string(),
                key: "mcnulty/T1/4003/C1".to_string(),
            }
        );
        assert_eq!(
            layout.resolve(&id, ArtifactKind::CorrectedTranscript),
            StorageObjectRef {
                bucket: "transcript-bucket".to_string(),
                key: "corrected/T1/4003/C1".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_folds_case_per_artifact() {
        let id = VideoIdentifier::parse("0420 c7 t3").unwrap();
        let layout = layout();
        assert_eq!(layout.resolve(&id, ArtifactKind::Video).key, "mcnulty/t3/0420/c7");
        assert_eq!(
            layout.resolve(&id, ArtifactKind::OriginalTranscript).key,
            "mcnulty/T3/0420/C7"
        );
        assert_eq!(
            layout.resolve(&id, ArtifactKind::CorrectedTranscript).key,
            "corrected/T3/0420/C7"
        );
    }

    #[test]
    fn test_custom_project_does_not_move_corrected() {
        let id = VideoIdentifier::parse("4003 C1 T1").unwrap();
        let layout = StorageLayout::with_project("pilot", "tb", "vb");
        assert_eq!(layout.resolve(&id, ArtifactKind::Video).key, "pilot/t1/4003/c1");
        assert_eq!(
            layout.resolve(&id, ArtifactKind::CorrectedTranscript).key,
            "corrected/T1/4003/C1"
        );
    }

    #[test]
    fn test_read_ttls() {
        assert_eq!(ArtifactKind::Video.read_ttl(), Duration::from_secs(7200));
        assert_eq!(ArtifactKind::OriginalTranscript.read_ttl(), Duration::from_secs(7200));
        assert_eq!(ArtifactKind::CorrectedTranscript.read_ttl(), Duration::from_secs(900));
    }

    proptest! {
        #[test]
        fn prop_resolve_is_deterministic_and_case_insensitive(
            subject in "[0-9]{4}",
            c in 1u8..=9,
            t in 1u8..=9,
            upper in any::<bool>(),
        ) {
            let raw = if upper {
                format!("{subject} C{c} T{t}")
            } else {
                format!("{subject} c{c} t{t}")
            };
            let canonical = VideoIdentifier::parse(&format!("{subject} C{c} T{t}")).unwrap();
            let id = VideoIdentifier::parse(&raw).unwrap();
            let layout = layout();

            for kind in [
                ArtifactKind::Video,
                ArtifactKind::OriginalTranscript,
                ArtifactKind::CorrectedTranscript,
            ] {
                prop_assert_eq!(layout.resolve(&id, kind), layout.resolve(&id, kind));
                prop_assert_eq!(layout.resolve(&id, kind), layout.resolve(&canonical, kind));
            }
        }
    }
}
