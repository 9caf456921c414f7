use std::fmt;

use directory_core::{BlockReason, NormalizedResult, SearchToken, SubmissionKind, ValidationError};

/// Failures of the remote store adapter. Plain strings keep the type `Clone`
/// so it can cross the event channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("collection {name}: {message}")]
    Collection { name: String, message: String },
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid json: {0}")]
    Json(String),
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Json(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("connection error: {0}")]
    Connectivity(String),
}

impl SearchError {
    pub fn user_message(&self) -> &'static str {
        directory_core::SEARCH_ERROR_MESSAGE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("a submission is already in progress")]
    Busy,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("submission blocked: {0}")]
    Blocked(BlockReason),
    #[error("{kind} media unreachable: {url}")]
    MediaUnreachable { kind: SubmissionKind, url: String },
    #[error("submission blocked: {0}")]
    MediaBlocked(BlockReason),
    #[error("{0} submission has no media")]
    MissingMedia(SubmissionKind),
    #[error("connection error: {0}")]
    Connectivity(String),
    #[error("upload failed: {0}")]
    Upload(StoreError),
    #[error("store write failed: {0}")]
    Store(StoreError),
}

impl SubmitError {
    /// The single message shown to the user. Raw detail goes to the log only.
    pub fn user_message(&self, kind: SubmissionKind) -> String {
        match self {
            SubmitError::Busy => "A submission is already in progress.".to_string(),
            SubmitError::Validation(_) => "Please fill in all required fields.".to_string(),
            SubmitError::Blocked(reason) | SubmitError::MediaBlocked(reason) => {
                format!("Submission blocked: {reason}")
            }
            SubmitError::MediaUnreachable {
                kind: SubmissionKind::Video,
                ..
            } => "Video URL is not reachable.".to_string(),
            SubmitError::MediaUnreachable { .. } => {
                "Invalid image URL. Please check the URL.".to_string()
            }
            SubmitError::MissingMedia(SubmissionKind::Video) => {
                "Please provide a video URL or upload a video file.".to_string()
            }
            SubmitError::MissingMedia(_) => {
                "Please provide an image URL or upload an image.".to_string()
            }
            SubmitError::Connectivity(_) | SubmitError::Upload(_) | SubmitError::Store(_) => {
                format!("Error adding {}. Please try again.", kind.label())
            }
        }
    }
}

/// A persisted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub kind: SubmissionKind,
    pub id: String,
    pub media_url: Option<String>,
}

impl SubmitReceipt {
    pub fn user_message(&self) -> String {
        let label = self.kind.label();
        let mut chars = label.chars();
        let capitalized: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        format!("{capitalized} added successfully!")
    }
}

/// What the preview area should show for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    /// A confirmed image (explicit URL or discovered favicon).
    Valid(String),
    Invalid,
    NoFavicon,
}

impl fmt::Display for PreviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewState::Valid(url) => write!(f, "preview: {url}"),
            PreviewState::Invalid => f.write_str("Invalid image URL"),
            PreviewState::NoFavicon => f.write_str("No favicon found for site."),
        }
    }
}

/// Form fields the media preview reacts to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewInput {
    pub link: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewReport {
    pub input: PreviewInput,
    pub state: PreviewState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SearchCompleted {
        token: SearchToken,
        result: Result<Vec<NormalizedResult>, SearchError>,
    },
    DebounceElapsed {
        generation: u64,
    },
    GalleryDetachElapsed {
        generation: u64,
    },
    SubmitFinished {
        kind: SubmissionKind,
        result: Result<SubmitReceipt, SubmitError>,
    },
    Preview(PreviewReport),
    PreviewCleared,
}
