use std::path::PathBuf;

/// All errors that can occur in audioscribe.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid option: {0}")]
    Config(String),

    #[error("audio file not found: {path}")]
    AudioNotFound { path: PathBuf },

    #[error("transcription error: {0}")]
    Transcription(String),

    #[error("summary error: {0}")]
    Summary(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single metadata-resolve or download step.
///
/// The kind decides whether the fetch loop tries again and which message
/// the caller finally sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The provider reported the video as unavailable.
    #[error("video unavailable: {0}")]
    Unavailable(String),

    /// Anything else that went wrong while talking to the provider.
    #[error("{0}")]
    Failed(String),

    /// The request can never succeed (e.g. the URL is malformed).
    #[error("{0}")]
    Rejected(String),
}

impl From<Error> for FetchError {
    fn from(e: Error) -> Self {
        FetchError::Failed(e.to_string())
    }
}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        FetchError::Failed(Error::Io(e).to_string())
    }
}
