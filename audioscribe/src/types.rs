use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;

pub const MSG_DOWNLOADED: &str = "Download successful";
pub const MSG_ALREADY_EXISTS: &str = "File already exists";

/// Metadata resolved for a source URL before downloading.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Outcome of fetching the audio for a URL.
///
/// Serializes as `{success, path, message}` or `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    Success { path: PathBuf, message: String },
    Failure { error: String },
}

impl DownloadResult {
    pub fn downloaded(path: PathBuf) -> Self {
        DownloadResult::Success {
            path,
            message: MSG_DOWNLOADED.to_string(),
        }
    }

    pub fn already_exists(path: PathBuf) -> Self {
        DownloadResult::Success {
            path,
            message: MSG_ALREADY_EXISTS.to_string(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        DownloadResult::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DownloadResult::Success { .. })
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            DownloadResult::Success { path, .. } => Some(path),
            DownloadResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DownloadResult::Success { .. } => None,
            DownloadResult::Failure { error } => Some(error),
        }
    }
}

impl Serialize for DownloadResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DownloadResult::Success { path, message } => {
                let mut s = serializer.serialize_struct("DownloadResult", 3)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("path", &path.to_string_lossy())?;
                s.serialize_field("message", message)?;
                s.end()
            }
            DownloadResult::Failure { error } => {
                let mut s = serializer.serialize_struct("DownloadResult", 2)?;
                s.serialize_field("success", &false)?;
                s.serialize_field("error", error)?;
                s.end()
            }
        }
    }
}

/// Outcome of transcribing a downloaded audio file.
///
/// Serializes as `{success, transcript, path}` or `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionResult {
    Success { transcript: String, path: PathBuf },
    Failure { error: String },
}

impl TranscriptionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TranscriptionResult::Success { .. })
    }
}

impl Serialize for TranscriptionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TranscriptionResult::Success { transcript, path } => {
                let mut s = serializer.serialize_struct("TranscriptionResult", 3)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("transcript", transcript)?;
                s.serialize_field("path", &path.to_string_lossy())?;
                s.end()
            }
            TranscriptionResult::Failure { error } => {
                let mut s = serializer.serialize_struct("TranscriptionResult", 2)?;
                s.serialize_field("success", &false)?;
                s.serialize_field("error", error)?;
                s.end()
            }
        }
    }
}
