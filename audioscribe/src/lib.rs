//! Video URL in, cached audio track and transcript out.
//!
//! **audioscribe** resolves a video URL (via yt-dlp), stores its best
//! audio-only stream under `<project>/audio/`, and optionally sends it to an
//! OpenAI-compatible speech-to-text endpoint, writing the text to
//! `<project>/transcripts/`. Both steps skip work whose artifact already
//! exists on disk.
//!
//! # Quick start
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # #[tokio::main]
//! # async fn main() -> audioscribe::Result<()> {
//! use audioscribe::{AudioFetcher, FetchOptions, FsStore, OpenAiWhisper, Transcriber, WhisperOptions, YtDlpSource};
//!
//! let store = Arc::new(FsStore::new("media"));
//! let fetcher = AudioFetcher::new(Arc::new(YtDlpSource::default()), store.clone(), &FetchOptions::default());
//!
//! let download = fetcher.fetch("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await;
//! if let Some(path) = download.path() {
//!     let whisper = OpenAiWhisper::new(WhisperOptions::new().api_key("sk-..."))?;
//!     let transcript = Transcriber::new(Arc::new(whisper), store).transcribe(path).await;
//!     println!("{}", serde_json::to_string_pretty(&transcript)?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod captions;
pub mod config;
pub mod error;
pub mod fetch;
pub mod retry;
pub mod source;
pub mod store;
pub mod stt;
pub mod summary;
pub mod title;
pub mod transcribe;
pub mod types;

#[cfg(test)]
mod testing;

pub use captions::{watch_url, youtube_video_id};
pub use config::{FetchOptions, SummaryOptions, WhisperOptions};
pub use error::{Error, FetchError, Result};
pub use fetch::AudioFetcher;
pub use retry::{retry, RetryPolicy, Retryable};
pub use source::{MediaSource, YtDlpSource};
pub use store::{ArtifactStore, FsStore};
pub use stt::{OpenAiWhisper, SpeechToText};
pub use summary::{OpenAiSummarizer, Summarizer};
pub use title::{artifact_layout, sanitize_title, ArtifactLayout};
pub use transcribe::Transcriber;
pub use types::{DownloadResult, TranscriptionResult, VideoInfo};
