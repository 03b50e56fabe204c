use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::captions::{caption_text, select_track, CaptionTracks};
use crate::config::FetchOptions;
use crate::error::FetchError;
use crate::types::VideoInfo;

/// Maximum stderr characters carried into error messages.
const STDERR_LIMIT: usize = 1000;

/// Substrings in yt-dlp output that mean the video cannot be served right now.
const UNAVAILABLE_MARKERS: &[&str] = &[
    "Video unavailable",
    "This video is unavailable",
    "This video is not available",
    "HTTP Error 503",
];

/// Caption language tried before any other.
const CAPTION_LANGUAGE: &str = "en";

/// A provider of video metadata and audio streams.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Look up metadata for `url` without downloading anything.
    async fn resolve(&self, url: &str) -> Result<VideoInfo, FetchError>;

    /// Download the best audio-only stream of `url` to exactly `dest`.
    async fn download_audio(&self, url: &str, dest: &Path) -> Result<(), FetchError>;

    /// Plain text of the video's captions, or `None` when it has none.
    async fn captions(&self, _url: &str) -> Result<Option<String>, FetchError> {
        Ok(None)
    }
}

/// [`MediaSource`] backed by the `yt-dlp` command line tool.
///
/// # Security
/// - URL is validated to start with http:// or https://
/// - Arguments are passed via `.arg()` (no shell expansion)
/// - `--no-exec` prevents yt-dlp from running post-processing commands
#[derive(Debug, Clone)]
pub struct YtDlpSource {
    bin: PathBuf,
    client: reqwest::Client,
}

impl YtDlpSource {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_options(options: &FetchOptions) -> Self {
        Self::new(options.ytdlp_bin.clone())
    }

    /// Raw `--dump-json` metadata for `url`.
    async fn dump_json(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        validate_url(url)?;
        debug!(%url, "resolving metadata");
        self.run(
            Command::new(&self.bin)
                .args(["--dump-json", "--no-download", "--no-exec", "--no-playlist"])
                .arg(url),
        )
        .await
    }

    async fn run(&self, command: &mut Command) -> Result<Vec<u8>, FetchError> {
        let output = command.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::Failed(format!(
                    "{} not found (install with: pip install yt-dlp)",
                    self.bin.display()
                ))
            } else {
                FetchError::from(e)
            }
        })?;

        if !output.status.success() {
            return Err(classify_failure(&output.stderr));
        }
        Ok(output.stdout)
    }
}

impl Default for YtDlpSource {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

#[async_trait]
impl MediaSource for YtDlpSource {
    async fn resolve(&self, url: &str) -> Result<VideoInfo, FetchError> {
        let stdout = self.dump_json(url).await?;
        serde_json::from_slice(&stdout)
            .map_err(|e| FetchError::Failed(format!("could not parse yt-dlp metadata: {e}")))
    }

    async fn download_audio(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        validate_url(url)?;
        let template = output_template(dest)?;

        info!(%url, dest = %dest.display(), "downloading audio");

        self.run(
            Command::new(&self.bin)
                .args([
                    "--format",
                    "bestaudio/best",
                    "--extract-audio",
                    "--audio-format",
                    "mp3",
                    "--audio-quality",
                    "0",
                    "--no-playlist",
                    "--no-exec",
                    "--output",
                    &template,
                ])
                .arg(url),
        )
        .await?;

        if !dest.is_file() {
            return Err(FetchError::Failed(format!(
                "downloaded file not found at {}",
                dest.display()
            )));
        }

        debug!(path = %dest.display(), "audio downloaded");
        Ok(())
    }

    async fn captions(&self, url: &str) -> Result<Option<String>, FetchError> {
        let stdout = self.dump_json(url).await?;
        let tracks: CaptionTracks = serde_json::from_slice(&stdout)
            .map_err(|e| FetchError::Failed(format!("could not parse yt-dlp metadata: {e}")))?;

        let Some(track) = select_track(&tracks, CAPTION_LANGUAGE) else {
            info!(%url, "video has no captions");
            return Ok(None);
        };
        info!(%url, language = %track.language, automatic = track.automatic, "fetching captions");

        let response = self
            .client
            .get(&track.url)
            .send()
            .await
            .map_err(|e| FetchError::Failed(format!("caption request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Failed(format!(
                "caption request failed with status {status}"
            )));
        }
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Failed(format!("caption request failed: {e}")))?;

        let text = caption_text(&body)
            .map_err(|e| FetchError::Failed(format!("could not parse captions: {e}")))?;
        Ok(Some(text).filter(|t| !t.is_empty()))
    }
}

/// Validate that a string looks like a URL.
/// Rejects anything that isn't http:// or https://.
pub fn validate_url(url: &str) -> Result<(), FetchError> {
    let trimmed = url.trim();
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        Ok(())
    } else {
        Err(FetchError::Rejected(format!(
            "invalid URL (must start with http:// or https://): {trimmed}"
        )))
    }
}

/// yt-dlp output template that lands the extracted audio at `dest`.
///
/// yt-dlp picks the extension itself after conversion, so the template is
/// `dest` without extension plus `.%(ext)s`. Literal `%` must be doubled.
fn output_template(dest: &Path) -> Result<String, FetchError> {
    let stem = dest.with_extension("");
    let stem = stem.to_str().ok_or_else(|| {
        FetchError::Failed("output path contains invalid UTF-8".into())
    })?;
    Ok(format!("{}.%(ext)s", stem.replace('%', "%%")))
}

/// Sort a failed run into a [`FetchError`] kind.
///
/// Markers are matched against the whole of stderr. The message keeps the
/// `ERROR:` lines when there are any (yt-dlp prints warnings first), and at
/// most the last [`STDERR_LIMIT`] characters of that.
fn classify_failure(stderr: &[u8]) -> FetchError {
    let stderr = String::from_utf8_lossy(stderr);
    let stderr = stderr.trim();

    let errors: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("ERROR:"))
        .collect();
    let message = if errors.is_empty() {
        stderr.to_string()
    } else {
        errors.join("\n")
    };
    let message = tail(&message, STDERR_LIMIT).to_string();

    if UNAVAILABLE_MARKERS.iter().any(|m| stderr.contains(m)) {
        FetchError::Unavailable(message)
    } else {
        FetchError::Failed(format!("yt-dlp failed: {message}"))
    }
}

/// The last `limit` characters of `s`.
fn tail(s: &str, limit: usize) -> &str {
    let count = s.chars().count();
    if count <= limit {
        return s;
    }
    match s.char_indices().nth(count - limit) {
        Some((i, _)) => &s[i..],
        None => s,
    }
}
