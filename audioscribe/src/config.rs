use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Options for the audio fetch step.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// yt-dlp executable; looked up on `PATH` unless absolute.
    pub ytdlp_bin: PathBuf,
    pub retry: RetryPolicy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            ytdlp_bin: PathBuf::from("yt-dlp"),
            retry: RetryPolicy::default(),
        }
    }
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ytdlp_bin(mut self, bin: impl Into<PathBuf>) -> Self {
        self.ytdlp_bin = bin.into();
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Result<Self> {
        if n == 0 {
            return Err(Error::Config("max_attempts must be at least 1".into()));
        }
        self.retry.max_attempts = n;
        Ok(self)
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry.delay = delay;
        self
    }
}

/// Options for an OpenAI-compatible transcription endpoint.
#[derive(Debug, Clone)]
pub struct WhisperOptions {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for WhisperOptions {
    fn default() -> Self {
        Self {
            base_url: OPENAI_BASE_URL.to_string(),
            model: "whisper-1".to_string(),
            api_key: None,
            timeout: Duration::from_secs(300),
        }
    }
}

impl WhisperOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: &str) -> Result<Self> {
        self.base_url = validate_base_url(url)?;
        Ok(self)
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/audio/transcriptions", self.base_url)
    }
}

/// Options for an OpenAI-compatible chat endpoint used for summaries.
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            base_url: OPENAI_BASE_URL.to_string(),
            model: "gpt-4o".to_string(),
            api_key: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl SummaryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: &str) -> Result<Self> {
        self.base_url = validate_base_url(url)?;
        Ok(self)
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn validate_base_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        Ok(trimmed.to_string())
    } else {
        Err(Error::Config(format!(
            "base URL must start with http:// or https://: {url}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_defaults() {
        let opts = FetchOptions::default();
        assert_eq!(opts.ytdlp_bin, PathBuf::from("yt-dlp"));
        assert_eq!(opts.retry.max_attempts, 5);
        assert_eq!(opts.retry.delay, Duration::from_secs(5));
    }

    #[test]
    fn test_fetch_builder() {
        let opts = FetchOptions::new()
            .ytdlp_bin("/opt/bin/yt-dlp")
            .retry_delay(Duration::from_millis(250))
            .max_attempts(2)
            .unwrap();
        assert_eq!(opts.ytdlp_bin, PathBuf::from("/opt/bin/yt-dlp"));
        assert_eq!(opts.retry.max_attempts, 2);
        assert_eq!(opts.retry.delay, Duration::from_millis(250));
    }

    #[test]
    fn test_fetch_rejects_zero_attempts() {
        assert!(matches!(
            FetchOptions::new().max_attempts(0),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_whisper_endpoint() {
        let opts = WhisperOptions::new()
            .base_url("http://localhost:8000/v1/")
            .unwrap();
        assert_eq!(opts.endpoint(), "http://localhost:8000/v1/audio/transcriptions");
        assert_eq!(opts.model, "whisper-1");
    }

    #[test]
    fn test_summary_endpoint_default() {
        let opts = SummaryOptions::default();
        assert_eq!(opts.endpoint(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(opts.model, "gpt-4o");
    }

    #[test]
    fn test_base_url_rejects_scheme_less() {
        assert!(WhisperOptions::new().base_url("api.openai.com/v1").is_err());
        assert!(SummaryOptions::new().base_url("").is_err());
    }
}
