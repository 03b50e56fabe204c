use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use audioscribe::{FetchOptions, SummaryOptions, WhisperOptions};
use clap::Parser;

/// Every flag can also come from the environment (or a `.env` file).
#[derive(Debug, Clone, Parser)]
#[command(name = "audioscribe-server", about = "Download and transcribe video audio over HTTP")]
pub struct Cli {
    /// Address to listen on.
    #[arg(long, env = "AUDIOSCRIBE_LISTEN", default_value = "127.0.0.1:5555")]
    pub listen: String,

    /// Directory that project folders are created in.
    #[arg(long, env = "AUDIOSCRIBE_OUTPUT_ROOT", default_value = ".")]
    pub output_root: PathBuf,

    /// yt-dlp executable.
    #[arg(long, env = "AUDIOSCRIBE_YTDLP_BIN", default_value = "yt-dlp")]
    pub ytdlp_bin: PathBuf,

    /// Download attempts before giving up.
    #[arg(long, env = "AUDIOSCRIBE_MAX_ATTEMPTS", default_value_t = 5)]
    pub max_attempts: u32,

    /// Seconds to wait between download attempts.
    #[arg(long, env = "AUDIOSCRIBE_RETRY_DELAY_SECS", default_value_t = 5)]
    pub retry_delay_secs: u64,

    /// API key for transcription and summaries.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = audioscribe::config::OPENAI_BASE_URL)]
    pub openai_base_url: String,

    /// Speech-to-text model.
    #[arg(long, env = "AUDIOSCRIBE_WHISPER_MODEL", default_value = "whisper-1")]
    pub whisper_model: String,

    /// Chat model used for summaries.
    #[arg(long, env = "AUDIOSCRIBE_SUMMARY_MODEL", default_value = "gpt-4o")]
    pub summary_model: String,
}

impl Cli {
    pub fn fetch_options(&self) -> Result<FetchOptions> {
        Ok(FetchOptions::new()
            .ytdlp_bin(&self.ytdlp_bin)
            .retry_delay(Duration::from_secs(self.retry_delay_secs))
            .max_attempts(self.max_attempts)
            .context("invalid --max-attempts")?)
    }

    pub fn whisper_options(&self) -> Result<WhisperOptions> {
        let mut opts = WhisperOptions::new()
            .base_url(&self.openai_base_url)
            .context("invalid --openai-base-url")?
            .model(&self.whisper_model);
        if let Some(key) = &self.openai_api_key {
            opts = opts.api_key(key);
        }
        Ok(opts)
    }

    pub fn summary_options(&self) -> Result<SummaryOptions> {
        let mut opts = SummaryOptions::new()
            .base_url(&self.openai_base_url)
            .context("invalid --openai-base-url")?
            .model(&self.summary_model);
        if let Some(key) = &self.openai_api_key {
            opts = opts.api_key(key);
        }
        Ok(opts)
    }
}
