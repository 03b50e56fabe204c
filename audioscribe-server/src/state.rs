use std::sync::Arc;

use anyhow::Result;
use audioscribe::{
    AudioFetcher, FsStore, MediaSource, OpenAiSummarizer, OpenAiWhisper, Summarizer, Transcriber,
    YtDlpSource,
};
use tracing::warn;

use crate::config::Cli;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn MediaSource>,
    pub fetcher: AudioFetcher,
    pub transcriber: Transcriber,
    pub summarizer: Arc<dyn Summarizer>,
}

impl AppState {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if cli.openai_api_key.is_none() {
            warn!("OPENAI_API_KEY is not set; transcription and summaries will fail");
        }

        let fetch_options = cli.fetch_options()?;
        let source: Arc<dyn MediaSource> = Arc::new(YtDlpSource::from_options(&fetch_options));
        let store = Arc::new(FsStore::new(&cli.output_root));
        let fetcher = AudioFetcher::new(source.clone(), store.clone(), &fetch_options);
        let transcriber = Transcriber::new(
            Arc::new(OpenAiWhisper::new(cli.whisper_options()?)?),
            store,
        );
        let summarizer = Arc::new(OpenAiSummarizer::new(cli.summary_options()?)?);

        Ok(Self {
            source,
            fetcher,
            transcriber,
            summarizer,
        })
    }
}
