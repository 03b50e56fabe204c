//! Speech-to-text providers.
//!
//! The OpenAI Whisper API (and the compatible Groq/self-hosted servers)
//! share one request shape:
//! - Multipart form upload with `model` and `file` fields
//! - Authorization via `Bearer` token
//! - JSON response with `text` field

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::WhisperOptions;
use crate::error::{Error, Result};

/// Something that turns audio bytes into text.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<String>;
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// OpenAI-compatible transcription client.
#[derive(Debug, Clone)]
pub struct OpenAiWhisper {
    client: reqwest::Client,
    options: WhisperOptions,
}

impl OpenAiWhisper {
    pub fn new(options: WhisperOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()?;
        Ok(Self { client, options })
    }
}

#[async_trait]
impl SpeechToText for OpenAiWhisper {
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<String> {
        let api_key = self
            .options
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config("no API key configured for transcription".into()))?;

        info!(
            model = %self.options.model,
            bytes = audio.len(),
            file_name,
            "sending audio for transcription"
        );

        let form = reqwest::multipart::Form::new()
            .text("model", self.options.model.clone())
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio)
                    .file_name(file_name.to_string())
                    .mime_str(mime_for(file_name))?,
            );

        let response = self
            .client
            .post(self.options.endpoint())
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;

        let text = parse_response(response).await?;
        debug!(chars = text.len(), "transcription received");
        Ok(text)
    }
}

async fn parse_response(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(Error::Api {
            status: status.as_u16(),
            body,
        });
    }
    let parsed: TranscriptionResponse = serde_json::from_str(&body)?;
    Ok(parsed.text)
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("wav") => "audio/wav",
        Some("ogg") | Some("opus") => "audio/ogg",
        Some("webm") => "audio/webm",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}
