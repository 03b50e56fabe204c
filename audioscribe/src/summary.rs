use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SummaryOptions;
use crate::error::{Error, Result};

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

const SUMMARY_INSTRUCTIONS: &str = "\
Your goal is to assist with summarizing YouTube videos.
I will provide you with a YouTube video transcription and you will give me a concise summary. Here are your requirements on how you need to summarize:
1. Identify Key Points: Scan the entire transcription to pinpoint the main ideas or arguments presented in the video.
2. Organize Information: Arrange these key points logically. For instructional or educational videos, organize them in a step-by-step or chronological order. For other video types, group similar ideas together for coherence.
3. Summarize Each Point: Distill the essence of what is said about each point in the video, omitting redundant or non-essential information.
4. Bullet-Point Format: Present the summary in a bullet-point format for easy reading and quick scanning of the main ideas.
5. Revise for Clarity and Brevity: Review the summary to ensure it is clear, concise, and accurately represents the content of the video.
Here is the transcript for you to summarize:";

/// Produces a short summary of a transcript.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: &str) -> Result<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Summarizer backed by an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    options: SummaryOptions,
}

impl OpenAiSummarizer {
    pub fn new(options: SummaryOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()?;
        Ok(Self { client, options })
    }
}

/// The user message sent for `transcript`.
pub fn summary_prompt(transcript: &str) -> String {
    format!("{SUMMARY_INSTRUCTIONS}\n\"{transcript}\"")
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, transcript: &str) -> Result<String> {
        let api_key = self
            .options
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config("no API key configured for summaries".into()))?;

        info!(model = %self.options.model, chars = transcript.len(), "requesting summary");

        let request = ChatRequest {
            model: &self.options.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: summary_prompt(transcript),
                },
            ],
        };

        let response = self
            .client
            .post(self.options.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        parse_response(response).await
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

    let parsed: ChatResponse = serde_json::from_str(&body)?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| Error::Summary("response contained no message".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_transcript_in_quotes() {
        let prompt = summary_prompt("we talked about lifetimes");
        assert!(prompt.starts_with("Your goal is to assist"));
        assert!(prompt.ends_with("\"we talked about lifetimes\""));
    }

    #[test]
    fn test_request_serializes_messages() {
        let request = ChatRequest {
            model: "gpt-4o",
            messages: vec![ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT.into(),
            }],
        };
        let v = serde_json::to_value(&request).unwrap();
        assert_eq!(v["model"], "gpt-4o");
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][0]["content"], "You are a helpful assistant.");
    }

    #[test]
    fn test_response_takes_first_choice() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "- point"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("- point"));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let summarizer = OpenAiSummarizer::new(SummaryOptions::default()).unwrap();
        let err = summarizer.summarize("text").await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    async fn summarizer_replying(status: u16, body: &'static str) -> OpenAiSummarizer {
        let status = axum::http::StatusCode::from_u16(status).unwrap();
        let app = axum::Router::new().route(
            "/v1/chat/completions",
            axum::routing::post(move || async move { (status, body) }),
        );
        let base_url = crate::testing::serve(app).await;
        OpenAiSummarizer::new(
            SummaryOptions::new()
                .base_url(&format!("{base_url}/v1"))
                .unwrap()
                .api_key("sk-test"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_summarize_against_server() {
        let summarizer = summarizer_replying(
            200,
            r#"{"choices": [{"message": {"role": "assistant", "content": "- borrowing"}}]}"#,
        )
        .await;
        assert_eq!(summarizer.summarize("talk").await.unwrap(), "- borrowing");
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let summarizer = summarizer_replying(401, "invalid api key").await;
        match summarizer.summarize("talk").await.unwrap_err() {
            Error::Api { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_summary_error() {
        let summarizer = summarizer_replying(200, r#"{"choices": []}"#).await;
        let err = summarizer.summarize("talk").await.unwrap_err();
        assert!(matches!(err, Error::Summary(_)));
    }

    #[tokio::test]
    async fn test_null_content_is_summary_error() {
        let summarizer = summarizer_replying(
            200,
            r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#,
        )
        .await;
        let err = summarizer.summarize("talk").await.unwrap_err();
        assert!(matches!(err, Error::Summary(_)));
    }
}
