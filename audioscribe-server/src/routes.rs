//! HTTP routes.

use std::path::Path;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use audioscribe::{watch_url, youtube_video_id, TranscriptionResult};

use crate::state::AppState;

pub const ERR_NOT_JSON: &str = "Request must be JSON";
pub const ERR_NO_URL: &str = "No video URL provided";
pub const ERR_NO_TRANSCRIPT: &str = "No transcript provided";
pub const ERR_INVALID_YOUTUBE_URL: &str = "Invalid YouTube URL";
pub const ERR_NO_CAPTIONS: &str = "Transcript Unavailable";
pub const MSG_NO_CAPTIONS: &str = "This video does not have available transcripts. Please try a different video or ensure closed captions are enabled.";
pub const MSG_TRANSCRIBED: &str = "Audio downloaded and transcribed successfully";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/backend", get(backend))
        .route("/api/downloadaudio", post(download_audio))
        .route("/api/summarize-transcript", post(summarize_transcript))
        .route("/api/transcribe-youtube", post(transcribe_youtube))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn backend() -> impl IntoResponse {
    Json(json!({ "message": "hello world" }))
}

async fn download_audio(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(payload)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, ERR_NOT_JSON);
    };

    let Some(video_url) = string_field(&payload, "videoUrl") else {
        return error_response(StatusCode::BAD_REQUEST, ERR_NO_URL);
    };
    let should_transcribe = payload.get("transcribe").is_some_and(is_truthy);

    info!(%video_url, should_transcribe, "download requested");

    let download = state.fetcher.fetch(video_url).await;
    let Some(audio_path) = download.path().map(Path::to_path_buf) else {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(download)).into_response();
    };

    if !should_transcribe {
        return (StatusCode::OK, Json(download)).into_response();
    }

    match state.transcriber.transcribe(&audio_path).await {
        TranscriptionResult::Success { transcript, path } => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "audio_path": display(&audio_path),
                "transcript": transcript,
                "transcript_path": display(&path),
                "message": MSG_TRANSCRIBED,
            })),
        )
            .into_response(),
        TranscriptionResult::Failure { error } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "audio_path": display(&audio_path),
                "error": format!("Audio downloaded but transcription failed: {error}"),
            })),
        )
            .into_response(),
    }
}

async fn summarize_transcript(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(payload)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, ERR_NOT_JSON);
    };

    let Some(transcript) = string_field(&payload, "transcript").filter(|t| !t.trim().is_empty())
    else {
        return error_response(StatusCode::BAD_REQUEST, ERR_NO_TRANSCRIPT);
    };

    match state.summarizer.summarize(transcript).await {
        Ok(summary) => (StatusCode::OK, Json(json!({ "summary": summary }))).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn transcribe_youtube(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(payload)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, ERR_NOT_JSON);
    };

    let Some(video_url) = string_field(&payload, "videoUrl") else {
        return error_response(StatusCode::BAD_REQUEST, ERR_NO_URL);
    };
    let Some(video_id) = youtube_video_id(video_url) else {
        return error_response(StatusCode::BAD_REQUEST, ERR_INVALID_YOUTUBE_URL);
    };

    info!(%video_id, "caption transcript requested");

    match state.source.captions(&watch_url(video_id)).await {
        Ok(Some(transcript)) => {
            (StatusCode::OK, Json(json!({ "transcript": transcript }))).into_response()
        }
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": ERR_NO_CAPTIONS, "message": MSG_NO_CAPTIONS })),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn internal_error(e: impl std::fmt::Display) -> Response {
    error!(error = %e, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal server error",
            "details": e.to_string(),
        })),
    )
        .into_response()
}

/// A non-empty string field of a JSON object.
fn string_field<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// JSON truthiness: false, null, 0, "", [] and {} are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
