//! Caption transcripts from YouTube.
//!
//! yt-dlp lists caption tracks in its `--dump-json` metadata under
//! `subtitles` (uploader provided) and `automatic_captions` (speech
//! recognition). Each track offers several formats; only `json3` is read.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

const CAPTION_FORMAT: &str = "json3";

static VIDEO_ID: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/ ]{11})"#,
    )
    .ok()
});

/// The 11-character video ID in a YouTube watch, embed, shorts or
/// `youtu.be` URL.
pub fn youtube_video_id(url: &str) -> Option<&str> {
    let re = VIDEO_ID.as_ref()?;
    re.captures(url)?.get(1).map(|m| m.as_str())
}

/// Canonical watch URL for a video ID.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

#[derive(Debug, Default, Deserialize)]
pub struct CaptionTracks {
    #[serde(default)]
    pub subtitles: BTreeMap<String, Vec<CaptionFormat>>,
    #[serde(default)]
    pub automatic_captions: BTreeMap<String, Vec<CaptionFormat>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionFormat {
    pub ext: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    pub language: String,
    pub url: String,
    pub automatic: bool,
}

/// Pick the track to read, in this order: uploaded captions in `language`,
/// automatic captions in `language`, any uploaded captions, automatic
/// captions in the spoken (`-orig`) language.
pub fn select_track(tracks: &CaptionTracks, language: &str) -> Option<CaptionTrack> {
    let wanted = |lang: &str| {
        lang == language
            || lang
                .strip_prefix(language)
                .is_some_and(|rest| rest.starts_with('-'))
    };

    find(&tracks.subtitles, wanted, false)
        .or_else(|| find(&tracks.automatic_captions, wanted, true))
        .or_else(|| find(&tracks.subtitles, |_| true, false))
        .or_else(|| find(&tracks.automatic_captions, |l| l.ends_with("-orig"), true))
}

fn find(
    tracks: &BTreeMap<String, Vec<CaptionFormat>>,
    matches: impl Fn(&str) -> bool,
    automatic: bool,
) -> Option<CaptionTrack> {
    tracks
        .iter()
        .filter(|(lang, _)| matches(lang))
        .find_map(|(lang, formats)| {
            formats
                .iter()
                .find(|f| f.ext == CAPTION_FORMAT)
                .map(|f| CaptionTrack {
                    language: lang.clone(),
                    url: f.url.clone(),
                    automatic,
                })
        })
}

#[derive(Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Deserialize)]
struct Json3Event {
    #[serde(default)]
    segs: Vec<Json3Segment>,
}

#[derive(Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: String,
}

/// Plain text of a `json3` caption document, one space between cues.
pub fn caption_text(json3: &str) -> serde_json::Result<String> {
    let doc: Json3 = serde_json::from_str(json3)?;
    let cues: Vec<String> = doc
        .events
        .iter()
        .map(|event| {
            let cue: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            cue.replace('\n', " ").trim().to_string()
        })
        .filter(|cue| !cue.is_empty())
        .collect();
    Ok(cues.join(" "))
}
