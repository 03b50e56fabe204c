//! Title sanitizing and project grouping.
//!
//! Multi-part uploads conventionally carry a `"- Part"` marker in their
//! title ("Rust Course - Part 3"). Everything before the marker names the
//! project directory; the remainder becomes the file name.

/// Marker that splits a series title into project and part.
pub const PART_MARKER: &str = "- Part";

/// Label the file name starts with when the title had a part marker.
pub const PART_LABEL: &str = "Part";

/// Project used for titles that do not belong to a series.
pub const DEFAULT_PROJECT: &str = "Downloads";

/// Extension appended to every audio file name.
pub const AUDIO_EXTENSION: &str = "mp3";

/// Where a title's artifacts live, relative to the storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    pub project: String,
    pub file_name: String,
}

/// Replace characters that are illegal or confusing in paths.
pub fn sanitize_title(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '/' | '\\' | '|' | '?' | '*' => out.push('-'),
            ':' | ',' => out.push_str(" -"),
            '"' => out.push('\''),
            '.' => {}
            other => out.push(other),
        }
    }
    out
}

/// Derive the project directory and audio file name for a raw title.
pub fn artifact_layout(raw: &str) -> ArtifactLayout {
    let title = sanitize_title(raw);

    match title.split_once(PART_MARKER) {
        Some((project, part)) => ArtifactLayout {
            project: project.trim().to_string(),
            file_name: format!("{PART_LABEL}{part}.{AUDIO_EXTENSION}"),
        },
        None => ArtifactLayout {
            project: DEFAULT_PROJECT.to_string(),
            file_name: format!("{title}.{AUDIO_EXTENSION}"),
        },
    }
}
