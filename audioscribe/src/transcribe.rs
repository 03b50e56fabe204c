use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use crate::error::{Error, Result};
use crate::fetch::AUDIO_DIR;
use crate::store::ArtifactStore;
use crate::stt::SpeechToText;
use crate::types::TranscriptionResult;

pub const TRANSCRIPTS_DIR: &str = "transcripts";
pub const TRANSCRIPT_EXTENSION: &str = "txt";

/// Turns a downloaded audio file into a cached transcript next to it.
#[derive(Clone)]
pub struct Transcriber {
    engine: Arc<dyn SpeechToText>,
    store: Arc<dyn ArtifactStore>,
}

impl Transcriber {
    pub fn new(engine: Arc<dyn SpeechToText>, store: Arc<dyn ArtifactStore>) -> Self {
        Self { engine, store }
    }

    /// Transcribe `audio_path`, reusing an existing transcript if present.
    /// Never fails; errors are folded into [`TranscriptionResult::Failure`].
    pub async fn transcribe(&self, audio_path: &Path) -> TranscriptionResult {
        info!(path = %audio_path.display(), "transcribing audio");
        match self.transcribe_inner(audio_path).await {
            Ok((transcript, path)) => TranscriptionResult::Success { transcript, path },
            Err(e) => {
                error!(path = %audio_path.display(), error = %e, "transcription failed");
                TranscriptionResult::Failure {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn transcribe_inner(&self, audio_path: &Path) -> Result<(String, PathBuf)> {
        let transcript_path = transcript_path_for(audio_path)?;
        if let Some(dir) = transcript_path.parent() {
            self.store.ensure_dir(dir)?;
        }

        if self.store.exists(&transcript_path) {
            info!(path = %transcript_path.display(), "transcript already exists");
            let text = self.store.read_text(&transcript_path)?;
            return Ok((text, transcript_path));
        }

        if !self.store.exists(audio_path) {
            return Err(Error::AudioNotFound {
                path: audio_path.to_path_buf(),
            });
        }

        let audio = self.store.read_bytes(audio_path)?;
        let file_name = audio_path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.mp3".into());

        let text = self.engine.transcribe(audio, &file_name).await?;
        self.store.write_text(&transcript_path, &text)?;

        info!(path = %transcript_path.display(), "transcription saved");
        Ok((text, transcript_path))
    }
}

/// `<project>/audio/<name>.mp3` → `<project>/transcripts/<name>.txt`.
///
/// The last `audio` component of the parent directory is swapped for
/// `transcripts`. Without one, the transcript sits beside the audio file.
pub fn transcript_path_for(audio_path: &Path) -> Result<PathBuf> {
    let file_name = audio_path.file_name().ok_or_else(|| {
        Error::Transcription(format!("not a file path: {}", audio_path.display()))
    })?;
    let parent = audio_path.parent().unwrap_or_else(|| Path::new(""));

    let mut components: Vec<Component<'_>> = parent.components().collect();
    if let Some(pos) = components
        .iter()
        .rposition(|c| c.as_os_str() == OsStr::new(AUDIO_DIR))
    {
        components[pos] = Component::Normal(OsStr::new(TRANSCRIPTS_DIR));
    }

    let dir: PathBuf = components.iter().collect();
    Ok(dir.join(Path::new(file_name).with_extension(TRANSCRIPT_EXTENSION)))
}
