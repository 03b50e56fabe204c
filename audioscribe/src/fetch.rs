use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use crate::config::FetchOptions;
use crate::error::FetchError;
use crate::retry::{retry, RetryPolicy};
use crate::source::MediaSource;
use crate::store::ArtifactStore;
use crate::title::artifact_layout;
use crate::types::DownloadResult;

pub const AUDIO_DIR: &str = "audio";
pub const MSG_UNAVAILABLE: &str = "Video unavailable after multiple attempts";

/// Downloads audio for a URL into `<project>/audio/`, skipping the
/// download when the file is already there.
#[derive(Clone)]
pub struct AudioFetcher {
    source: Arc<dyn MediaSource>,
    store: Arc<dyn ArtifactStore>,
    policy: RetryPolicy,
}

enum Fetched {
    Downloaded(PathBuf),
    Cached(PathBuf),
}

impl AudioFetcher {
    pub fn new(
        source: Arc<dyn MediaSource>,
        store: Arc<dyn ArtifactStore>,
        options: &FetchOptions,
    ) -> Self {
        Self {
            source,
            store,
            policy: options.retry,
        }
    }

    /// Fetch the audio for `url`. Never fails; errors are folded into
    /// [`DownloadResult::Failure`].
    pub async fn fetch(&self, url: &str) -> DownloadResult {
        let outcome = retry(&self.policy, |attempt| {
            info!(attempt, %url, "fetching audio");
            self.fetch_once(url)
        })
        .await;

        match outcome {
            Ok(Fetched::Downloaded(path)) => DownloadResult::downloaded(path),
            Ok(Fetched::Cached(path)) => DownloadResult::already_exists(path),
            Err(FetchError::Unavailable(_)) => {
                error!(%url, "video unavailable, giving up");
                DownloadResult::failure(MSG_UNAVAILABLE)
            }
            Err(e) => {
                error!(%url, error = %e, "download failed, giving up");
                DownloadResult::failure(format!("Failed to download: {e}"))
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<Fetched, FetchError> {
        let info = self.source.resolve(url).await?;
        let layout = artifact_layout(&info.title);

        let dir = Path::new(&layout.project).join(AUDIO_DIR);
        self.store.ensure_dir(&dir)?;

        let audio_path = dir.join(&layout.file_name);
        if self.store.exists(&audio_path) {
            info!(path = %audio_path.display(), "audio already exists, skipping download");
            return Ok(Fetched::Cached(audio_path));
        }

        let dest = self.store.local_path(&audio_path);
        self.source.download_audio(url, &dest).await?;

        info!(path = %audio_path.display(), "download successful");
        Ok(Fetched::Downloaded(audio_path))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::store::FsStore;
    use crate::types::{VideoInfo, MSG_ALREADY_EXISTS, MSG_DOWNLOADED};

    /// Source that fails a scripted number of times, then writes a fake file.
    struct ScriptedSource {
        title: String,
        failures: Mutex<Vec<FetchError>>,
        resolves: AtomicU32,
        downloads: AtomicU32,
    }

    impl ScriptedSource {
        fn new(title: &str, failures: Vec<FetchError>) -> Arc<Self> {
            Arc::new(Self {
                title: title.to_string(),
                failures: Mutex::new(failures),
                resolves: AtomicU32::new(0),
                downloads: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl MediaSource for ScriptedSource {
        async fn resolve(&self, _url: &str) -> Result<VideoInfo, FetchError> {
            self.resolves.fetch_add(1, Ordering::SeqCst);
            let mut failures = self.failures.lock().unwrap();
            if !failures.is_empty() {
                return Err(failures.remove(0));
            }
            Ok(VideoInfo {
                title: self.title.clone(),
                id: None,
                duration: None,
            })
        }

        async fn download_audio(&self, _url: &str, dest: &Path) -> Result<(), FetchError> {
            self.downloads.fetch_add(1, Ordering::SeqCst);
            std::fs::write(dest, b"ID3fake")?;
            Ok(())
        }
    }

    fn fetcher(source: Arc<ScriptedSource>, root: &Path, attempts: u32) -> AudioFetcher {
        let options = FetchOptions::new()
            .retry_delay(std::time::Duration::ZERO)
            .max_attempts(attempts)
            .unwrap();
        AudioFetcher::new(source, Arc::new(FsStore::new(root)), &options)
    }

    #[tokio::test]
    async fn test_fetch_downloads_into_project_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let source = ScriptedSource::new("Rust Course - Part 3", vec![]);
        let result = fetcher(source.clone(), tmp.path(), 5)
            .fetch("https://example.com/v")
            .await;

        assert_eq!(
            result,
            DownloadResult::Success {
                path: PathBuf::from("Rust Course/audio/Part 3.mp3"),
                message: MSG_DOWNLOADED.into(),
            }
        );
        assert!(tmp.path().join("Rust Course/audio/Part 3.mp3").is_file());
        assert_eq!(source.downloads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_fetch_is_cache_hit() {
        let tmp = tempfile::tempdir().unwrap();
        let source = ScriptedSource::new("Standalone talk", vec![]);
        let f = fetcher(source.clone(), tmp.path(), 5);

        let first = f.fetch("https://example.com/v").await;
        let second = f.fetch("https://example.com/v").await;

        assert!(first.is_success());
        assert_eq!(
            second,
            DownloadResult::Success {
                path: PathBuf::from("Downloads/audio/Standalone talk.mp3"),
                message: MSG_ALREADY_EXISTS.into(),
            }
        );
        assert_eq!(source.downloads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_succeeds_on_fifth_attempt() {
        let tmp = tempfile::tempdir().unwrap();
        let failures = (0..4)
            .map(|_| FetchError::Unavailable("try again later".into()))
            .collect();
        let source = ScriptedSource::new("Flaky", failures);
        let result = fetcher(source.clone(), tmp.path(), 5)
            .fetch("https://example.com/v")
            .await;

        assert!(result.is_success());
        assert_eq!(result.error(), None);
        assert_eq!(source.resolves.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_unavailable_on_every_attempt() {
        let tmp = tempfile::tempdir().unwrap();
        let failures = (0..5)
            .map(|_| FetchError::Unavailable("gone".into()))
            .collect();
        let source = ScriptedSource::new("Gone", failures);
        let result = fetcher(source.clone(), tmp.path(), 5)
            .fetch("https://example.com/v")
            .await;

        assert_eq!(result, DownloadResult::failure(MSG_UNAVAILABLE));
        assert_eq!(source.resolves.load(Ordering::SeqCst), 5);
        assert_eq!(source.downloads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generic_failure_embeds_cause() {
        let tmp = tempfile::tempdir().unwrap();
        let failures = (0..5)
            .map(|_| FetchError::Failed("yt-dlp failed: HTTP Error 403".into()))
            .collect();
        let source = ScriptedSource::new("Blocked", failures);
        let result = fetcher(source, tmp.path(), 5)
            .fetch("https://example.com/v")
            .await;

        assert_eq!(
            result,
            DownloadResult::failure("Failed to download: yt-dlp failed: HTTP Error 403")
        );
    }

    #[tokio::test]
    async fn test_kind_of_last_failure_decides_message() {
        let tmp = tempfile::tempdir().unwrap();
        let failures = vec![
            FetchError::Unavailable("gone".into()),
            FetchError::Failed("connection reset".into()),
        ];
        let source = ScriptedSource::new("Mixed", failures);
        let result = fetcher(source, tmp.path(), 2)
            .fetch("https://example.com/v")
            .await;

        assert_eq!(
            result,
            DownloadResult::failure("Failed to download: connection reset")
        );
    }

    #[tokio::test]
    async fn test_rejected_url_is_not_retried() {
        let tmp = tempfile::tempdir().unwrap();
        let source = ScriptedSource::new("unused", vec![FetchError::Rejected("bad url".into())]);
        let result = fetcher(source.clone(), tmp.path(), 5).fetch("nope").await;

        assert_eq!(result, DownloadResult::failure("Failed to download: bad url"));
        assert_eq!(source.resolves.load(Ordering::SeqCst), 1);
    }
}
