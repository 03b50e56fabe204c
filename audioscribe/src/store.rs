//! Storage for downloaded audio and transcripts.
//!
//! The fetch and transcribe steps treat "an artifact exists at this path"
//! as the only cache signal. They go through [`ArtifactStore`] so the
//! backing store can change without touching either step.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// Minimal storage surface the pipeline needs.
///
/// Paths are relative to whatever root the implementation chooses.
/// `exists` followed by a write is not atomic.
pub trait ArtifactStore: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    /// Create `dir` and its parents. Succeeds if it already exists.
    fn ensure_dir(&self, dir: &Path) -> Result<()>;

    fn read_text(&self, path: &Path) -> Result<String>;

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;

    fn write_text(&self, path: &Path, text: &str) -> Result<()>;

    /// Location on the local filesystem, for external tools that write
    /// the artifact themselves.
    fn local_path(&self, path: &Path) -> PathBuf;
}

/// Filesystem store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl Default for FsStore {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ArtifactStore for FsStore {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_file()
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        let full = self.resolve(dir);
        std::fs::create_dir_all(&full)?;
        debug!(dir = %full.display(), "directory ready");
        Ok(())
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        Ok(std::fs::read_to_string(self.resolve(path))?)
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.resolve(path))?)
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        Ok(std::fs::write(self.resolve(path), text)?)
    }

    fn local_path(&self, path: &Path) -> PathBuf {
        self.resolve(path)
    }
}
