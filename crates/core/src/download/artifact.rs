//! Per-request scratch directories.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Scratch directory owned by one request. Removed with everything in it
/// when dropped.
#[derive(Debug)]
pub struct TempArtifact {
    dir: tempfile::TempDir,
}

impl TempArtifact {
    /// Create a fresh directory under `scratch_root`, creating the root if
    /// needed.
    pub fn create(scratch_root: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(scratch_root)?;
        let dir = tempfile::Builder::new()
            .prefix("dl-")
            .tempdir_in(scratch_root)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a file inside the directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Remove scratch entries not modified for longer than `ttl`.
///
/// Returns how many entries were removed. A missing root is not an error.
pub async fn sweep_stale(scratch_root: &Path, ttl: Duration) -> std::io::Result<usize> {
    let mut entries = match tokio::fs::read_dir(scratch_root).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let now = SystemTime::now();
    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let metadata = match entry.metadata().await {
            Ok(m) => m,
            Err(_) => continue,
        };
        let age = metadata
            .modified()
            .ok()
            .and_then(|m| now.duration_since(m).ok())
            .unwrap_or_default();
        if age <= ttl {
            continue;
        }

        let result = if metadata.is_dir() {
            tokio::fs::remove_dir_all(entry.path()).await
        } else {
            tokio::fs::remove_file(entry.path()).await
        };
        match result {
            Ok(()) => removed += 1,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "Failed to remove stale scratch entry")
            }
        }
    }

    Ok(removed)
}
