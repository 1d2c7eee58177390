//! Mock fetcher for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::lock;
use crate::fetcher::{FetchError, MediaFetcher, ProgressFn};
use crate::resolver::ResolvedStream;

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    pub url: String,
    pub dest: PathBuf,
}

/// Mock implementation of the MediaFetcher trait.
///
/// Writes a fixed body to the destination and reports progress at the start
/// and the end, or fails with a configured HTTP status.
#[derive(Debug)]
pub struct MockFetcher {
    body: Arc<Mutex<Vec<u8>>>,
    fail_status: Arc<Mutex<Option<u16>>>,
    fetches: Arc<Mutex<Vec<RecordedFetch>>>,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetcher {
    /// Bytes written when no body was configured.
    pub const DEFAULT_BODY: &'static [u8] = b"\x00\x00\x00\x18ftypmp42 fake media bytes";

    pub fn new() -> Self {
        Self {
            body: Arc::new(Mutex::new(Self::DEFAULT_BODY.to_vec())),
            fail_status: Arc::new(Mutex::new(None)),
            fetches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_body(&self, body: impl Into<Vec<u8>>) {
        *lock(&self.body) = body.into();
    }

    /// Make every fetch fail with this status, or succeed again with `None`.
    pub fn set_fail_status(&self, status: Option<u16>) {
        *lock(&self.fail_status) = status;
    }

    pub fn call_count(&self) -> usize {
        lock(&self.fetches).len()
    }

    pub fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        lock(&self.fetches).clone()
    }
}

#[async_trait]
impl MediaFetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(
        &self,
        source: &ResolvedStream,
        dest: &Path,
        progress: &ProgressFn<'_>,
    ) -> Result<u64, FetchError> {
        lock(&self.fetches).push(RecordedFetch {
            url: source.media_url.clone(),
            dest: dest.to_path_buf(),
        });

        if let Some(status) = *lock(&self.fail_status) {
            return Err(FetchError::Http { status });
        }

        let body = lock(&self.body).clone();
        let total = Some(body.len() as u64);
        progress(0, total);
        tokio::fs::write(dest, &body).await?;
        progress(body.len() as u64, total);

        Ok(body.len() as u64)
    }
}
