//! Download progress, keyed by download id.
//!
//! Every download owns an entry. Finished entries stay readable for the
//! retention period and are then dropped by [`ProgressTracker::prune`]. The
//! tracker also remembers which entry was updated last, for pollers that do
//! not know their download id; concurrent downloads overwrite that view.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Snapshot served to pollers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProgressState {
    pub percentage: u32,
    pub downloaded: u64,
    pub total: u64,
}

impl ProgressState {
    /// `total` of `None` or zero means the size is unknown.
    pub fn new(downloaded: u64, total: Option<u64>) -> Self {
        let total = total.unwrap_or(0);
        let percentage = if total == 0 {
            0
        } else {
            (downloaded.saturating_mul(100) / total).min(100) as u32
        };
        Self {
            percentage,
            downloaded,
            total,
        }
    }
}

#[derive(Debug)]
struct ProgressEntry {
    state: ProgressState,
    finished_at: Option<Instant>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, ProgressEntry>,
    latest: Option<String>,
}

#[derive(Debug)]
pub struct ProgressTracker {
    inner: Mutex<Inner>,
    retention: Duration,
}

impl ProgressTracker {
    pub fn new(retention: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            retention,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Entries are plain values; a panic mid-update leaves them usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a download and return the handle its fetches report through.
    pub fn start(self: &Arc<Self>, id: impl Into<String>) -> ProgressHandle {
        let id = id.into();
        self.update(&id, 0, None);
        ProgressHandle {
            tracker: Arc::clone(self),
            id,
        }
    }

    /// Record bytes of a running download. The percentage stays below 100
    /// until [`ProgressTracker::complete`] is called.
    pub fn update(&self, id: &str, downloaded: u64, total: Option<u64>) {
        let mut state = ProgressState::new(downloaded, total);
        state.percentage = state.percentage.min(99);
        self.set(id, state);
    }

    /// Mark a download's file as ready to serve.
    pub fn complete(&self, id: &str) {
        let current = self.get(id).unwrap_or_default();
        let size = current.downloaded.max(current.total);
        self.set(
            id,
            ProgressState {
                percentage: 100,
                downloaded: size,
                total: size,
            },
        );
    }

    fn set(&self, id: &str, state: ProgressState) {
        let mut inner = self.lock();
        inner.entries.insert(
            id.to_string(),
            ProgressEntry {
                state,
                finished_at: None,
            },
        );
        if inner.latest.as_deref() != Some(id) {
            inner.latest = Some(id.to_string());
        }
    }

    /// Mark a download finished; it stays visible for the retention period.
    pub fn finish(&self, id: &str) {
        if let Some(entry) = self.lock().entries.get_mut(id) {
            entry.finished_at.get_or_insert_with(Instant::now);
        }
    }

    pub fn get(&self, id: &str) -> Option<ProgressState> {
        self.lock().entries.get(id).map(|e| e.state)
    }

    /// The most recently updated entry.
    pub fn latest(&self) -> Option<ProgressState> {
        let inner = self.lock();
        inner
            .latest
            .as_ref()
            .and_then(|id| inner.entries.get(id))
            .map(|e| e.state)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop entries finished longer ago than the retention period.
    pub fn prune(&self) -> usize {
        self.prune_at(Instant::now())
    }

    fn prune_at(&self, now: Instant) -> usize {
        let retention = self.retention;
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|_, e| match e.finished_at {
            Some(at) => now.saturating_duration_since(at) < retention,
            None => true,
        });

        let Inner { entries, latest } = &mut *inner;
        if latest.as_ref().is_some_and(|id| !entries.contains_key(id)) {
            *latest = None;
        }
        before - entries.len()
    }
}

/// Reporting handle for one download. Dropping it marks the download finished.
#[derive(Debug)]
pub struct ProgressHandle {
    tracker: Arc<ProgressTracker>,
    id: String,
}

impl ProgressHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn update(&self, downloaded: u64, total: Option<u64>) {
        self.tracker.update(&self.id, downloaded, total);
    }

    pub fn complete(&self) {
        self.tracker.complete(&self.id);
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.tracker.finish(&self.id);
    }
}
