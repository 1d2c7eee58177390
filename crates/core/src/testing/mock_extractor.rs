//! Mock extractor for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::lock;
use crate::resolver::{ExtractedMedia, MediaExtractor, ResolveError};

/// Mock implementation of the MediaExtractor trait.
///
/// Returns the configured media for every URL and records what was asked.
#[derive(Debug, Default)]
pub struct MockExtractor {
    media: Arc<Mutex<Option<ExtractedMedia>>>,
    /// If set, the next extraction fails with this error.
    next_error: Arc<Mutex<Option<ResolveError>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Media returned by every extraction.
    pub fn set_media(&self, media: ExtractedMedia) {
        *lock(&self.media) = Some(media);
    }

    /// Configure the next extraction to fail with the given error.
    pub fn set_next_error(&self, error: ResolveError) {
        *lock(&self.next_error) = Some(error);
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requested).len()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        lock(&self.requested).clone()
    }
}

#[async_trait]
impl MediaExtractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(&self, url: &str) -> Result<ExtractedMedia, ResolveError> {
        lock(&self.requested).push(url.to_string());

        if let Some(err) = lock(&self.next_error).take() {
            return Err(err);
        }

        lock(&self.media)
            .clone()
            .ok_or_else(|| ResolveError::not_found("no media configured"))
    }
}
