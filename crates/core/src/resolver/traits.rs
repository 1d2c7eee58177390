//! Trait definitions for the resolver module.

use async_trait::async_trait;

use super::error::ResolveError;
use super::types::ExtractedMedia;

/// Turns a page URL into the formats the platform offers for it.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Returns the name of this extractor implementation.
    fn name(&self) -> &str;

    /// Extracts page metadata and the available formats.
    async fn extract(&self, url: &str) -> Result<ExtractedMedia, ResolveError>;
}
