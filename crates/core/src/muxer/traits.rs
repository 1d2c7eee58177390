//! Trait definitions for the muxer module.

use async_trait::async_trait;

use super::error::MuxError;
use super::types::{MuxJob, MuxResult};

/// Combines a video and an audio track into one container.
#[async_trait]
pub trait Muxer: Send + Sync {
    /// Returns the name of this muxer implementation.
    fn name(&self) -> &str;

    /// Runs the job. The output file does not exist after a failure.
    async fn mux(&self, job: MuxJob) -> Result<MuxResult, MuxError>;

    /// Validates that the muxer is properly configured and ready.
    async fn validate(&self) -> Result<(), MuxError>;
}
