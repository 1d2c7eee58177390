//! Mock muxer for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::lock;
use crate::muxer::{MuxError, MuxJob, MuxResult, Muxer};

/// Mock implementation of the Muxer trait.
///
/// Concatenates both inputs into the output file, or fails once with a
/// configured error.
#[derive(Debug, Default)]
pub struct MockMuxer {
    jobs: Arc<Mutex<Vec<MuxJob>>>,
    /// If set, the next mux fails with this error.
    next_error: Arc<Mutex<Option<MuxError>>>,
}

impl MockMuxer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the next mux to fail with the given error.
    pub fn set_next_error(&self, error: MuxError) {
        *lock(&self.next_error) = Some(error);
    }

    pub fn call_count(&self) -> usize {
        lock(&self.jobs).len()
    }

    pub fn recorded_jobs(&self) -> Vec<MuxJob> {
        lock(&self.jobs).clone()
    }
}

#[async_trait]
impl Muxer for MockMuxer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn mux(&self, job: MuxJob) -> Result<MuxResult, MuxError> {
        lock(&self.jobs).push(job.clone());

        let pending = lock(&self.next_error).take();
        if let Some(err) = pending {
            return Err(err);
        }

        let mut output = tokio::fs::read(&job.video_path).await?;
        output.extend(tokio::fs::read(&job.audio_path).await?);
        tokio::fs::write(&job.output_path, &output).await?;

        Ok(MuxResult {
            job_id: job.job_id,
            output_path: job.output_path,
            output_size_bytes: output.len() as u64,
            duration_ms: 1,
        })
    }

    async fn validate(&self) -> Result<(), MuxError> {
        Ok(())
    }
}
