//! FFmpeg-based muxer implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use super::error::MuxError;
use super::traits::Muxer;
use super::types::{MuxJob, MuxResult};
use crate::config::MuxerConfig;
use crate::metrics;

/// Longest stderr excerpt kept on failure, in characters.
const STDERR_EXCERPT: usize = 1000;

/// FFmpeg-based muxer implementation.
pub struct FfmpegMuxer {
    config: MuxerConfig,
}

impl FfmpegMuxer {
    /// Creates a new FFmpeg muxer with the given configuration.
    pub fn new(config: MuxerConfig) -> Self {
        Self { config }
    }

    /// Creates a muxer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(MuxerConfig::default())
    }

    /// Builds ffmpeg arguments: copy the first video stream of the first
    /// input, encode the first audio stream of the second.
    fn build_args(&self, video_path: &Path, audio_path: &Path, output_path: &Path) -> Vec<String> {
        vec![
            "-y".to_string(), // Overwrite output
            "-i".to_string(),
            video_path.to_string_lossy().to_string(),
            "-i".to_string(),
            audio_path.to_string_lossy().to_string(),
            "-map".to_string(),
            "0:v:0".to_string(),
            "-map".to_string(),
            "1:a:0".to_string(),
            "-c:v".to_string(),
            "copy".to_string(),
            "-c:a".to_string(),
            self.config.audio_codec.clone(),
            "-strict".to_string(),
            "experimental".to_string(),
            "-loglevel".to_string(),
            self.config.log_level.clone(),
            output_path.to_string_lossy().to_string(),
        ]
    }

    async fn run(&self, job: &MuxJob) -> Result<MuxResult, MuxError> {
        let start = Instant::now();

        for input in [&job.video_path, &job.audio_path] {
            if !input.exists() {
                return Err(MuxError::InputNotFound {
                    path: input.clone(),
                });
            }
        }

        let args = self.build_args(&job.video_path, &job.audio_path, &job.output_path);

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    MuxError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    MuxError::Io(e)
                }
            })?;

        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| MuxError::failed("FFmpeg stderr was not captured", None))?;

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let result = timeout(timeout_duration, async {
            let mut error_output = String::new();
            stderr.read_to_string(&mut error_output).await?;
            let status = child.wait().await?;
            Ok::<(std::process::ExitStatus, String), std::io::Error>((status, error_output))
        })
        .await;

        match result {
            Ok(Ok((status, error_output))) => {
                if !status.success() {
                    return Err(MuxError::failed(
                        format!("FFmpeg exited with code: {:?}", status.code()),
                        excerpt(&error_output),
                    ));
                }
            }
            Ok(Err(e)) => return Err(MuxError::Io(e)),
            Err(_) => {
                let _ = child.kill().await;
                return Err(MuxError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                });
            }
        }

        let output_meta = tokio::fs::metadata(&job.output_path)
            .await
            .map_err(|_| MuxError::failed("Output file not created", None))?;

        Ok(MuxResult {
            job_id: job.job_id.clone(),
            output_path: job.output_path.clone(),
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Tail of the tool's diagnostics, `None` when it printed nothing.
fn excerpt(stderr: &str) -> Option<String> {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        return None;
    }
    let count = trimmed.chars().count();
    Some(trimmed.chars().skip(count.saturating_sub(STDERR_EXCERPT)).collect())
}

#[async_trait]
impl Muxer for FfmpegMuxer {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn mux(&self, job: MuxJob) -> Result<MuxResult, MuxError> {
        let timer = metrics::MUX_DURATION.start_timer();
        let result = self.run(&job).await;

        match &result {
            Ok(r) => {
                timer.observe_duration();
                tracing::info!(
                    job_id = %job.job_id,
                    bytes = r.output_size_bytes,
                    duration_ms = r.duration_ms,
                    "Muxed video and audio"
                );
            }
            Err(e) => {
                timer.stop_and_discard();
                metrics::MUX_FAILURES.inc();
                tracing::warn!(job_id = %job.job_id, error = %e.detail(), "Mux failed");
                let _ = tokio::fs::remove_file(&job.output_path).await;
            }
        }

        result
    }

    async fn validate(&self) -> Result<(), MuxError> {
        let status = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|_| MuxError::FfmpegNotFound {
                path: self.config.ffmpeg_path.clone(),
            })?;

        if !status.success() {
            return Err(MuxError::failed(
                format!("ffmpeg -version exited with code: {:?}", status.code()),
                None,
            ));
        }
        Ok(())
    }
}
