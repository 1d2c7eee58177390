//! yt-dlp based extractor.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use super::error::ResolveError;
use super::traits::MediaExtractor;
use super::types::ExtractedMedia;
use crate::config::ExtractorConfig;

/// Runs `yt-dlp --dump-single-json` and parses its report.
pub struct YtDlpExtractor {
    config: ExtractorConfig,
}

impl YtDlpExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    fn build_args(url: &str) -> Vec<String> {
        vec![
            "--dump-single-json".to_string(),
            "--no-warnings".to_string(),
            "--no-playlist".to_string(),
            "--no-progress".to_string(),
            url.to_string(),
        ]
    }

    /// Checks that the binary can be started.
    pub async fn validate(&self) -> Result<(), ResolveError> {
        let status = Command::new(&self.config.ytdlp_path)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|_| ResolveError::ExtractorNotFound {
                path: self.config.ytdlp_path.clone(),
            })?;

        if !status.success() {
            return Err(ResolveError::platform(format!(
                "yt-dlp --version exited with code: {:?}",
                status.code()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn extract(&self, url: &str) -> Result<ExtractedMedia, ResolveError> {
        let child = Command::new(&self.config.ytdlp_path)
            .args(Self::build_args(url))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ResolveError::ExtractorNotFound {
                        path: self.config.ytdlp_path.clone(),
                    }
                } else {
                    ResolveError::platform(format!("failed to start yt-dlp: {}", e))
                }
            })?;

        // The child is killed when the future is dropped on timeout.
        let output = timeout(
            Duration::from_secs(self.config.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| ResolveError::Timeout {
            timeout_secs: self.config.timeout_secs,
        })?
        .map_err(|e| ResolveError::platform(format!("yt-dlp I/O error: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(url = %url, status = ?output.status.code(), stderr = %stderr.trim(), "yt-dlp failed");
            let err = ResolveError::from_extractor_stderr(&stderr);
            return Err(match err {
                ResolveError::UrlInvalid { .. } => ResolveError::url_invalid(url),
                other => other,
            });
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| ResolveError::platform(format!("unreadable extractor output: {}", e)))
    }
}
