//! Error types for the muxer module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while muxing. None of them are retried.
#[derive(Debug, Error)]
pub enum MuxError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// An input track is missing.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// FFmpeg ran and failed.
    #[error("{reason}")]
    Failed {
        reason: String,
        stderr: Option<String>,
    },

    /// FFmpeg was killed after exceeding the timeout.
    #[error("Mux timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MuxError {
    pub fn failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Short description including the tool's own diagnostics when present.
    pub fn detail(&self) -> String {
        match self {
            Self::Failed {
                reason,
                stderr: Some(stderr),
            } => format!("{}: {}", reason, stderr),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_includes_stderr() {
        let err = MuxError::failed(
            "FFmpeg exited with code: Some(1)",
            Some("Invalid data found when processing input".to_string()),
        );
        assert_eq!(
            err.detail(),
            "FFmpeg exited with code: Some(1): Invalid data found when processing input"
        );
    }

    #[test]
    fn test_detail_without_stderr() {
        let err = MuxError::Timeout { timeout_secs: 30 };
        assert_eq!(err.detail(), "Mux timed out after 30 seconds");
    }
}
