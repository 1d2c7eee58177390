//! Types for the muxer module.

use serde::Serialize;
use std::path::PathBuf;

/// A request to combine one video track and one audio track.
#[derive(Debug, Clone)]
pub struct MuxJob {
    /// Identifier used in logs, usually the download id.
    pub job_id: String,
    pub video_path: PathBuf,
    pub audio_path: PathBuf,
    pub output_path: PathBuf,
}

/// Outcome of a successful mux.
#[derive(Debug, Clone, Serialize)]
pub struct MuxResult {
    pub job_id: String,
    pub output_path: PathBuf,
    pub output_size_bytes: u64,
    pub duration_ms: u64,
}

/// Container of the muxed file: mp4 for mp4 video, mkv for anything else.
pub fn output_container(video_container: &str) -> &'static str {
    if video_container.eq_ignore_ascii_case("mp4") {
        "mp4"
    } else {
        "mkv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_container() {
        assert_eq!(output_container("mp4"), "mp4");
        assert_eq!(output_container("MP4"), "mp4");
        assert_eq!(output_container("webm"), "mkv");
        assert_eq!(output_container(""), "mkv");
    }
}
