//! Error types for download orchestration.

use thiserror::Error;

use crate::fetcher::FetchError;
use crate::intake::InputError;
use crate::muxer::MuxError;
use crate::resolver::{Platform, ResolveError};

/// Every way a download request can fail.
///
/// [`DownloadError::user_message`] is the only translation to user-facing
/// text.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Input(#[from] InputError),

    /// No format selector was submitted with a YouTube download.
    #[error("Missing format selector")]
    MissingSelector,

    #[error("Resolve failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Mux failed: {0}")]
    Mux(#[from] MuxError),

    /// The scratch directory or the finished file could not be prepared.
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    /// Pipeline stage the error came from, for logs and metrics.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Input(_) | Self::MissingSelector => "input",
            Self::Resolve(_) => "resolve",
            Self::Fetch(_) => "fetch",
            Self::Mux(_) => "mux",
            Self::Io(_) => "serve",
        }
    }

    /// Message shown to the user on the platform's page.
    pub fn user_message(&self, platform: Platform) -> String {
        match self {
            Self::Input(e) => e.to_string(),
            Self::MissingSelector => "Invalid request".to_string(),
            Self::Resolve(e) => resolve_message(e, platform),
            Self::Fetch(e) => match platform {
                Platform::YouTube => format!("Error downloading video: {}", e),
                Platform::Facebook => format!("Error downloading Facebook video: {}", e),
                Platform::Instagram => format!("Error downloading Instagram content: {}", e),
            },
            Self::Mux(e) => format!("Failed to merge video and audio. Error: {}", e.detail()),
            Self::Io(_) => "Error preparing the file. Please try again.".to_string(),
        }
    }
}

fn resolve_message(error: &ResolveError, platform: Platform) -> String {
    match (error, platform) {
        (ResolveError::UrlInvalid { .. }, Platform::YouTube) => {
            "Please enter a valid YouTube video link".to_string()
        }
        (ResolveError::UrlInvalid { .. }, Platform::Facebook) => {
            "Could not fetch video data. Please check the URL.".to_string()
        }
        (ResolveError::UrlInvalid { .. }, Platform::Instagram) => {
            "Invalid Instagram URL. Please check the link and try again.".to_string()
        }
        (ResolveError::ContentNotFound { .. }, Platform::Instagram) => {
            "This Instagram post is no longer available.".to_string()
        }
        (ResolveError::ContentNotFound { reason }, _) => reason.clone(),
        (ResolveError::ContentPrivate, Platform::Instagram) => {
            "This Instagram profile is private. Only public content can be downloaded.".to_string()
        }
        (ResolveError::ContentPrivate, _) => {
            "This video is private. Only public videos can be downloaded.".to_string()
        }
        (ResolveError::ContentRequiresAuth, Platform::Instagram) => {
            "This Instagram content requires login. Only public content can be downloaded."
                .to_string()
        }
        (ResolveError::ContentRequiresAuth, _) => {
            "This video requires sign-in and cannot be downloaded.".to_string()
        }
        (ResolveError::NotAVideoPost, Platform::Instagram) => {
            "This Instagram post does not contain a video. Only video posts and reels can be downloaded."
                .to_string()
        }
        (ResolveError::NotAVideoPost, _) => {
            "This link does not contain a downloadable video.".to_string()
        }
        (ResolveError::StreamNotFound { .. }, _) => "Selected stream not found".to_string(),
        (other, platform) => {
            let detail = match other {
                ResolveError::PlatformApi { detail } => detail.clone(),
                ResolveError::Timeout { .. } => "the video service took too long to respond".to_string(),
                _ => "the video service is unavailable".to_string(),
            };
            match platform {
                Platform::YouTube => format!("Error fetching video: {}", detail),
                Platform::Facebook => format!("Error downloading Facebook video: {}", detail),
                Platform::Instagram => format!("Instagram download error: {}", detail),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_mux_message() {
        let err = DownloadError::from(MuxError::failed("FFmpeg exited with code: Some(1)", None));
        assert_eq!(
            err.user_message(Platform::YouTube),
            "Failed to merge video and audio. Error: FFmpeg exited with code: Some(1)"
        );
        assert_eq!(err.stage(), "mux");
    }

    #[test]
    fn test_not_a_video_message() {
        let err = DownloadError::from(ResolveError::NotAVideoPost);
        assert!(err
            .user_message(Platform::Instagram)
            .contains("does not contain a video"));
        assert!(!err.user_message(Platform::YouTube).contains("Instagram"));
        assert!(!err.user_message(Platform::Facebook).contains("Instagram"));
    }

    #[test]
    fn test_platform_specific_messages() {
        let private = DownloadError::from(ResolveError::ContentPrivate);
        assert!(private.user_message(Platform::Instagram).contains("Instagram profile is private"));
        assert!(private.user_message(Platform::YouTube).contains("video is private"));

        let hd = DownloadError::from(ResolveError::not_found("HD video URL not found."));
        assert_eq!(hd.user_message(Platform::Facebook), "HD video URL not found.");
    }

    #[test]
    fn test_extractor_path_does_not_leak() {
        let err = DownloadError::from(ResolveError::ExtractorNotFound {
            path: PathBuf::from("/opt/secret/yt-dlp"),
        });
        let message = err.user_message(Platform::YouTube);
        assert!(!message.contains("/opt/secret"));
        assert!(message.starts_with("Error fetching video:"));
    }

    #[test]
    fn test_stream_not_found_message() {
        let err = DownloadError::from(ResolveError::StreamNotFound {
            selector: "999".to_string(),
        });
        assert_eq!(err.user_message(Platform::YouTube), "Selected stream not found");
        assert_eq!(err.stage(), "resolve");
    }
}
