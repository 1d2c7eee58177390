//! Error types for the resolver module.

use std::path::PathBuf;
use thiserror::Error;

/// Normalized failures of resolving a link to media streams.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The link is malformed or does not belong to the platform.
    #[error("Invalid URL: {url}")]
    UrlInvalid { url: String },

    /// The content does not exist or is no longer available.
    #[error("Content not found: {reason}")]
    ContentNotFound { reason: String },

    /// The content is private.
    #[error("Content is private")]
    ContentPrivate,

    /// The content can only be seen when logged in.
    #[error("Content requires login")]
    ContentRequiresAuth,

    /// The post exists but carries no video.
    #[error("Post does not contain a video")]
    NotAVideoPost,

    /// The requested format selector is not among the listed streams.
    #[error("Stream not found: {selector}")]
    StreamNotFound { selector: String },

    /// The extractor reported an error that fits no other kind.
    #[error("Platform error: {detail}")]
    PlatformApi { detail: String },

    /// The extractor binary could not be started.
    #[error("Extractor not found at path: {path}")]
    ExtractorNotFound { path: PathBuf },

    /// The extractor did not answer in time.
    #[error("Extractor timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },
}

impl ResolveError {
    pub fn url_invalid(url: impl Into<String>) -> Self {
        Self::UrlInvalid { url: url.into() }
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::ContentNotFound {
            reason: reason.into(),
        }
    }

    pub fn platform(detail: impl Into<String>) -> Self {
        Self::PlatformApi {
            detail: detail.into(),
        }
    }

    /// Outside Instagram, an empty format list is an extractor failure rather
    /// than an image post.
    pub(crate) fn for_video_platform(self) -> Self {
        match self {
            Self::NotAVideoPost => Self::platform("No video formats found"),
            other => other,
        }
    }

    /// Classify extractor diagnostics into an error kind.
    ///
    /// Only the last `ERROR:` line survives, and only inside `PlatformApi`.
    pub fn from_extractor_stderr(stderr: &str) -> Self {
        let lower = stderr.to_lowercase();

        if lower.contains("private video")
            || lower.contains("this video is private")
            || lower.contains("account is private")
            || lower.contains("is private")
        {
            return Self::ContentPrivate;
        }

        if lower.contains("sign in to confirm")
            || lower.contains("login required")
            || lower.contains("requires login")
            || lower.contains("log in")
            || lower.contains("--cookies")
        {
            return Self::ContentRequiresAuth;
        }

        if lower.contains("there is no video") || lower.contains("no video formats found") {
            return Self::NotAVideoPost;
        }

        if lower.contains("unsupported url") || lower.contains("is not a valid url") {
            return Self::UrlInvalid {
                url: String::new(),
            };
        }

        if lower.contains("video unavailable")
            || lower.contains("not available")
            || lower.contains("does not exist")
            || lower.contains("has been removed")
            || lower.contains("http error 404")
        {
            return Self::ContentNotFound {
                reason: "content is unavailable".to_string(),
            };
        }

        let detail = stderr
            .lines()
            .rev()
            .find(|l| l.trim_start().starts_with("ERROR:"))
            .map(|l| l.trim_start().trim_start_matches("ERROR:").trim())
            .or_else(|| stderr.lines().rev().find(|l| !l.trim().is_empty()).map(str::trim))
            .unwrap_or("extractor failed without output");

        Self::PlatformApi {
            detail: detail.to_string(),
        }
    }
}
