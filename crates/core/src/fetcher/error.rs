//! Error types for the fetcher module.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The CDN answered with a non-success status.
    #[error("HTTP {status} from media server")]
    Http { status: u16 },

    /// The request could not be sent or the body was cut off.
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out")]
    Timeout,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if let Some(status) = e.status() {
            Self::Http {
                status: status.as_u16(),
            }
        } else {
            Self::Request(e.to_string())
        }
    }
}
