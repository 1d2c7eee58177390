//! Fetching media bytes from a resolved stream to disk.

mod error;
mod http;

pub use error::FetchError;
pub use http::HttpFetcher;

use std::path::Path;

use async_trait::async_trait;

use crate::resolver::ResolvedStream;

/// Callback receiving `(downloaded, total)` after every chunk.
pub type ProgressFn<'a> = dyn Fn(u64, Option<u64>) + Send + Sync + 'a;

/// Writes the bytes of a resolved stream to a local file.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Returns the name of this fetcher implementation.
    fn name(&self) -> &str;

    /// Stream `source` into `dest`, returning the number of bytes written.
    ///
    /// `dest` does not exist after a failure.
    async fn fetch(
        &self,
        source: &ResolvedStream,
        dest: &Path,
        progress: &ProgressFn<'_>,
    ) -> Result<u64, FetchError>;
}
