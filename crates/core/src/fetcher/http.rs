//! reqwest based fetcher.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use super::{FetchError, MediaFetcher, ProgressFn};
use crate::config::DownloadConfig;
use crate::metrics;
use crate::resolver::ResolvedStream;

/// Streams response bodies to disk chunk by chunk.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &DownloadConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    async fn write_body(
        response: reqwest::Response,
        dest: &Path,
        total: Option<u64>,
        progress: &ProgressFn<'_>,
    ) -> Result<u64, FetchError> {
        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        progress(0, total);
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            metrics::BYTES_FETCHED.inc_by(chunk.len() as u64);
            progress(downloaded, total);
        }
        file.flush().await?;

        Ok(downloaded)
    }
}

#[async_trait]
impl MediaFetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(
        &self,
        source: &ResolvedStream,
        dest: &Path,
        progress: &ProgressFn<'_>,
    ) -> Result<u64, FetchError> {
        let mut request = self.client.get(&source.media_url);
        for (name, value) in &source.headers {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let total = response.content_length().or(source.size_hint);
        let result = Self::write_body(response, dest, total, progress).await;
        if result.is_err() {
            let _ = tokio::fs::remove_file(dest).await;
        }

        let written = result?;
        tracing::debug!(bytes = written, dest = %dest.display(), "Fetched media");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use std::collections::HashMap;
    use std::sync::Mutex;

    async fn serve() -> String {
        let app = Router::new()
            .route("/video.mp4", get(|| async { vec![7u8; 64 * 1024] }))
            .route("/gone.mp4", get(|| async { StatusCode::NOT_FOUND }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn stream(url: String) -> ResolvedStream {
        ResolvedStream {
            media_url: url,
            mime_type: "video/mp4".to_string(),
            container: "mp4".to_string(),
            is_audio_only: false,
            is_muxed: true,
            headers: HashMap::from([("Referer".to_string(), "https://example.com/".to_string())]),
            size_hint: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_writes_file_and_reports_progress() {
        let base = serve().await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.mp4");
        let fetcher = HttpFetcher::new(&DownloadConfig::default()).unwrap();
        let seen = Mutex::new(Vec::new());

        let written = fetcher
            .fetch(&stream(format!("{}/video.mp4", base)), &dest, &|d, t| {
                seen.lock().unwrap().push((d, t));
            })
            .await
            .unwrap();

        assert_eq!(written, 64 * 1024);
        assert_eq!(std::fs::metadata(&dest).unwrap().len(), 64 * 1024);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.first(), Some(&(0, Some(64 * 1024))));
        assert_eq!(seen.last(), Some(&(64 * 1024, Some(64 * 1024))));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let base = serve().await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.mp4");
        let fetcher = HttpFetcher::new(&DownloadConfig::default()).unwrap();

        let err = fetcher
            .fetch(&stream(format!("{}/gone.mp4", base)), &dest, &|_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Http { status: 404 }));
        assert!(!dest.exists());
    }
}
