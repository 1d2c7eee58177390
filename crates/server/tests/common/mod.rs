//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock dependencies injected, enabling E2E testing without yt-dlp,
//! ffmpeg, the network or an SMTP server.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use fetchflicks_core::testing::{MockExtractor, MockFetcher, MockMuxer, MockNotifier};
use fetchflicks_core::{
    Config, DownloadService, IntakeService, MessageStore, ProgressTracker, SqliteMessageStore,
};
use fetchflicks_server::api::create_router;
use fetchflicks_server::state::AppState;

/// Re-export fixtures for test convenience
pub use fetchflicks_core::testing::fixtures;

/// Pages written into the fixture's pages directory.
const PAGES: &[&str] = &[
    "index", "facebook", "instagram", "contact", "feedback", "guides", "faq", "about", "help",
    "credits", "privacy", "terms",
];

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with fully controllable mocks for:
/// - Media extraction (MockExtractor)
/// - Byte fetching (MockFetcher)
/// - Muxing (MockMuxer)
/// - Notifications (MockNotifier)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_listing() {
///     let fixture = TestFixture::new();
///     fixture.extractor.set_media(fixtures::youtube_media("Title"));
///
///     let response = fixture.post_form("/fetch", &[("link", "https://youtu.be/x")]).await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    pub extractor: Arc<MockExtractor>,
    pub fetcher: Arc<MockFetcher>,
    pub muxer: Arc<MockMuxer>,
    pub notifier: Arc<MockNotifier>,
    pub store: Arc<SqliteMessageStore>,
    pub progress: Arc<ProgressTracker>,
    /// Root of the per-request scratch directories
    pub scratch_dir: PathBuf,
    /// Temporary directory for the database, pages and scratch files
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).unwrap_or(Value::Null)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn location(&self) -> Option<&str> {
        self.header(header::LOCATION.as_str())
    }

    /// Decoded `error` query parameter of a redirect.
    pub fn flash_error(&self) -> Option<String> {
        let location = self.location()?;
        let (_, query) = location.split_once("?error=")?;
        urlencoding::decode(query).ok().map(|s| s.into_owned())
    }
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().unwrap();
        let pages_dir = temp_dir.path().join("web");
        let scratch_dir = temp_dir.path().join("scratch");
        write_pages(&pages_dir);

        let mut config = Config::default();
        config.server.pages_dir = pages_dir;
        config.database.path = temp_dir.path().join("test.db");
        config.download.scratch_dir = scratch_dir.clone();

        let extractor = Arc::new(MockExtractor::new());
        let fetcher = Arc::new(MockFetcher::new());
        let muxer = Arc::new(MockMuxer::new());
        let notifier = Arc::new(MockNotifier::new());
        let store = Arc::new(SqliteMessageStore::new(&config.database.path).unwrap());
        let progress = Arc::new(ProgressTracker::new(Duration::from_secs(300)));

        let downloads = Arc::new(DownloadService::new(
            extractor.clone(),
            fetcher.clone(),
            muxer.clone(),
            Arc::clone(&progress),
            &config.download,
        ));
        let intake = Arc::new(IntakeService::new(store.clone(), notifier.clone()));

        let state = Arc::new(AppState::new(config, downloads, intake));
        let router = create_router(state);

        Self {
            router,
            extractor,
            fetcher,
            muxer,
            notifier,
            store,
            progress,
            scratch_dir,
            temp_dir,
        }
    }

    /// Number of stored contact/feedback messages.
    pub fn message_count(&self) -> i64 {
        self.store.count().unwrap()
    }

    /// True when no request left anything in the scratch root.
    pub fn scratch_is_empty(&self) -> bool {
        match std::fs::read_dir(&self.scratch_dir) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => true,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with an urlencoded form body.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        TestResponse {
            status,
            headers,
            bytes,
        }
    }
}

fn write_pages(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    for page in PAGES {
        std::fs::write(
            dir.join(format!("{}.html", page)),
            format!("<html><body>{}</body></html>", page),
        )
        .unwrap();
    }
}
