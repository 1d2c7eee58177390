//! Streaming a finished download back as an attachment.

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use fetchflicks_core::{DownloadError, DownloadRequest, Platform, ServedFile, TempArtifact};
use futures::Stream;
use tokio_util::io::ReaderStream;

use super::flash::redirect_with_error;
use crate::state::AppState;

/// File body that keeps its scratch directory alive until the body is dropped.
struct ArtifactStream {
    inner: ReaderStream<tokio::fs::File>,
    _artifact: TempArtifact,
}

impl Stream for ArtifactStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

/// Quote-safe value for `Content-Disposition`.
pub fn content_disposition(name: &str) -> String {
    let escaped: String = name
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    if escaped.is_ascii() {
        format!("attachment; filename=\"{}\"", escaped)
    } else {
        let ascii: String = escaped
            .chars()
            .map(|c| if c.is_ascii() { c } else { '_' })
            .collect();
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            ascii,
            urlencoding::encode(&escaped)
        )
    }
}

/// Turn a served file into an attachment response.
///
/// Opening the file is the last step that can fail; afterwards the scratch
/// directory is owned by the body.
pub async fn attachment(file: ServedFile) -> Response {
    let handle = match tokio::fs::File::open(&file.path).await {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(path = ?file.path, error = %e, "Failed to open finished download");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let body = Body::from_stream(ArtifactStream {
        inner: ReaderStream::new(handle),
        _artifact: file.artifact,
    });

    let mut response = body.into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&file.content_type) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(file.size));
    if let Ok(value) = HeaderValue::from_str(&content_disposition(&file.download_name)) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    if let Ok(value) = HeaderValue::from_str(&file.download_id) {
        headers.insert("x-download-id", value);
    }
    response
}

/// Run a download and answer with the file, or redirect back to `page`
/// with the platform's error message.
pub async fn serve_download(
    state: &AppState,
    platform: Platform,
    page: &str,
    request: Result<DownloadRequest, DownloadError>,
) -> Response {
    let request = match request {
        Ok(request) => request,
        Err(e) => {
            tracing::info!(platform = %platform, error = %e, "Rejected download request");
            return redirect_with_error(page, &e.user_message(platform));
        }
    };

    match state.downloads().download(&request).await {
        Ok(file) => attachment(file).await,
        Err(e) => redirect_with_error(page, &e.user_message(platform)),
    }
}
