//! YouTube listing and download handlers.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form, Json,
};
use fetchflicks_core::{DownloadRequest, Platform};
use serde::Deserialize;
use std::sync::Arc;

use super::files::serve_download;
use super::flash::redirect_with_error;
use crate::state::AppState;

/// Page errors are reported back to.
const PAGE: &str = "/";

#[derive(Debug, Deserialize)]
pub struct FetchForm {
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadForm {
    pub link: Option<String>,
    /// Opaque stream identifier from the listing.
    #[serde(alias = "itag")]
    pub format_selector: Option<String>,
    /// Client-chosen progress key.
    pub download_id: Option<String>,
}

/// List the streams of a video.
pub async fn fetch(State(state): State<Arc<AppState>>, Form(form): Form<FetchForm>) -> Response {
    match state.downloads().list_youtube(form.link.as_deref()).await {
        Ok(listing) => Json(listing).into_response(),
        Err(e) => redirect_with_error(PAGE, &e.user_message(Platform::YouTube)),
    }
}

/// Download one stream, muxing in audio for video-only selections.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DownloadForm>,
) -> Response {
    let request = DownloadRequest::from_form(
        Platform::YouTube,
        form.link.as_deref(),
        form.format_selector.as_deref(),
        form.download_id.as_deref(),
    );
    serve_download(&state, Platform::YouTube, PAGE, request).await
}
