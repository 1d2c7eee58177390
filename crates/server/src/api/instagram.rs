use axum::{extract::State, response::Response, Form};
use fetchflicks_core::{DownloadRequest, Platform};
use serde::Deserialize;
use std::sync::Arc;

use super::files::serve_download;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InstagramForm {
    pub instagram_url: Option<String>,
    pub download_id: Option<String>,
}

/// Download the video of an Instagram reel or post.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Form(form): Form<InstagramForm>,
) -> Response {
    let request = DownloadRequest::from_form(
        Platform::Instagram,
        form.instagram_url.as_deref(),
        None,
        form.download_id.as_deref(),
    );
    serve_download(&state, Platform::Instagram, "/instagram", request).await
}
