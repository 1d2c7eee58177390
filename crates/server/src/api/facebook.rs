use axum::{extract::State, response::Response, Form};
use fetchflicks_core::{DownloadRequest, Platform};
use serde::Deserialize;
use std::sync::Arc;

use super::files::serve_download;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FacebookForm {
    pub facebook_url: Option<String>,
    pub download_id: Option<String>,
}

/// Download the HD rendition of a Facebook video.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Form(form): Form<FacebookForm>,
) -> Response {
    let request = DownloadRequest::from_form(
        Platform::Facebook,
        form.facebook_url.as_deref(),
        None,
        form.download_id.as_deref(),
    );
    serve_download(&state, Platform::Facebook, "/facebook", request).await
}
