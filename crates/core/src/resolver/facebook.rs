//! Facebook adapter: HD stream lookup.

use std::sync::Arc;

use super::error::ResolveError;
use super::parse_platform_url;
use super::traits::MediaExtractor;
use super::types::{ExtractedFormat, ExtractedMedia, Selection, StreamKind};

const HOSTS: &[&str] = &["facebook.com", "fb.watch", "m.facebook.com"];

const HD_FORMAT_ID: &str = "hd";

pub struct FacebookResolver {
    extractor: Arc<dyn MediaExtractor>,
}

impl FacebookResolver {
    pub fn new(extractor: Arc<dyn MediaExtractor>) -> Self {
        Self { extractor }
    }

    /// Title and HD stream of a video.
    pub async fn resolve_hd(&self, link: &str) -> Result<Selection, ResolveError> {
        let url = parse_platform_url(link, HOSTS)?;
        let media = self
            .extractor
            .extract(url.as_str())
            .await
            .map_err(ResolveError::for_video_platform)?;
        hd_from(&media)
    }
}

/// The `hd` format when present, otherwise the tallest progressive one.
pub(crate) fn hd_from(media: &ExtractedMedia) -> Result<Selection, ResolveError> {
    let formats = media.all_formats();

    let hd = formats
        .iter()
        .find(|f| f.format_id == HD_FORMAT_ID && f.url.is_some())
        .or_else(|| {
            formats
                .iter()
                .filter(|f| f.kind() == Some(StreamKind::Progressive))
                .max_by_key(|f| f.height.unwrap_or(0))
        })
        .and_then(ExtractedFormat::to_resolved)
        .ok_or_else(|| ResolveError::not_found("HD video URL not found."))?;

    Ok(Selection {
        title: media.title_or_default(),
        primary: hd,
        audio: None,
    })
}
