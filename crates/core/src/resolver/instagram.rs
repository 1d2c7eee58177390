//! Instagram adapter: shortcode extraction and video posts.

use std::sync::Arc;

use super::error::ResolveError;
use super::parse_platform_url;
use super::traits::MediaExtractor;
use super::types::{ExtractedFormat, ExtractedMedia, Selection, StreamKind};
use super::youtube::best_audio;

const HOSTS: &[&str] = &["instagram.com"];

/// Path segments that are followed by a shortcode.
const SHORTCODE_MARKERS: &[&str] = &["reel", "reels", "p", "tv"];

/// Extract the post shortcode from an Instagram link.
///
/// The shortcode is the segment after `reel`, `reels`, `p` or `tv`, or else
/// the last path segment.
pub fn shortcode_from_url(link: &str) -> Result<String, ResolveError> {
    let url = parse_platform_url(link, HOSTS)?;
    let parts: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    let after_marker = parts
        .iter()
        .position(|p| SHORTCODE_MARKERS.contains(p))
        .and_then(|i| parts.get(i + 1));

    after_marker
        .or(parts.last())
        .map(|s| s.split('?').next().unwrap_or_default())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ResolveError::url_invalid(link))
}

/// A resolved Instagram video post.
#[derive(Debug, Clone)]
pub struct InstagramPost {
    pub shortcode: String,
    pub selection: Selection,
}

pub struct InstagramResolver {
    extractor: Arc<dyn MediaExtractor>,
}

impl InstagramResolver {
    pub fn new(extractor: Arc<dyn MediaExtractor>) -> Self {
        Self { extractor }
    }

    /// Canonical post URL for a shortcode.
    pub fn post_url(shortcode: &str) -> String {
        format!("https://www.instagram.com/p/{}/", shortcode)
    }

    /// Resolve the video of a post. Posts without video are rejected.
    pub async fn resolve_post(&self, link: &str) -> Result<InstagramPost, ResolveError> {
        let shortcode = shortcode_from_url(link)?;
        let media = self.extractor.extract(&Self::post_url(&shortcode)).await?;
        let selection = video_from(&media)?;
        Ok(InstagramPost {
            shortcode,
            selection,
        })
    }
}

/// Best progressive video, or the best video-only track with its audio.
pub(crate) fn video_from(media: &ExtractedMedia) -> Result<Selection, ResolveError> {
    let formats = media.all_formats();
    let tallest = |kind: StreamKind| {
        formats
            .iter()
            .filter(move |f| f.kind() == Some(kind))
            .max_by_key(|f| f.height.unwrap_or(0))
    };

    if let Some(primary) = tallest(StreamKind::Progressive).and_then(ExtractedFormat::to_resolved)
    {
        return Ok(Selection {
            title: media.title_or_default(),
            primary,
            audio: None,
        });
    }

    let video = tallest(StreamKind::VideoOnly).ok_or(ResolveError::NotAVideoPost)?;
    let primary = video.to_resolved().ok_or(ResolveError::NotAVideoPost)?;
    let audio = best_audio(&formats, video.ext.as_deref().unwrap_or("mp4"))
        .and_then(ExtractedFormat::to_resolved);

    Ok(Selection {
        title: media.title_or_default(),
        primary,
        audio,
    })
}
