//! YouTube adapter: stream listing and selection.

use std::sync::Arc;

use super::error::ResolveError;
use super::parse_platform_url;
use super::traits::MediaExtractor;
use super::types::{ExtractedFormat, ExtractedMedia, MediaListing, Selection, StreamKind};

const HOSTS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "youtube-nocookie.com",
    "m.youtube.com",
    "music.youtube.com",
];

/// Lowest video height offered on the listing.
const MIN_HEIGHT: u32 = 144;

pub struct YouTubeResolver {
    extractor: Arc<dyn MediaExtractor>,
}

impl YouTubeResolver {
    pub fn new(extractor: Arc<dyn MediaExtractor>) -> Self {
        Self { extractor }
    }

    async fn extract(&self, link: &str) -> Result<ExtractedMedia, ResolveError> {
        let url = parse_platform_url(link, HOSTS)?;
        self.extractor
            .extract(url.as_str())
            .await
            .map_err(ResolveError::for_video_platform)
    }

    /// Metadata and downloadable variants of a video.
    pub async fn list_streams(&self, link: &str) -> Result<MediaListing, ResolveError> {
        let media = self.extract(link).await?;
        Ok(build_listing(&media))
    }

    /// Resolve the variant named by `selector`, adding an audio companion
    /// when the variant has no audio of its own.
    pub async fn select(&self, link: &str, selector: &str) -> Result<Selection, ResolveError> {
        let media = self.extract(link).await?;
        select_from(&media, selector)
    }
}

fn listed(format: &ExtractedFormat) -> bool {
    match format.kind() {
        Some(StreamKind::AudioOnly) => true,
        Some(_) => format.height.is_some_and(|h| h >= MIN_HEIGHT),
        None => false,
    }
}

/// Video variants by height descending, then audio variants by bitrate
/// descending.
pub(crate) fn build_listing(media: &ExtractedMedia) -> MediaListing {
    let formats = media.all_formats();

    let mut video: Vec<&ExtractedFormat> = formats
        .iter()
        .filter(|f| listed(f) && f.kind().is_some_and(|k| k.has_video()))
        .collect();
    video.sort_by(|a, b| b.height.cmp(&a.height));

    let mut audio: Vec<&ExtractedFormat> = formats
        .iter()
        .filter(|f| f.kind() == Some(StreamKind::AudioOnly))
        .collect();
    audio.sort_by(|a, b| b.audio_bitrate().total_cmp(&a.audio_bitrate()));

    MediaListing {
        title: media.title_or_default(),
        author: media.author(),
        views: media.view_count,
        duration_secs: media.duration.map(|d| d.round() as u64),
        thumbnail: media.thumbnail.clone(),
        streams: video
            .into_iter()
            .chain(audio)
            .filter_map(ExtractedFormat::to_variant)
            .collect(),
    }
}

fn same_family(video_ext: &str, audio_ext: &str) -> bool {
    match video_ext {
        "mp4" => matches!(audio_ext, "m4a" | "mp4"),
        other => other == audio_ext,
    }
}

/// Highest-bitrate audio track, preferring the video's container family.
pub(crate) fn best_audio<'a>(
    formats: &'a [ExtractedFormat],
    video_ext: &str,
) -> Option<&'a ExtractedFormat> {
    formats
        .iter()
        .filter(|f| f.kind() == Some(StreamKind::AudioOnly))
        .max_by(|a, b| {
            let a_family = same_family(video_ext, a.ext.as_deref().unwrap_or(""));
            let b_family = same_family(video_ext, b.ext.as_deref().unwrap_or(""));
            a_family
                .cmp(&b_family)
                .then(a.audio_bitrate().total_cmp(&b.audio_bitrate()))
        })
}

pub(crate) fn select_from(media: &ExtractedMedia, selector: &str) -> Result<Selection, ResolveError> {
    let formats = media.all_formats();
    let not_found = || ResolveError::StreamNotFound {
        selector: selector.to_string(),
    };

    let chosen = formats
        .iter()
        .find(|f| f.format_id == selector && f.kind().is_some())
        .ok_or_else(not_found)?;
    let primary = chosen.to_resolved().ok_or_else(not_found)?;

    let audio = if chosen.kind() == Some(StreamKind::VideoOnly) {
        let companion = best_audio(&formats, chosen.ext.as_deref().unwrap_or("mp4"))
            .and_then(ExtractedFormat::to_resolved);
        if companion.is_none() {
            tracing::warn!(selector = %selector, "No audio track to pair with video-only stream");
        }
        companion
    } else {
        None
    };

    Ok(Selection {
        title: media.title_or_default(),
        primary,
        audio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockExtractor};

    #[test]
    fn test_listing_orders_video_then_audio() {
        let listing = build_listing(&fixtures::youtube_media("Test Video"));

        let first_audio = listing
            .streams
            .iter()
            .position(|s| s.kind == StreamKind::AudioOnly)
            .unwrap();
        assert!(first_audio > 0);
        assert!(listing.streams[first_audio..]
            .iter()
            .all(|s| s.kind == StreamKind::AudioOnly));

        let heights: Vec<u32> = listing.streams[..first_audio]
            .iter()
            .map(|s| s.height.unwrap())
            .collect();
        let mut sorted = heights.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(heights, sorted);
        assert!(heights.iter().all(|h| *h >= 144));

        let bitrates: Vec<u32> = listing.streams[first_audio..]
            .iter()
            .map(|s| s.bitrate_kbps.unwrap())
            .collect();
        assert!(bitrates.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_listing_drops_tiny_and_storyboard_formats() {
        let listing = build_listing(&fixtures::youtube_media("Test Video"));
        assert!(!listing.streams.iter().any(|s| s.format_selector == "sb0"));
        assert!(!listing.streams.iter().any(|s| s.format_selector == "160"));
    }

    #[test]
    fn test_select_progressive_needs_no_mux() {
        let selection = select_from(&fixtures::youtube_media("T"), fixtures::PROGRESSIVE_ID).unwrap();
        assert!(!selection.needs_mux());
        assert!(selection.primary.is_muxed);
    }

    #[test]
    fn test_select_video_only_pairs_same_family_audio() {
        let selection = select_from(&fixtures::youtube_media("T"), fixtures::ADAPTIVE_ID).unwrap();
        let audio = selection.audio.expect("companion audio");
        assert!(audio.is_audio_only);
        assert_eq!(audio.container, "m4a");
    }

    #[test]
    fn test_select_audio_only() {
        let selection = select_from(&fixtures::youtube_media("T"), fixtures::AUDIO_ID).unwrap();
        assert!(selection.primary.is_audio_only);
        assert_eq!(selection.primary.container, "m4a");
        assert!(!selection.needs_mux());
    }

    #[test]
    fn test_select_unknown_selector() {
        let err = select_from(&fixtures::youtube_media("T"), "9999").unwrap_err();
        assert!(matches!(err, ResolveError::StreamNotFound { .. }));
    }

    #[tokio::test]
    async fn test_foreign_link_skips_extractor() {
        let extractor = Arc::new(MockExtractor::new());
        let resolver = YouTubeResolver::new(extractor.clone());

        let err = resolver
            .list_streams("https://vimeo.com/123")
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::UrlInvalid { .. }));
        assert_eq!(extractor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_list_streams_through_extractor() {
        let extractor = Arc::new(MockExtractor::new());
        extractor.set_media(fixtures::youtube_media("Rick"));
        let resolver = YouTubeResolver::new(extractor.clone());

        let listing = resolver
            .list_streams("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();
        assert_eq!(listing.title, "Rick");
        assert_eq!(extractor.call_count(), 1);
    }

    #[tokio::test]
    async fn test_no_formats_is_not_reported_as_a_post() {
        let extractor = Arc::new(MockExtractor::new());
        extractor.set_next_error(ResolveError::from_extractor_stderr(
            "ERROR: [youtube] abc123: No video formats found!",
        ));
        let resolver = YouTubeResolver::new(extractor.clone());

        let err = resolver
            .list_streams("https://www.youtube.com/watch?v=abc123")
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::PlatformApi { .. }));
    }
}
