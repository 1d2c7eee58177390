//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external-tool traits
//! (extractor, fetcher, muxer, notifier), so downloads and form intake can
//! be exercised end to end without yt-dlp, ffmpeg, the network or SMTP.
//!
//! # Example
//!
//! ```rust,ignore
//! use fetchflicks_core::testing::{fixtures, MockExtractor, MockFetcher, MockMuxer};
//!
//! let extractor = MockExtractor::new();
//! extractor.set_media(fixtures::youtube_media("Some Title"));
//!
//! let muxer = MockMuxer::new();
//! muxer.set_next_error(MuxError::failed("boom", None));
//!
//! // Use in DownloadService::new(...)
//! ```

mod mock_extractor;
mod mock_fetcher;
mod mock_muxer;
mod mock_notifier;

pub use mock_extractor::MockExtractor;
pub use mock_fetcher::MockFetcher;
pub use mock_muxer::MockMuxer;
pub use mock_notifier::MockNotifier;

use std::sync::{Mutex, MutexGuard};

/// Lock a mock's state, ignoring poisoning from a panicked test thread.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Test fixtures shaped like yt-dlp reports.
pub mod fixtures {
    use std::collections::HashMap;

    use crate::resolver::{ExtractedFormat, ExtractedMedia};

    /// 360p mp4 with audio.
    pub const PROGRESSIVE_ID: &str = "18";
    /// 1080p mp4 without audio.
    pub const ADAPTIVE_ID: &str = "137";
    /// ~130 kbps m4a audio.
    pub const AUDIO_ID: &str = "140";

    fn format(
        id: &str,
        ext: &str,
        vcodec: &str,
        acodec: &str,
        height: Option<u32>,
        abr: Option<f64>,
    ) -> ExtractedFormat {
        ExtractedFormat {
            format_id: id.to_string(),
            url: Some(format!("https://cdn.example.com/videoplayback?itag={}", id)),
            ext: Some(ext.to_string()),
            protocol: Some("https".to_string()),
            vcodec: Some(vcodec.to_string()),
            acodec: Some(acodec.to_string()),
            width: height.map(|h| h * 16 / 9),
            height,
            abr,
            tbr: abr,
            filesize: Some(1024 * 1024),
            filesize_approx: None,
            http_headers: HashMap::from([(
                "User-Agent".to_string(),
                "Mozilla/5.0".to_string(),
            )]),
        }
    }

    /// A YouTube video with progressive, adaptive and audio-only formats,
    /// plus a storyboard and a format below 144p.
    pub fn youtube_media(title: &str) -> ExtractedMedia {
        let mut storyboard = format("sb0", "mhtml", "none", "none", Some(90), None);
        storyboard.protocol = Some("mhtml".to_string());

        ExtractedMedia {
            id: "dQw4w9WgXcQ".to_string(),
            title: Some(title.to_string()),
            uploader: Some("Test Channel".to_string()),
            view_count: Some(1_000_000),
            duration: Some(212.0),
            thumbnail: Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg".to_string()),
            formats: vec![
                storyboard,
                format("139", "m4a", "none", "mp4a.40.5", None, Some(48.8)),
                format("140", "m4a", "none", "mp4a.40.2", None, Some(129.5)),
                format("251", "webm", "none", "opus", None, Some(160.0)),
                format("160", "mp4", "avc1.4d400c", "none", Some(96), None),
                format(PROGRESSIVE_ID, "mp4", "avc1.42001E", "mp4a.40.2", Some(360), None),
                format("22", "mp4", "avc1.64001F", "mp4a.40.2", Some(720), None),
                format(ADAPTIVE_ID, "mp4", "avc1.640028", "none", Some(1080), None),
                format("248", "webm", "vp9", "none", Some(1080), None),
            ],
            ..Default::default()
        }
    }

    /// A Facebook video with `sd` and `hd` progressive formats that carry no
    /// codec information.
    pub fn facebook_media(title: &str) -> ExtractedMedia {
        let plain = |id: &str, height: u32| ExtractedFormat {
            format_id: id.to_string(),
            url: Some(format!("https://video.xx.fbcdn.net/v/{}.mp4", id)),
            ext: Some("mp4".to_string()),
            height: Some(height),
            ..Default::default()
        };

        ExtractedMedia {
            id: "123456789".to_string(),
            title: Some(title.to_string()),
            formats: vec![plain("sd", 360), plain("hd", 720)],
            ..Default::default()
        }
    }

    /// An Instagram reel with a progressive format and a DASH pair.
    pub fn instagram_video_media(shortcode: &str) -> ExtractedMedia {
        ExtractedMedia {
            id: shortcode.to_string(),
            title: Some(format!("Video by creator {}", shortcode)),
            formats: vec![
                format("8", "mp4", "h264", "aac", Some(1280), None),
                format("dash-1080v", "mp4", "avc1.640028", "none", Some(1920), None),
                format("dash-128a", "m4a", "none", "mp4a.40.2", None, Some(128.0)),
            ],
            ..Default::default()
        }
    }

    /// An Instagram image post: no formats at all.
    pub fn instagram_image_media() -> ExtractedMedia {
        ExtractedMedia {
            id: "C1AbCdEf".to_string(),
            title: Some("Photo by creator".to_string()),
            thumbnail: Some("https://scontent.cdninstagram.com/photo.jpg".to_string()),
            ..Default::default()
        }
    }
}
