//! Types shared by the resolver adapters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Supported source platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    Facebook,
    Instagram,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::YouTube => "youtube",
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
        }
    }

    /// File stem used when a title sanitizes to nothing.
    pub fn fallback_name(&self) -> &'static str {
        match self {
            Self::YouTube => "youtube_video",
            Self::Facebook => "facebook_video",
            Self::Instagram => "instagram_reel",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a stream variant carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    /// Audio and video in one file.
    Progressive,
    /// Video track only, needs an audio companion.
    VideoOnly,
    AudioOnly,
}

impl StreamKind {
    pub fn has_video(&self) -> bool {
        matches!(self, Self::Progressive | Self::VideoOnly)
    }
}

/// One downloadable variant of a video, as shown on the listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamVariant {
    /// Opaque identifier passed back on download.
    pub format_selector: String,
    pub kind: StreamKind,
    /// Resolution label such as `720p`, for video variants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Bitrate label such as `128kbps`, for audio-only variants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_kbps: Option<u32>,
    pub mime_type: String,
    /// File extension of the container.
    pub container: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
}

/// Metadata and streams of one video.
#[derive(Debug, Clone, Serialize)]
pub struct MediaListing {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub streams: Vec<StreamVariant>,
}

/// A direct media URL ready to be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStream {
    pub media_url: String,
    pub mime_type: String,
    /// Extension of the container the bytes arrive in.
    pub container: String,
    pub is_audio_only: bool,
    /// True when the stream already carries both audio and video.
    pub is_muxed: bool,
    /// Headers the CDN expects on the request.
    pub headers: HashMap<String, String>,
    pub size_hint: Option<u64>,
}

/// What a download resolves to: a primary stream and, for video-only
/// selections, the audio track to mux with it.
#[derive(Debug, Clone)]
pub struct Selection {
    pub title: String,
    pub primary: ResolvedStream,
    pub audio: Option<ResolvedStream>,
}

impl Selection {
    pub fn needs_mux(&self) -> bool {
        self.audio.is_some()
    }
}

/// One format as reported by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedFormat {
    #[serde(default)]
    pub format_id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Average audio bitrate in kbit/s.
    #[serde(default)]
    pub abr: Option<f64>,
    /// Total bitrate in kbit/s.
    #[serde(default)]
    pub tbr: Option<f64>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub filesize_approx: Option<u64>,
    #[serde(default)]
    pub http_headers: HashMap<String, String>,
}

impl ExtractedFormat {
    fn has_video(&self) -> bool {
        match self.vcodec.as_deref() {
            Some("none") => false,
            Some(_) => true,
            None => self.height.is_some() || self.width.is_some(),
        }
    }

    fn has_audio(&self) -> bool {
        !matches!(self.acodec.as_deref(), Some("none"))
    }

    /// Kind of the format, `None` for entries that are not downloadable media
    /// (storyboards, manifests without a URL).
    pub fn kind(&self) -> Option<StreamKind> {
        if self.url.is_none() || self.protocol.as_deref() == Some("mhtml") {
            return None;
        }
        match (self.has_video(), self.has_audio()) {
            (true, true) => Some(StreamKind::Progressive),
            (true, false) => Some(StreamKind::VideoOnly),
            (false, true) => Some(StreamKind::AudioOnly),
            (false, false) => None,
        }
    }

    pub fn size(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx)
    }

    pub fn audio_bitrate(&self) -> f64 {
        self.abr.or(self.tbr).unwrap_or(0.0)
    }

    fn extension(&self) -> &str {
        self.ext.as_deref().unwrap_or("mp4")
    }

    /// Extension the bytes should be saved with.
    pub fn container(&self) -> String {
        match self.kind() {
            Some(StreamKind::AudioOnly) => audio_extension(self.extension()).to_string(),
            _ => self.extension().to_string(),
        }
    }

    pub fn mime_type(&self) -> String {
        match self.kind() {
            Some(StreamKind::AudioOnly) => match self.extension() {
                "m4a" | "mp4" => "audio/mp4".to_string(),
                other => format!("audio/{}", other),
            },
            _ => format!("video/{}", self.extension()),
        }
    }

    /// Listing entry for this format, `None` when it is not media.
    pub fn to_variant(&self) -> Option<StreamVariant> {
        let kind = self.kind()?;
        let bitrate_kbps = match kind {
            StreamKind::AudioOnly => Some(self.audio_bitrate().round() as u32),
            _ => None,
        };
        Some(StreamVariant {
            format_selector: self.format_id.clone(),
            kind,
            resolution: if kind.has_video() {
                self.height.map(|h| format!("{}p", h))
            } else {
                None
            },
            abr: bitrate_kbps.map(|b| format!("{}kbps", b)),
            height: if kind.has_video() { self.height } else { None },
            bitrate_kbps,
            mime_type: self.mime_type(),
            container: self.container(),
            size: self.size(),
            video_codec: self.vcodec.clone().filter(|c| c != "none"),
            audio_codec: self.acodec.clone().filter(|c| c != "none"),
        })
    }

    /// Direct stream for this format, `None` when it has no URL.
    pub fn to_resolved(&self) -> Option<ResolvedStream> {
        let media_url = self.url.clone()?;
        let kind = self.kind();
        Some(ResolvedStream {
            media_url,
            mime_type: self.mime_type(),
            container: self.container(),
            is_audio_only: kind == Some(StreamKind::AudioOnly),
            is_muxed: kind == Some(StreamKind::Progressive),
            headers: self.http_headers.clone(),
            size_hint: self.size(),
        })
    }
}

/// Page metadata as reported by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedMedia {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub formats: Vec<ExtractedFormat>,
    /// Set when the page resolves to a single file and `formats` is empty.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub http_headers: HashMap<String, String>,
}

impl ExtractedMedia {
    /// Formats, falling back to the top-level single-file entry.
    pub fn all_formats(&self) -> Vec<ExtractedFormat> {
        if !self.formats.is_empty() {
            return self.formats.clone();
        }
        match &self.url {
            Some(url) => vec![ExtractedFormat {
                format_id: "default".to_string(),
                url: Some(url.clone()),
                ext: self.ext.clone(),
                vcodec: self.vcodec.clone(),
                acodec: self.acodec.clone(),
                height: self.height,
                http_headers: self.http_headers.clone(),
                ..Default::default()
            }],
            None => Vec::new(),
        }
    }

    pub fn title_or_default(&self) -> String {
        self.title.clone().unwrap_or_default()
    }

    pub fn author(&self) -> Option<String> {
        self.uploader.clone().or_else(|| self.channel.clone())
    }
}

/// Served extension for an audio-only container.
pub fn audio_extension(ext: &str) -> &str {
    match ext {
        "mp4" | "m4a" => "m4a",
        "webm" => "weba",
        other => other,
    }
}
