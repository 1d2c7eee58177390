//! Download orchestration.
//!
//! A request is validated, resolved through its platform adapter, fetched
//! into a private scratch directory, muxed when the chosen stream has no
//! audio, and handed back as a [`ServedFile`]. The scratch directory lives as
//! long as the `ServedFile`, so it is removed once the response body is
//! dropped or as soon as any step fails.

mod artifact;
mod error;

pub use artifact::{sweep_stale, TempArtifact};
pub use error::DownloadError;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DownloadConfig;
use crate::fetcher::MediaFetcher;
use crate::intake::validate_link;
use crate::metrics;
use crate::muxer::{output_container, MuxJob, Muxer};
use crate::progress::{ProgressHandle, ProgressTracker};
use crate::resolver::{
    FacebookResolver, InstagramResolver, MediaExtractor, MediaListing, Platform, ResolvedStream,
    Selection, YouTubeResolver,
};

/// One download as submitted from a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub platform: Platform,
    pub source_url: String,
    /// Opaque stream identifier, only used for YouTube.
    pub format_selector: Option<String>,
    /// Key of the progress entry.
    pub download_id: String,
}

impl DownloadRequest {
    /// Build a request from raw form fields.
    ///
    /// A blank link is rejected with the platform's prompt. A blank or
    /// missing download id is replaced by a fresh UUID.
    pub fn from_form(
        platform: Platform,
        link: Option<&str>,
        format_selector: Option<&str>,
        download_id: Option<&str>,
    ) -> Result<Self, DownloadError> {
        let source_url = validate_link(link, missing_link_message(platform))?;
        let format_selector = format_selector
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let download_id = download_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Ok(Self {
            platform,
            source_url,
            format_selector,
            download_id,
        })
    }
}

/// Prompt shown when a platform's link field is left blank.
pub fn missing_link_message(platform: Platform) -> &'static str {
    match platform {
        Platform::YouTube => "Please enter a YouTube video link",
        Platform::Facebook => "Please enter a Facebook video URL",
        Platform::Instagram => "Please enter an Instagram reel URL",
    }
}

/// Keep letters, digits, spaces, `-` and `_`, then trim trailing whitespace.
/// Falls back to `fallback` when nothing is left.
pub fn sanitize_title(title: &str, fallback: &str) -> String {
    let safe: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let safe = safe.trim_end();
    if safe.trim().is_empty() {
        fallback.to_string()
    } else {
        safe.to_string()
    }
}

/// Content type for a served container extension.
pub fn content_type_for(container: &str) -> &'static str {
    match container {
        "mp4" => "video/mp4",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "m4a" => "audio/mp4",
        "weba" => "audio/webm",
        "mp3" => "audio/mpeg",
        "ogg" | "opus" => "audio/ogg",
        _ => "application/octet-stream",
    }
}

/// A finished file ready to stream to the client.
#[derive(Debug)]
pub struct ServedFile {
    pub path: PathBuf,
    /// Name offered in `Content-Disposition`.
    pub download_name: String,
    pub content_type: String,
    pub size: u64,
    pub download_id: String,
    /// Owns the directory `path` lives in.
    pub artifact: TempArtifact,
}

pub struct DownloadService {
    youtube: YouTubeResolver,
    facebook: FacebookResolver,
    instagram: InstagramResolver,
    fetcher: Arc<dyn MediaFetcher>,
    muxer: Arc<dyn Muxer>,
    progress: Arc<ProgressTracker>,
    scratch_dir: PathBuf,
}

impl DownloadService {
    pub fn new(
        extractor: Arc<dyn MediaExtractor>,
        fetcher: Arc<dyn MediaFetcher>,
        muxer: Arc<dyn Muxer>,
        progress: Arc<ProgressTracker>,
        config: &DownloadConfig,
    ) -> Self {
        Self {
            youtube: YouTubeResolver::new(Arc::clone(&extractor)),
            facebook: FacebookResolver::new(Arc::clone(&extractor)),
            instagram: InstagramResolver::new(extractor),
            fetcher,
            muxer,
            progress,
            scratch_dir: config.scratch_dir.clone(),
        }
    }

    pub fn progress(&self) -> &Arc<ProgressTracker> {
        &self.progress
    }

    pub fn scratch_dir(&self) -> &std::path::Path {
        &self.scratch_dir
    }

    /// Streams available for a YouTube link.
    pub async fn list_youtube(&self, link: Option<&str>) -> Result<MediaListing, DownloadError> {
        let link = validate_link(link, missing_link_message(Platform::YouTube))?;
        self.youtube.list_streams(&link).await.map_err(|e| {
            let err = DownloadError::from(e);
            log_failure(Platform::YouTube, &link, &err);
            err
        })
    }

    /// Run a download to completion.
    pub async fn download(&self, request: &DownloadRequest) -> Result<ServedFile, DownloadError> {
        metrics::DOWNLOADS_STARTED
            .with_label_values(&[request.platform.as_str()])
            .inc();

        let result = match request.platform {
            Platform::YouTube => self.download_youtube(request).await,
            Platform::Facebook => self.download_facebook(request).await,
            Platform::Instagram => self.download_instagram(request).await,
        };

        match &result {
            Ok(file) => {
                metrics::DOWNLOADS_COMPLETED
                    .with_label_values(&[request.platform.as_str()])
                    .inc();
                tracing::info!(
                    platform = %request.platform,
                    download_id = %request.download_id,
                    file = %file.download_name,
                    bytes = file.size,
                    "Download ready"
                );
            }
            Err(e) => log_failure(request.platform, &request.source_url, e),
        }

        result
    }

    async fn download_youtube(&self, request: &DownloadRequest) -> Result<ServedFile, DownloadError> {
        let selector = request
            .format_selector
            .as_deref()
            .ok_or(DownloadError::MissingSelector)?;
        let selection = self.youtube.select(&request.source_url, selector).await?;
        let stem = sanitize_title(&selection.title, Platform::YouTube.fallback_name());

        self.materialize(request, &selection, |container| format!("{}.{}", stem, container))
            .await
    }

    async fn download_facebook(&self, request: &DownloadRequest) -> Result<ServedFile, DownloadError> {
        let selection = self.facebook.resolve_hd(&request.source_url).await?;
        let stem = sanitize_title(&selection.title, Platform::Facebook.fallback_name());

        self.materialize(request, &selection, |container| format!("{}.{}", stem, container))
            .await
    }

    async fn download_instagram(&self, request: &DownloadRequest) -> Result<ServedFile, DownloadError> {
        let post = self.instagram.resolve_post(&request.source_url).await?;
        let shortcode = post.shortcode.as_str();

        self.materialize(request, &post.selection, |container| {
            format!("instagram_reel_{}.{}", shortcode, container)
        })
        .await
    }

    /// Fetch (and mux if needed) a selection into a new scratch directory.
    async fn materialize(
        &self,
        request: &DownloadRequest,
        selection: &Selection,
        download_name: impl Fn(&str) -> String,
    ) -> Result<ServedFile, DownloadError> {
        let artifact = TempArtifact::create(&self.scratch_dir)?;
        let progress = self.progress.start(request.download_id.as_str());

        let (path, container) = match &selection.audio {
            Some(audio) => {
                let video_path = artifact.file(&format!("video.{}", selection.primary.container));
                let audio_path = artifact.file(&format!("audio.{}", audio.container));
                let video_bytes = self
                    .fetch(&selection.primary, &video_path, &progress, 0, audio.size_hint)
                    .await?;
                self.fetch(audio, &audio_path, &progress, video_bytes, None)
                    .await?;

                let container = output_container(&selection.primary.container);
                let output_path = artifact.file(&format!("output.{}", container));
                self.muxer
                    .mux(MuxJob {
                        job_id: request.download_id.clone(),
                        video_path,
                        audio_path,
                        output_path: output_path.clone(),
                    })
                    .await?;
                (output_path, container.to_string())
            }
            None => {
                let container = selection.primary.container.clone();
                let path = artifact.file(&format!("media.{}", container));
                self.fetch(&selection.primary, &path, &progress, 0, None)
                    .await?;
                (path, container)
            }
        };

        let size = tokio::fs::metadata(&path).await?.len();
        progress.complete();
        Ok(ServedFile {
            download_name: download_name(&container),
            content_type: content_type_for(&container).to_string(),
            path,
            size,
            download_id: request.download_id.clone(),
            artifact,
        })
    }

    /// Fetch one track, reporting progress as part of the whole download.
    ///
    /// `offset` is what earlier tracks already wrote and `rest` the expected
    /// size of the tracks still to come.
    async fn fetch(
        &self,
        stream: &ResolvedStream,
        dest: &std::path::Path,
        progress: &ProgressHandle,
        offset: u64,
        rest: Option<u64>,
    ) -> Result<u64, DownloadError> {
        let written = self
            .fetcher
            .fetch(stream, dest, &|downloaded, total| {
                let (downloaded, total) = overall_progress(offset, rest, downloaded, total);
                progress.update(downloaded, total)
            })
            .await?;
        Ok(written)
    }
}

/// Progress of one track mapped onto the whole download.
fn overall_progress(
    offset: u64,
    rest: Option<u64>,
    downloaded: u64,
    total: Option<u64>,
) -> (u64, Option<u64>) {
    (
        offset + downloaded,
        total.map(|t| offset + t + rest.unwrap_or(0)),
    )
}

fn log_failure(platform: Platform, url: &str, error: &DownloadError) {
    metrics::DOWNLOADS_FAILED
        .with_label_values(&[platform.as_str(), error.stage()])
        .inc();
    tracing::warn!(
        platform = %platform,
        url = %url,
        stage = error.stage(),
        error = %error,
        "Download failed"
    );
}
