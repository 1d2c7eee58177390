//! Muxing separately fetched video and audio tracks into one file.
//!
//! The video track is copied as-is; only the audio is re-encoded when the
//! configured codec asks for it.

mod error;
mod ffmpeg;
mod traits;
mod types;

pub use error::MuxError;
pub use ffmpeg::FfmpegMuxer;
pub use traits::Muxer;
pub use types::{output_container, MuxJob, MuxResult};
