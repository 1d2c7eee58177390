//! Platform resolver adapters.
//!
//! Each adapter checks that a link belongs to its platform, asks the
//! [`MediaExtractor`] for the page's formats and turns the report into the
//! listing or streams a download needs. Extractor failures are normalized
//! into [`ResolveError`] here and nowhere else.

mod error;
mod facebook;
mod instagram;
mod traits;
mod types;
mod youtube;
mod ytdlp;

pub use error::ResolveError;
pub use facebook::FacebookResolver;
pub use instagram::{shortcode_from_url, InstagramPost, InstagramResolver};
pub use traits::MediaExtractor;
pub use types::{
    audio_extension, ExtractedFormat, ExtractedMedia, MediaListing, Platform, ResolvedStream,
    Selection, StreamKind, StreamVariant,
};
pub use youtube::YouTubeResolver;
pub use ytdlp::YtDlpExtractor;

use url::Url;

/// Parse a pasted link and check that its host belongs to `hosts`.
///
/// Links pasted without a scheme are read as `https`.
pub fn parse_platform_url(link: &str, hosts: &[&str]) -> Result<Url, ResolveError> {
    let parsed = match Url::parse(link) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{}", link))
            .map_err(|_| ResolveError::url_invalid(link))?,
        Err(_) => return Err(ResolveError::url_invalid(link)),
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ResolveError::url_invalid(link));
    }

    let host = parsed
        .host_str()
        .map(|h| h.trim_start_matches("www.").to_lowercase())
        .ok_or_else(|| ResolveError::url_invalid(link))?;

    let known = hosts
        .iter()
        .any(|h| host == *h || host.ends_with(&format!(".{}", h)));
    if !known {
        return Err(ResolveError::url_invalid(link));
    }

    Ok(parsed)
}
