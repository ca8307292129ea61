//! M3U playlist heuristics
//!
//! Two cheap checks back the playlist validator:
//! - whether a HEAD response plausibly points at a playlist (content type or
//!   URL path), deciding if the content is worth fetching at all
//! - classification of the first few kilobytes of the body: header present,
//!   `#EXTINF` entries and stream URLs counted, extended attributes detected
//!
//! Classification only ever sees a prefix, so counts are samples and the last
//! line may be cut short.

use url::Url;

use crate::models::{PlaylistFormat, ValidationFailure};
use crate::utils::url::UrlUtils;

/// Content types accepted as "probably a playlist" (substring, case-sensitive)
pub const PLAYLIST_CONTENT_TYPES: [&str; 4] = [
    "application/x-mpegurl",
    "audio/x-mpegurl",
    "text/plain",
    "application/octet-stream",
];

const HEADER_TAG: &str = "#EXTM3U";
const ENTRY_TAG: &str = "#EXTINF:";
const EXTENDED_ATTRIBUTE_MARKER: &str = "tvg-";

/// Outcome of a successful prefix classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistSummary {
    /// `min(entry_lines, url_lines)`
    pub channel_count: u64,
    pub format: PlaylistFormat,
    pub entry_lines: u64,
    pub url_lines: u64,
}

/// Whether a content type header matches the playlist allow-list
pub fn content_type_suggests_playlist(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| PLAYLIST_CONTENT_TYPES.iter().any(|allowed| ct.contains(allowed)))
}

/// Whether a resource is worth fetching as a playlist
///
/// True when either the content type is on the allow-list or the URL path
/// mentions `.m3u`.
pub fn looks_like_playlist(content_type: Option<&str>, url: &Url) -> bool {
    content_type_suggests_playlist(content_type) || UrlUtils::path_suggests_m3u(url)
}

fn is_stream_url(line: &str) -> bool {
    !line.starts_with('#') && (line.starts_with("http://") || line.starts_with("https://"))
}

/// Classify the first bytes of a playlist
///
/// Bytes are decoded lossily so a multi-byte character cut at the prefix
/// boundary does not fail the whole classification.
pub fn classify_playlist_prefix(bytes: &[u8]) -> Result<PlaylistSummary, ValidationFailure> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let first = lines.first().ok_or(ValidationFailure::EmptyContent)?;
    if !first.starts_with(HEADER_TAG) {
        return Err(ValidationFailure::MissingHeader);
    }

    let entry_lines = lines.iter().filter(|l| l.starts_with(ENTRY_TAG)).count() as u64;
    let url_lines = lines.iter().filter(|l| is_stream_url(l)).count() as u64;

    if entry_lines == 0 {
        return Err(ValidationFailure::NoChannels);
    }
    if url_lines == 0 {
        return Err(ValidationFailure::NoUrls);
    }

    let format = if lines.iter().any(|l| l.contains(EXTENDED_ATTRIBUTE_MARKER)) {
        PlaylistFormat::M3uExtended
    } else {
        PlaylistFormat::M3u
    };

    Ok(PlaylistSummary {
        channel_count: entry_lines.min(url_lines),
        format,
        entry_lines,
        url_lines,
    })
}
