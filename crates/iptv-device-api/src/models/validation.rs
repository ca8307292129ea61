//! Playlist validation request and verdict types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

/// Request body for `POST /api/v1/playlists/validate`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidatePlaylistRequest {
    /// Absolute http(s) URL of the playlist
    pub url: String,
    /// Override the configured mode; `false` skips content classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed: Option<bool>,
}

/// How far the validator goes after a successful HEAD probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// HEAD probe and content-type heuristic only
    Basic,
    /// Also fetch and classify the playlist prefix
    Detailed,
}

impl ValidationMode {
    pub fn from_detailed(detailed: bool) -> Self {
        if detailed { Self::Detailed } else { Self::Basic }
    }
}

/// Playlist flavour detected from content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistFormat {
    M3u,
    /// At least one line carries `tvg-*` attributes
    M3uExtended,
}

impl fmt::Display for PlaylistFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaylistFormat::M3u => write!(f, "M3U"),
            PlaylistFormat::M3uExtended => write!(f, "M3U Extended"),
        }
    }
}

/// Why a URL was judged not to be a usable playlist
///
/// The display strings are diagnostic only; callers should treat every variant
/// as plain "invalid".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("network error / timeout")]
    Timeout,

    #[error("network error / timeout")]
    Network,

    #[error("HTTP {status}: {status_text}")]
    HttpStatus { status: u16, status_text: String },

    #[error("URL does not appear to be a valid M3U playlist")]
    NotAPlaylist,

    #[error("Empty content")]
    EmptyContent,

    #[error("Missing #EXTM3U header")]
    MissingHeader,

    #[error("No channels found in playlist")]
    NoChannels,

    #[error("No valid URLs found in playlist")]
    NoUrls,
}

/// Result of validating one playlist URL
///
/// Exactly one of `is_valid` or `error` holds. Built only through
/// [`ValidationVerdict::valid`], [`ValidationVerdict::unparsed`] and
/// [`ValidationVerdict::invalid`], and immutable afterwards.
///
/// `channel_count` is sampled from the fetched prefix only, so it is a lower
/// bound for playlists larger than the prefix window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationVerdict {
    is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ValidationVerdict {
    /// Content was fetched and classified
    pub fn valid(format: PlaylistFormat, channel_count: u64) -> Self {
        Self {
            is_valid: true,
            channel_count: Some(channel_count),
            format: Some(format.to_string()),
            error: None,
        }
    }

    /// Accepted on the HEAD probe alone; `format` is the reported content type
    /// or `"unknown"`
    pub fn unparsed(content_type: Option<&str>) -> Self {
        Self {
            is_valid: true,
            channel_count: None,
            format: Some(content_type.unwrap_or("unknown").to_string()),
            error: None,
        }
    }

    pub fn invalid(failure: ValidationFailure) -> Self {
        Self {
            is_valid: false,
            channel_count: None,
            format: None,
            error: Some(failure.to_string()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn channel_count(&self) -> Option<u64> {
        self.channel_count
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl From<ValidationFailure> for ValidationVerdict {
    fn from(failure: ValidationFailure) -> Self {
        Self::invalid(failure)
    }
}
