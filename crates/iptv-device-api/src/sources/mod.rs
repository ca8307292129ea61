//! Playlist source handling
//!
//! Format-level knowledge about remote playlists, independent of how the
//! bytes were fetched:
//! - [`m3u`]: M3U/M3U8 content-type heuristics and prefix classification

pub mod m3u;

pub use m3u::{PlaylistSummary, classify_playlist_prefix, looks_like_playlist};
