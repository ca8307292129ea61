//! Remote M3U playlist validation
//!
//! Decides whether a URL points at a usable M3U/M3U8 playlist with at most two
//! sequential probes:
//!
//! 1. HEAD, bounded by `head_timeout`. Any failure here is fatal.
//! 2. Content-type / URL heuristic. A miss stops before any GET is issued.
//! 3. Ranged GET for the first `prefix_bytes`, bounded by `content_timeout`.
//!    Failure here is tolerated: the HEAD result alone is enough to accept.
//! 4. Classification of the fetched prefix.
//!
//! Every outcome, including network failures, is returned as a
//! [`ValidationVerdict`]; nothing is retried and no state is kept between calls.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::config::ValidationConfig;
use crate::errors::{AppResult, ProbeError, ProbeResult};
use crate::models::{ValidationFailure, ValidationMode, ValidationVerdict};
use crate::sources::m3u::{classify_playlist_prefix, looks_like_playlist};
use crate::utils::http_client::{PlaylistHttpClient, ProbeResponse, ReqwestPlaylistClient};
use crate::utils::url::UrlUtils;

/// Probe bounds and default mode for a [`PlaylistValidator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistValidatorSettings {
    pub head_timeout: Duration,
    pub content_timeout: Duration,
    pub prefix_bytes: usize,
    pub mode: ValidationMode,
}

impl From<&ValidationConfig> for PlaylistValidatorSettings {
    fn from(config: &ValidationConfig) -> Self {
        Self {
            head_timeout: config.head_timeout,
            content_timeout: config.content_timeout,
            prefix_bytes: config.prefix_bytes,
            mode: ValidationMode::from_detailed(config.detailed),
        }
    }
}

impl Default for PlaylistValidatorSettings {
    fn default() -> Self {
        Self::from(&ValidationConfig::default())
    }
}

/// Validates remote playlists; cheap to clone and safe to share across tasks
#[derive(Clone)]
pub struct PlaylistValidator {
    client: Arc<dyn PlaylistHttpClient>,
    settings: PlaylistValidatorSettings,
}

impl PlaylistValidator {
    pub fn new(client: Arc<dyn PlaylistHttpClient>, settings: PlaylistValidatorSettings) -> Self {
        Self { client, settings }
    }

    /// Build a validator backed by reqwest
    pub fn from_config(config: &ValidationConfig) -> AppResult<Self> {
        let client = ReqwestPlaylistClient::new(config)?;
        Ok(Self::new(Arc::new(client), PlaylistValidatorSettings::from(config)))
    }

    pub fn settings(&self) -> &PlaylistValidatorSettings {
        &self.settings
    }

    /// Validate using the configured mode
    ///
    /// `url` must already have passed [`UrlUtils::parse_playlist_url`]; scheme
    /// and syntax are not checked again here.
    pub async fn validate(&self, url: &Url) -> ValidationVerdict {
        self.validate_with_mode(url, self.settings.mode).await
    }

    pub async fn validate_with_mode(&self, url: &Url, mode: ValidationMode) -> ValidationVerdict {
        self.validate_with_cancellation(url, mode, &CancellationToken::new())
            .await
    }

    /// Validate, aborting outstanding probes when `cancel` fires
    ///
    /// A cancelled HEAD probe yields the same verdict as a timed-out one.
    pub async fn validate_with_cancellation(
        &self,
        url: &Url,
        mode: ValidationMode,
        cancel: &CancellationToken,
    ) -> ValidationVerdict {
        let display_url = UrlUtils::obfuscate_credentials(url.as_str());
        debug!("Validating playlist {} ({:?})", display_url, mode);

        let head = match bounded(self.settings.head_timeout, cancel, |token| {
            self.client.head(url.as_str(), token)
        })
        .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!("HEAD probe failed for {}: {}", display_url, e);
                return ValidationVerdict::invalid(match e {
                    ProbeError::Network { .. } => ValidationFailure::Network,
                    ProbeError::Timeout { .. } | ProbeError::Cancelled => ValidationFailure::Timeout,
                });
            }
        };

        if !head.is_success() {
            debug!("HEAD probe for {} returned {}", display_url, head.status);
            return ValidationVerdict::invalid(ValidationFailure::HttpStatus {
                status: head.status,
                status_text: head.status_text,
            });
        }

        let content_type = head.content_type.as_deref();
        if !looks_like_playlist(content_type, url) {
            debug!(
                "{} rejected: content type {:?} and path do not suggest a playlist",
                display_url, content_type
            );
            return ValidationVerdict::invalid(ValidationFailure::NotAPlaylist);
        }

        if mode == ValidationMode::Basic {
            return ValidationVerdict::unparsed(content_type);
        }

        let prefix_bytes = self.settings.prefix_bytes;
        let content = bounded(self.settings.content_timeout, cancel, |token| {
            self.client.get_prefix(url.as_str(), prefix_bytes, token)
        })
        .await;

        match content {
            Ok(response) if response.is_success() => Self::classify(&response),
            Ok(response) => {
                warn!(
                    "Content probe for {} returned {}, accepting on HEAD alone",
                    display_url, response.status
                );
                ValidationVerdict::unparsed(content_type)
            }
            Err(e) => {
                warn!(
                    "Content probe for {} failed ({}), accepting on HEAD alone",
                    display_url, e
                );
                ValidationVerdict::unparsed(content_type)
            }
        }
    }

    fn classify(response: &ProbeResponse) -> ValidationVerdict {
        match classify_playlist_prefix(&response.body) {
            Ok(summary) => {
                debug!(
                    "Playlist prefix: {} entries, {} urls, format {}",
                    summary.entry_lines, summary.url_lines, summary.format
                );
                ValidationVerdict::valid(summary.format, summary.channel_count)
            }
            Err(failure) => ValidationVerdict::invalid(failure),
        }
    }
}

/// Run one probe under its own deadline and a child of `parent`
///
/// On expiry the probe future is dropped, which aborts the request, and its
/// token is cancelled for anything the client spawned.
async fn bounded<F, Fut>(
    timeout: Duration,
    parent: &CancellationToken,
    probe: F,
) -> ProbeResult<ProbeResponse>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = ProbeResult<ProbeResponse>>,
{
    let token = parent.child_token();
    match tokio::time::timeout(timeout, probe(token.clone())).await {
        Ok(result) => result,
        Err(_) => {
            token.cancel();
            Err(ProbeError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            })
        }
    }
}
