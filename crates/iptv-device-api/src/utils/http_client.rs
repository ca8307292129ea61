use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::{Client, Response, header};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::ValidationConfig;
use crate::errors::{AppResult, ProbeError, ProbeResult};
use crate::utils::url::UrlUtils;

/// What the validator needs to know about a probe response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    /// Response body, truncated to the requested prefix (empty for HEAD)
    pub body: Bytes,
}

impl ProbeResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<Bytes>) -> Self {
        let status_text = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
            .to_string();

        Self {
            status,
            status_text,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    /// Any 2xx status, including `206 Partial Content`
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn from_parts(response: &Response, body: Bytes) -> Self {
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            content_type,
            body,
        }
    }
}

/// Time-boundable HTTP capability consumed by the playlist validator
///
/// Implementations must return [`ProbeError::Cancelled`] promptly once the
/// token fires and drop any in-flight request. Time bounds are applied by the
/// caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaylistHttpClient: Send + Sync {
    /// Issue a HEAD request
    async fn head(&self, url: &str, cancel: CancellationToken) -> ProbeResult<ProbeResponse>;

    /// Issue a GET for at most the first `max_bytes` bytes of the resource
    async fn get_prefix(
        &self,
        url: &str,
        max_bytes: usize,
        cancel: CancellationToken,
    ) -> ProbeResult<ProbeResponse>;
}

/// Default implementation of [`PlaylistHttpClient`] using reqwest
pub struct ReqwestPlaylistClient {
    client: Client,
}

impl ReqwestPlaylistClient {
    /// Create a client with the connection timeout and user agent from config
    ///
    /// No total request timeout is set on the client: each probe is bounded by
    /// the validator instead.
    pub fn new(config: &ValidationConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Read at most `max_bytes` of the body
    ///
    /// Servers that ignore the `Range` header send the whole resource; reading
    /// stops as soon as the prefix is filled so large playlists are not
    /// downloaded.
    async fn read_prefix(mut response: Response, max_bytes: usize) -> ProbeResult<Bytes> {
        let mut buffer = BytesMut::with_capacity(max_bytes.min(64 * 1024));

        while buffer.len() < max_bytes {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    let remaining = max_bytes - buffer.len();
                    buffer.extend_from_slice(&chunk[..chunk.len().min(remaining)]);
                }
                Ok(None) => break,
                Err(e) => return Err(ProbeError::from_reqwest(&e)),
            }
        }

        Ok(buffer.freeze())
    }
}

#[async_trait]
impl PlaylistHttpClient for ReqwestPlaylistClient {
    async fn head(&self, url: &str, cancel: CancellationToken) -> ProbeResult<ProbeResponse> {
        debug!("HEAD {}", UrlUtils::obfuscate_credentials(url));

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ProbeError::Cancelled),
            result = self.client.head(url).send() => {
                result.map_err(|e| ProbeError::from_reqwest(&e))?
            }
        };

        debug!(
            "HEAD {} -> {}",
            UrlUtils::obfuscate_credentials(url),
            response.status()
        );
        Ok(ProbeResponse::from_parts(&response, Bytes::new()))
    }

    async fn get_prefix(
        &self,
        url: &str,
        max_bytes: usize,
        cancel: CancellationToken,
    ) -> ProbeResult<ProbeResponse> {
        let range = format!("bytes=0-{}", max_bytes.saturating_sub(1));
        debug!("GET {} (Range: {})", UrlUtils::obfuscate_credentials(url), range);

        let request = self.client.get(url).header(header::RANGE, range).send();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ProbeError::Cancelled),
            result = request => result.map_err(|e| ProbeError::from_reqwest(&e))?,
        };

        if !response.status().is_success() {
            return Ok(ProbeResponse::from_parts(&response, Bytes::new()));
        }

        let head = ProbeResponse::from_parts(&response, Bytes::new());
        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ProbeError::Cancelled),
            body = Self::read_prefix(response, max_bytes) => body?,
        };

        debug!("Read {} bytes of playlist prefix", body.len());
        Ok(ProbeResponse { body, ..head })
    }
}
