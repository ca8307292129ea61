//! Utility modules
//!
//! Reusable helpers shared by the service and web layers.

pub mod http_client;
pub mod url;
pub mod validation;

pub use http_client::{PlaylistHttpClient, ProbeResponse, ReqwestPlaylistClient};
pub use url::UrlUtils;
