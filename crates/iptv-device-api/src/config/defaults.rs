/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 1024 * 1024; // 1MB
pub const DEFAULT_CORS_PERMISSIVE: bool = true;

// Playlist validation defaults
pub const DEFAULT_HEAD_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONTENT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_PREFIX_BYTES: usize = 2048;
pub const DEFAULT_DETAILED_VALIDATION: bool = true;

// Environment
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";
pub const ENV_PREFIX: &str = "IPTV_";
