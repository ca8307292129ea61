use anyhow::Result;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use defaults::*;
use duration_serde::duration;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for a whole API request, probes included
    #[serde(default = "default_request_timeout", with = "duration")]
    pub request_timeout: Duration,
    /// Maximum accepted request body in bytes
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
    #[serde(default = "default_cors_permissive")]
    pub cors_permissive: bool,
}

/// Playlist validation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Bound on the HEAD probe
    #[serde(default = "default_head_timeout", with = "duration")]
    pub head_timeout: Duration,
    /// Bound on the partial content probe
    #[serde(default = "default_content_timeout", with = "duration")]
    pub content_timeout: Duration,
    /// TCP/TLS connect timeout for the outbound client
    #[serde(default = "default_connect_timeout", with = "duration")]
    pub connect_timeout: Duration,
    /// Size of the playlist prefix fetched with a byte-range request
    #[serde(default = "default_prefix_bytes")]
    pub prefix_bytes: usize,
    /// Run content classification (detailed) or stop after HEAD (basic)
    #[serde(default = "default_detailed")]
    pub detailed: bool,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
}

fn default_max_request_size() -> usize {
    DEFAULT_MAX_REQUEST_SIZE
}

fn default_cors_permissive() -> bool {
    DEFAULT_CORS_PERMISSIVE
}

// Validation defaults
fn default_head_timeout() -> Duration {
    Duration::from_secs(DEFAULT_HEAD_TIMEOUT_SECS)
}

fn default_content_timeout() -> Duration {
    Duration::from_secs(DEFAULT_CONTENT_TIMEOUT_SECS)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
}

fn default_prefix_bytes() -> usize {
    DEFAULT_PREFIX_BYTES
}

fn default_detailed() -> bool {
    DEFAULT_DETAILED_VALIDATION
}

fn default_user_agent() -> String {
    format!("iptv-device-api/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            max_request_size: default_max_request_size(),
            cors_permissive: default_cors_permissive(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            head_timeout: default_head_timeout(),
            content_timeout: default_content_timeout(),
            connect_timeout: default_connect_timeout(),
            prefix_bytes: default_prefix_bytes(),
            detailed: default_detailed(),
            user_agent: default_user_agent(),
        }
    }
}

impl ValidationConfig {
    /// Worst-case wall time of one detailed validation
    pub fn worst_case_duration(&self) -> Duration {
        self.head_timeout + self.content_timeout
    }
}

impl Config {
    /// Load using the `CONFIG_FILE` environment variable or `config.toml`
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from_file(&config_file)
    }

    /// Load configuration layered as defaults < TOML file < `IPTV_*` env vars
    ///
    /// A missing file is created with the default configuration. Nested keys
    /// use `__` in env vars, e.g. `IPTV_VALIDATION__HEAD_TIMEOUT=5s`.
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if !Path::new(config_file).exists() {
            let contents = toml::to_string_pretty(&Self::default())?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
        }

        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> AppResult<()> {
        if self.web.port == 0 {
            return Err(AppError::configuration("web.port must be greater than 0"));
        }
        if self.web.max_request_size == 0 {
            return Err(AppError::configuration(
                "web.max_request_size must be greater than 0",
            ));
        }

        let validation = &self.validation;
        for (name, value) in [
            ("validation.head_timeout", validation.head_timeout),
            ("validation.content_timeout", validation.content_timeout),
            ("validation.connect_timeout", validation.connect_timeout),
        ] {
            if value.is_zero() {
                return Err(AppError::configuration(format!(
                    "{name} must be greater than 0"
                )));
            }
        }
        if validation.prefix_bytes == 0 {
            return Err(AppError::configuration(
                "validation.prefix_bytes must be greater than 0",
            ));
        }
        if self.web.request_timeout <= validation.worst_case_duration() {
            return Err(AppError::configuration(format!(
                "web.request_timeout ({}) must exceed validation.head_timeout + validation.content_timeout ({})",
                humantime::format_duration(self.web.request_timeout),
                humantime::format_duration(validation.worst_case_duration()),
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.validation.head_timeout, Duration::from_secs(10));
        assert_eq!(config.validation.content_timeout, Duration::from_secs(15));
        assert_eq!(config.validation.prefix_bytes, 2048);
        assert!(config.validation.detailed);
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = Config::default();
        config.validation.head_timeout = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.validation.prefix_bytes = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.web.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_request_timeout_shorter_than_probes() {
        let mut config = Config::default();
        config.web.request_timeout = Duration::from_secs(20);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("web.request_timeout"));
    }

    #[test]
    #[serial]
    fn test_load_creates_missing_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path_str = path.to_str().unwrap();

        let config = Config::load_from_file(path_str).unwrap();
        assert!(path.exists());
        assert_eq!(config.web.port, DEFAULT_PORT);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("head_timeout = \"10s\""));
    }

    #[test]
    #[serial]
    fn test_load_merges_file_and_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[web]
port = 9090

[validation]
head_timeout = "3s"
detailed = false
"#,
        )
        .unwrap();

        // SAFETY: env mutation is confined to #[serial] tests
        unsafe { std::env::set_var("IPTV_VALIDATION__PREFIX_BYTES", "4096") };
        let loaded = Config::load_from_file(path.to_str().unwrap());
        unsafe { std::env::remove_var("IPTV_VALIDATION__PREFIX_BYTES") };
        let config = loaded.unwrap();

        assert_eq!(config.web.port, 9090);
        assert_eq!(config.web.host, DEFAULT_HOST);
        assert_eq!(config.validation.head_timeout, Duration::from_secs(3));
        assert_eq!(config.validation.content_timeout, Duration::from_secs(15));
        assert_eq!(config.validation.prefix_bytes, 4096);
        assert!(!config.validation.detailed);
    }
}
