//! Adapter configuration
//!
//! Loaded from a YAML file or from `F2C_*` environment variables on top of
//! the defaults.

use crate::error::{CloudError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Top-level adapter configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    pub http: HttpClientConfig,
    pub log: LogConfig,
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_idle_per_host: usize,

    /// How long an idle pooled connection is kept
    pub idle_keep_alive_secs: u64,

    /// Vendor endpoints commonly run with self-signed certificates
    pub accept_invalid_certs: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 60,
            request_timeout_secs: 60,
            max_idle_per_host: 20,
            idle_keep_alive_secs: 20,
            accept_invalid_certs: true,
        }
    }
}

impl HttpClientConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Build the shared HTTP client used by REST-based adapters
    pub fn build_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout())
            .timeout(self.request_timeout())
            .pool_max_idle_per_host(self.max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(self.idle_keep_alive_secs))
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(|e| CloudError::InvalidConfig(format!("HTTP client: {}", e)))
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            ansi: true,
        }
    }
}

impl AdapterConfig {
    /// Read a YAML configuration file; missing keys keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: AdapterConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded adapter config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Defaults overridden by `F2C_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = env_parse("F2C_HTTP_CONNECT_TIMEOUT_SECS")? {
            config.http.connect_timeout_secs = v;
        }
        if let Some(v) = env_parse("F2C_HTTP_REQUEST_TIMEOUT_SECS")? {
            config.http.request_timeout_secs = v;
        }
        if let Some(v) = env_parse("F2C_HTTP_MAX_IDLE_PER_HOST")? {
            config.http.max_idle_per_host = v;
        }
        if let Some(v) = env_parse("F2C_HTTP_ACCEPT_INVALID_CERTS")? {
            config.http.accept_invalid_certs = v;
        }
        if let Ok(filter) = std::env::var("F2C_LOG_FILTER") {
            config.log.filter = filter;
        }

        Ok(config)
    }
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CloudError::InvalidConfig(format!("{} has invalid value '{}'", key, raw))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = AdapterConfig::default();
        assert_eq!(config.http.connect_timeout(), Duration::from_secs(60));
        assert_eq!(config.http.max_idle_per_host, 20);
        assert!(config.http.accept_invalid_certs);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_load_partial_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("adapter.yaml");
        fs::write(
            &path,
            "http:\n  request_timeout_secs: 5\nlog:\n  filter: f2c_cloud=debug\n",
        )
        .unwrap();

        let config = AdapterConfig::load(&path).unwrap();
        assert_eq!(config.http.request_timeout_secs, 5);
        assert_eq!(config.http.connect_timeout_secs, 60);
        assert_eq!(config.log.filter, "f2c_cloud=debug");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = AdapterConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, CloudError::Io(_)));
    }

    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                ("F2C_HTTP_CONNECT_TIMEOUT_SECS", Some("10")),
                ("F2C_HTTP_ACCEPT_INVALID_CERTS", Some("false")),
                ("F2C_LOG_FILTER", Some("warn")),
            ],
            || {
                let config = AdapterConfig::from_env().unwrap();
                assert_eq!(config.http.connect_timeout_secs, 10);
                assert!(!config.http.accept_invalid_certs);
                assert_eq!(config.log.filter, "warn");
                assert_eq!(config.http.request_timeout_secs, 60);
            },
        );
    }

    #[test]
    fn test_from_env_rejects_garbage() {
        temp_env::with_var("F2C_HTTP_MAX_IDLE_PER_HOST", Some("many"), || {
            let err = AdapterConfig::from_env().unwrap_err();
            assert!(matches!(err, CloudError::InvalidConfig(_)));
        });
    }

    #[test]
    fn test_build_client() {
        assert!(HttpClientConfig::default().build_client().is_ok());
    }
}
