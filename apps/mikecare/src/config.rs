//! # Configuration
//!
//! Layered settings for the server and CLI:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config <path>`, or `mikecare.toml` in the working
//!    directory if present)
//! 3. Environment: `MIKECARE_AUTH_URL`, `MIKECARE_ANALYSIS_DELAY_MS`
//! 4. CLI flags, applied by the command that needs them
//!
//! Security knobs (`MIKECARE_API_KEY`, `MIKECARE_RATE_LIMIT`,
//! `MIKECARE_CORS_ORIGINS`) are read by the HTTP layer at router build time
//! and are not part of this struct.

use mikecare_core::primitives::DEFAULT_ANALYSIS_DELAY_MS;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "mikecare.toml";

/// Login endpoint used when nothing else is configured.
pub const DEFAULT_AUTH_URL: &str = "http://127.0.0.1:5000/api/login";

pub const ENV_AUTH_URL: &str = "MIKECARE_AUTH_URL";
pub const ENV_ANALYSIS_DELAY_MS: &str = "MIKECARE_ANALYSIS_DELAY_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Authentication endpoint (POST, JSON).
    pub auth_url: String,
    /// Simulated analysis latency between submit and hand-off.
    pub analysis_delay_ms: u64,
    /// Seconds before the login request is abandoned.
    pub auth_timeout_secs: u64,
    /// Server bind host.
    pub host: String,
    /// Server bind port.
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            analysis_delay_ms: DEFAULT_ANALYSIS_DELAY_MS,
            auth_timeout_secs: 10,
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    /// Load defaults, then the config file, then the process environment.
    ///
    /// An explicit `path` must exist; the implicit `mikecare.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    Self::from_file(implicit)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Parse a TOML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override fields from environment variables.
    ///
    /// `lookup` abstracts the environment so tests need not mutate it.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup(ENV_AUTH_URL).filter(|v| !v.is_empty()) {
            self.auth_url = url;
        }
        if let Some(raw) = lookup(ENV_ANALYSIS_DELAY_MS) {
            self.analysis_delay_ms = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_ANALYSIS_DELAY_MS,
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    #[must_use]
    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    #[must_use]
    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.analysis_delay_ms, 2000);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn file_overrides_defaults_partially() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("mikecare.toml");
        std::fs::write(&path, "analysis_delay_ms = 50\nport = 9000\n").expect("write");

        let config = Config::from_file(&path).expect("load");
        assert_eq!(config.analysis_delay_ms, 50);
        assert_eq!(config.port, 9000);
        assert_eq!(config.auth_url, DEFAULT_AUTH_URL);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "analysis_delay = 50\n").expect("write");
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn env_overrides_file() {
        let mut config = Config::default();
        config
            .apply_env(env_of(&[
                (ENV_AUTH_URL, "http://auth.test/login"),
                (ENV_ANALYSIS_DELAY_MS, "0"),
            ]))
            .expect("env");
        assert_eq!(config.auth_url, "http://auth.test/login");
        assert_eq!(config.analysis_delay(), Duration::ZERO);
    }

    #[test]
    fn bad_env_delay_is_reported() {
        let mut config = Config::default();
        let result = config.apply_env(env_of(&[(ENV_ANALYSIS_DELAY_MS, "soon")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnv {
                var: ENV_ANALYSIS_DELAY_MS,
                ..
            })
        ));
    }
}
