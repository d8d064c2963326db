//! Client configuration: base URL, timeout, and the on-disk config file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, XbeError};

/// Production API base URL.
pub const DEFAULT_BASE_URL: &str = "https://app.x-b-e.com";

/// Request timeout used when `XBE_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "XBE_BASE_URL";

/// Environment variable overriding the request timeout.
pub const TIMEOUT_ENV: &str = "XBE_TIMEOUT_SECS";

/// Read-only view of environment variables.
///
/// Resolution code takes an `Env` instead of reading the process environment
/// directly so tests can supply a fixed map.
pub trait Env {
    /// Value of `key`, or `None` when unset or blank.
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl Env for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Contents of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Default API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Token used for any base URL without a specific entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Tokens keyed by base URL (or by profile name).
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub tokens: IndexMap<String, String>,
}

impl ConfigFile {
    /// Location of the config file: `$XDG_CONFIG_HOME/xbe/config.json`,
    /// falling back to the platform config directory.
    pub fn default_path(env: &dyn Env) -> Option<PathBuf> {
        let base = env
            .var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(dirs::config_dir)?;
        Some(base.join("xbe").join("config.json"))
    }

    /// Load a config file. A missing file is an empty config.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|e| XbeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            XbeError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Token stored for `key` (a base URL or a profile name).
    ///
    /// Base URL keys are compared without trailing slashes.
    pub fn token_for(&self, key: &str) -> Option<&str> {
        let wanted = normalize_base_url(key);
        self.tokens
            .iter()
            .find(|(k, _)| normalize_base_url(k) == wanted)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }
}

/// Resolved settings for one command invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API base URL without a trailing slash.
    pub base_url: String,
    /// Bearer token, `None` for unauthenticated requests.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Strip whitespace and trailing slashes from a base URL.
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// Pick the base URL: flag, then `XBE_BASE_URL`, then config file, then default.
pub fn resolve_base_url(flag: Option<&str>, env: &dyn Env, file: &ConfigFile) -> String {
    let chosen = flag
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| env.var(BASE_URL_ENV))
        .or_else(|| {
            file.base_url
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    normalize_base_url(&chosen)
}

/// Request timeout from `XBE_TIMEOUT_SECS`; invalid or zero values fall back
/// to the default.
pub fn resolve_timeout(env: &dyn Env) -> Duration {
    let secs = env
        .var(TIMEOUT_ENV)
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_base_url_precedence() {
        let file = ConfigFile {
            base_url: Some("https://file.example.com/".to_string()),
            ..Default::default()
        };
        let vars = env(&[(BASE_URL_ENV, "https://env.example.com")]);

        assert_eq!(
            resolve_base_url(Some("https://flag.example.com/"), &vars, &file),
            "https://flag.example.com"
        );
        assert_eq!(
            resolve_base_url(None, &vars, &file),
            "https://env.example.com"
        );
        assert_eq!(
            resolve_base_url(Some("  "), &env(&[]), &file),
            "https://file.example.com"
        );
        assert_eq!(
            resolve_base_url(None, &env(&[]), &ConfigFile::default()),
            DEFAULT_BASE_URL
        );
    }

    #[test]
    fn test_timeout_from_env() {
        assert_eq!(resolve_timeout(&env(&[])), Duration::from_secs(60));
        assert_eq!(
            resolve_timeout(&env(&[(TIMEOUT_ENV, "5")])),
            Duration::from_secs(5)
        );
        assert_eq!(
            resolve_timeout(&env(&[(TIMEOUT_ENV, "0")])),
            Duration::from_secs(60)
        );
        assert_eq!(
            resolve_timeout(&env(&[(TIMEOUT_ENV, "soon")])),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn test_default_path_honors_xdg() {
        let vars = env(&[("XDG_CONFIG_HOME", "/tmp/cfg")]);
        assert_eq!(
            ConfigFile::default_path(&vars),
            Some(PathBuf::from("/tmp/cfg/xbe/config.json"))
        );
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigFile::load(dir.path().join("config.json")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_and_token_lookup() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"base_url": "https://app.x-b-e.com", "tokens": {{"https://app.x-b-e.com/": "abc"}}}}"#
        )
        .unwrap();

        let config = ConfigFile::load(file.path()).unwrap();
        assert_eq!(config.token_for("https://app.x-b-e.com"), Some("abc"));
        assert_eq!(config.token_for("https://staging.x-b-e.com"), None);
    }

    #[test]
    fn test_load_invalid_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = ConfigFile::load(file.path()).unwrap_err();
        assert!(matches!(err, XbeError::Config(_)));
    }
}
