//! Token resolution.
//!
//! Token *storage* lives outside this crate; here we only look tokens up in
//! the places an external login flow may have left them: environment
//! variables and the config file.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigFile, Env, ProcessEnv};

/// Environment variables checked for a token, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["XBE_TOKEN", "XBE_API_TOKEN"];

/// Token lookup failure.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token is configured for the requested API.
    #[error("no API token found")]
    NotFound,

    /// The token store could not be read.
    #[error("{0}")]
    Config(String),
}

/// Where a resolved token came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// Named environment variable.
    Environment(&'static str),
    /// Config file entry.
    ConfigFile(PathBuf),
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Environment(var) => write!(f, "env:{}", var),
            TokenSource::ConfigFile(path) => write!(f, "file:{}", path.display()),
        }
    }
}

/// A token together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub token: String,
    pub source: TokenSource,
}

/// Looks up the API token for a base URL.
pub trait TokenResolver {
    /// Resolve a token for `base_url`. A non-empty `hint` names a profile
    /// entry that takes priority over the base URL entry.
    fn resolve(&self, base_url: &str, hint: &str) -> Result<ResolvedToken, AuthError>;
}

/// Environment variables first, then the config file.
pub struct DefaultTokenResolver<E: Env = ProcessEnv> {
    env: E,
    config_path: Option<PathBuf>,
}

impl DefaultTokenResolver<ProcessEnv> {
    /// Resolver over the process environment and the default config path.
    pub fn new() -> Self {
        let config_path = ConfigFile::default_path(&ProcessEnv);
        Self {
            env: ProcessEnv,
            config_path,
        }
    }
}

impl Default for DefaultTokenResolver<ProcessEnv> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Env> DefaultTokenResolver<E> {
    /// Resolver over a custom environment and config path.
    pub fn with_env(env: E, config_path: Option<PathBuf>) -> Self {
        Self { env, config_path }
    }
}

impl<E: Env> TokenResolver for DefaultTokenResolver<E> {
    fn resolve(&self, base_url: &str, hint: &str) -> Result<ResolvedToken, AuthError> {
        for var in TOKEN_ENV_VARS {
            if let Some(token) = self.env.var(var) {
                debug!(source = var, "using token from environment");
                return Ok(ResolvedToken {
                    token,
                    source: TokenSource::Environment(var),
                });
            }
        }

        let Some(path) = &self.config_path else {
            return Err(AuthError::NotFound);
        };

        let file = ConfigFile::load(path).map_err(|e| AuthError::Config(e.to_string()))?;

        let hint = hint.trim();
        let token = (!hint.is_empty())
            .then(|| file.token_for(hint))
            .flatten()
            .or_else(|| file.token_for(base_url))
            .or_else(|| file.token.as_deref().filter(|t| !t.trim().is_empty()));

        match token {
            Some(token) => {
                debug!(path = %path.display(), "using token from config file");
                Ok(ResolvedToken {
                    token: token.trim().to_string(),
                    source: TokenSource::ConfigFile(path.clone()),
                })
            }
            None => Err(AuthError::NotFound),
        }
    }
}

/// Decide which token a command sends.
///
/// `--no-auth` wins, then an explicit `--token`, then the resolver. A resolver
/// "not found" becomes [`XbeError::AuthRequired`](crate::XbeError::AuthRequired).
pub fn resolve_token(
    flag_token: Option<&str>,
    no_auth: bool,
    base_url: &str,
    resolver: &dyn TokenResolver,
) -> crate::Result<Option<String>> {
    if no_auth {
        return Ok(None);
    }
    if let Some(token) = flag_token.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(Some(token.to_string()));
    }
    let resolved = resolver.resolve(base_url, "")?;
    Ok(Some(resolved.token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XbeError;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_token_wins_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"token": "from-file"}}"#).unwrap();

        let resolver = DefaultTokenResolver::with_env(
            env(&[("XBE_API_TOKEN", "from-env")]),
            Some(file.path().to_path_buf()),
        );
        let resolved = resolver.resolve("https://app.x-b-e.com", "").unwrap();
        assert_eq!(resolved.token, "from-env");
        assert_eq!(resolved.source, TokenSource::Environment("XBE_API_TOKEN"));
    }

    #[test]
    fn test_file_prefers_base_url_entry_then_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"token": "fallback", "tokens": {{"https://staging.x-b-e.com": "staging", "ops": "profile"}}}}"#
        )
        .unwrap();
        let resolver = DefaultTokenResolver::with_env(env(&[]), Some(file.path().to_path_buf()));

        assert_eq!(
            resolver.resolve("https://staging.x-b-e.com/", "").unwrap().token,
            "staging"
        );
        assert_eq!(
            resolver.resolve("https://app.x-b-e.com", "").unwrap().token,
            "fallback"
        );
        assert_eq!(
            resolver.resolve("https://app.x-b-e.com", "ops").unwrap().token,
            "profile"
        );
    }

    #[test]
    fn test_missing_everything_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let resolver =
            DefaultTokenResolver::with_env(env(&[]), Some(dir.path().join("config.json")));
        assert!(matches!(
            resolver.resolve("https://app.x-b-e.com", ""),
            Err(AuthError::NotFound)
        ));
    }

    #[test]
    fn test_resolve_token_precedence() {
        let resolver = DefaultTokenResolver::with_env(env(&[("XBE_TOKEN", "env")]), None);

        assert_eq!(
            resolve_token(Some("flag"), true, "https://x", &resolver).unwrap(),
            None
        );
        assert_eq!(
            resolve_token(Some(" flag "), false, "https://x", &resolver).unwrap(),
            Some("flag".to_string())
        );
        assert_eq!(
            resolve_token(None, false, "https://x", &resolver).unwrap(),
            Some("env".to_string())
        );

        let empty = DefaultTokenResolver::with_env(env(&[]), None);
        let err = resolve_token(Some(""), false, "https://x", &empty).unwrap_err();
        assert!(matches!(err, XbeError::AuthRequired));
    }
}
