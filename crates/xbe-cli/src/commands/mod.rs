//! CLI command implementations.

pub mod mutate;
pub mod summarize;
pub mod view;

use clap::{ArgMatches, FromArgMatches};
use once_cell::unsync::OnceCell;
use serde_json::Value;
use tracing::debug;
use xbe::api::{ApiClient, ApiResponse, HttpClient, Query};
use xbe::config::{ConfigFile, ProcessEnv, resolve_base_url, resolve_timeout};
use xbe::{ClientConfig, DefaultTokenResolver, Result, XbeError, resolve_token};

use crate::cli::ConnectionArgs;

/// Dispatch a parsed command line.
pub fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("view", m)) => view::run(m),
        Some(("do", m)) => mutate::run(m),
        Some(("summarize", m)) => summarize::run(m),
        Some((other, _)) => Err(XbeError::validation(format!("unknown command {}", other))),
        None => Err(XbeError::validation("a command is required")),
    }
}

/// Extract a derived argument group from matches.
pub(crate) fn parse_args<T: FromArgMatches>(matches: &ArgMatches) -> Result<T> {
    T::from_arg_matches(matches).map_err(|e| XbeError::validation(e.to_string()))
}

/// The next `(name, matches)` level, or an error naming what is missing.
pub(crate) fn subcommand<'a>(matches: &'a ArgMatches, what: &str) -> Result<(&'a str, &'a ArgMatches)> {
    matches
        .subcommand()
        .ok_or_else(|| XbeError::validation(format!("{} is required", what)))
}

/// Build the HTTP client: base URL, token and timeout.
fn connect(args: &ConnectionArgs) -> Result<HttpClient> {
    let env = ProcessEnv;
    let file = match ConfigFile::default_path(&env) {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let base_url = resolve_base_url(args.base_url.as_deref(), &env, &file);
    let token = resolve_token(
        args.token.as_deref(),
        args.no_auth,
        &base_url,
        &DefaultTokenResolver::new(),
    )?;
    debug!(base_url = %base_url, authenticated = token.is_some(), "connecting");

    HttpClient::new(&ClientConfig {
        base_url,
        token,
        timeout: resolve_timeout(&env),
    })
}

/// Client that resolves configuration and credentials on its first request.
///
/// Operations validate their flags before sending anything, so a command
/// with bad flags fails on validation even when no token is configured.
pub struct LazyClient {
    args: ConnectionArgs,
    client: OnceCell<HttpClient>,
}

impl LazyClient {
    pub fn new(args: ConnectionArgs) -> Self {
        Self {
            args,
            client: OnceCell::new(),
        }
    }

    fn client(&self) -> Result<&HttpClient> {
        self.client.get_or_try_init(|| connect(&self.args))
    }
}

impl ApiClient for LazyClient {
    fn get(&self, path: &str, query: &Query) -> Result<ApiResponse> {
        self.client()?.get(path, query)
    }

    fn post_with_query(&self, path: &str, query: &Query, body: &Value) -> Result<ApiResponse> {
        self.client()?.post_with_query(path, query, body)
    }

    fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.client()?.patch(path, body)
    }

    fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.client()?.delete(path)
    }
}
