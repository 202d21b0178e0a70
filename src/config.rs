//! Runtime configuration.
//!
//! Each value resolves in priority order: explicit override, environment
//! variable, built-in default. The access token has no default.

use std::env;

use miette::Diagnostic;
use thiserror::Error;

pub const TOKEN_ENV: &str = "TICKTICK_ACCESS_TOKEN";
pub const API_URL_ENV: &str = "TICKTICK_API_URL";
pub const API_V2_URL_ENV: &str = "TICKTICK_API_V2_URL";

pub const DEFAULT_API_URL: &str = "https://api.ticktick.com/open/v1";
pub const DEFAULT_API_V2_URL: &str = "https://api.ticktick.com/api/v2";

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("No TickTick access token configured")]
    #[diagnostic(
        code(ticktick::config::missing_token),
        help("Set TICKTICK_ACCESS_TOKEN or pass --token.")
    )]
    MissingToken,
}

/// Connection settings for the TickTick API.
#[derive(Clone)]
pub struct Config {
    pub access_token: String,
    /// Primary versioned REST base.
    pub api_url: String,
    /// Secondary base, used only by the completed-tasks query.
    pub api_v2_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("api_v2_url", &self.api_v2_url)
            .finish()
    }
}

/// Optional explicit values, typically from command-line flags.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub access_token: Option<String>,
    pub api_url: Option<String>,
    pub api_v2_url: Option<String>,
}

impl Config {
    pub fn new(access_token: impl Into<String>, api_url: &str, api_v2_url: &str) -> Self {
        Self {
            access_token: access_token.into(),
            api_url: normalize_base(api_url),
            api_v2_url: normalize_base(api_v2_url),
        }
    }

    /// Resolve configuration from overrides and the process environment.
    pub fn resolve(overrides: Overrides) -> Result<Self, ConfigError> {
        let access_token = overrides
            .access_token
            .or_else(|| env::var(TOKEN_ENV).ok())
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let api_url = overrides
            .api_url
            .or_else(|| env::var(API_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let api_v2_url = overrides
            .api_v2_url
            .or_else(|| env::var(API_V2_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_API_V2_URL.to_string());

        Ok(Self::new(access_token.trim(), &api_url, &api_v2_url))
    }
}

fn normalize_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
