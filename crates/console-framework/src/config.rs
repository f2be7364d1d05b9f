//! # Console Configuration
//!
//! Settings are read once at startup, either from defaults or from `CONSOLE_*`
//! environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `CONSOLE_API_URL` | `http://localhost:3000` |
//! | `CONSOLE_BASE_PATH` | *(empty)* |
//! | `CONSOLE_LOGIN_PATH` | `/login` |
//! | `CONSOLE_PAGE_SIZE` | `10` |
//! | `CONSOLE_CANDIDATE_LIMIT` | `1000` |
//! | `CONSOLE_REQUEST_TIMEOUT_SECS` | `30` |

use crate::error::ConfigError;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Root of the REST API, without a trailing slash.
    pub api_base_url: String,
    /// Prefix the console is mounted under (e.g. `/admin`), without a trailing slash.
    pub base_path: String,
    /// Path of the login view relative to `base_path`.
    pub login_path: String,
    /// Rows per page on every browsing screen.
    pub page_size: u32,
    /// Upper bound on candidates a relation selector loads.
    pub candidate_limit: u32,
    pub request_timeout_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            base_path: String::new(),
            login_path: "/login".to_string(),
            page_size: 10,
            candidate_limit: 1000,
            request_timeout_secs: 30,
        }
    }
}

impl ConsoleConfig {
    /// Builds a configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup("CONSOLE_API_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = lookup("CONSOLE_BASE_PATH") {
            config.base_path = normalize_prefix(&path);
        }
        if let Some(path) = lookup("CONSOLE_LOGIN_PATH") {
            config.login_path = format!("/{}", path.trim_matches('/'));
        }
        if let Some(v) = lookup("CONSOLE_PAGE_SIZE") {
            config.page_size = parse_positive("CONSOLE_PAGE_SIZE", &v)?;
        }
        if let Some(v) = lookup("CONSOLE_CANDIDATE_LIMIT") {
            config.candidate_limit = parse_positive("CONSOLE_CANDIDATE_LIMIT", &v)?;
        }
        if let Some(v) = lookup("CONSOLE_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = parse_positive("CONSOLE_REQUEST_TIMEOUT_SECS", &v)?;
        }
        Ok(config)
    }

    /// Absolute path of the login view, including the base path prefix.
    pub fn login_route(&self) -> String {
        format!("{}{}", self.base_path, self.login_path)
    }

    /// Absolute path of the landing view.
    pub fn home_route(&self) -> String {
        if self.base_path.is_empty() {
            "/".to_string()
        } else {
            self.base_path.clone()
        }
    }
}

fn normalize_prefix(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn parse_positive<N>(key: &str, value: &str) -> Result<N, ConfigError>
where
    N: FromStr + PartialOrd + Default,
{
    match value.trim().parse::<N>() {
        Ok(n) if n > N::default() => Ok(n),
        _ => Err(ConfigError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
