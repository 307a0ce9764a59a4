//! Settings for the FinPilot MCP server
//!
//! Values come from `FINPILOT_*` environment variables (a `.env` file is
//! honored). Only the gateway URL and environment tag may be overridden from
//! the command line; secrets are read from the environment only.

use crate::error::FinPilotError;
use crate::Result;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_GATEWAY_URL: &str = "https://api.finpilot.ai";
pub const LOCAL_API_GATEWAY_URL: &str = "http://localhost:8000";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

pub const ENV_API_GATEWAY_URL: &str = "FINPILOT_API_GATEWAY_URL";
pub const ENV_LOCAL_GATEWAY_URL: &str = "FINPILOT_LOCAL_GATEWAY_URL";
pub const ENV_API_KEY: &str = "FINPILOT_API_KEY";
pub const ENV_JWT_TOKEN: &str = "FINPILOT_JWT_TOKEN";
pub const ENV_ENVIRONMENT: &str = "FINPILOT_ENVIRONMENT";
pub const ENV_REQUEST_TIMEOUT: &str = "FINPILOT_REQUEST_TIMEOUT";
pub const ENV_UPLOAD_TIMEOUT: &str = "FINPILOT_UPLOAD_TIMEOUT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Environment {
    #[default]
    Production,
    Staging,
    Development,
}

impl FromStr for Environment {
    type Err = FinPilotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" => Ok(Environment::Development),
            other => Err(FinPilotError::ConfigError(format!(
                "unknown environment '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Development => "development",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, PartialEq)]
pub struct Settings {
    pub api_gateway_url: String,
    pub api_key: Option<String>,
    pub jwt_token: Option<String>,
    pub environment: Environment,
    pub request_timeout: Duration,
    pub upload_timeout: Duration,
    /// Gateway address used instead of `api_gateway_url` in development.
    pub local_gateway_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_gateway_url: DEFAULT_API_GATEWAY_URL.to_string(),
            api_key: None,
            jwt_token: None,
            environment: Environment::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
            local_gateway_url: None,
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_gateway_url", &self.api_gateway_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("jwt_token", &self.jwt_token.as_ref().map(|_| "<redacted>"))
            .field("environment", &self.environment)
            .field("request_timeout", &self.request_timeout)
            .field("upload_timeout", &self.upload_timeout)
            .field("local_gateway_url", &self.local_gateway_url)
            .finish()
    }
}

impl Settings {
    /// Load settings from the process environment (and `.env`, if present).
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// Empty values count as unset. Malformed values are logged and replaced
    /// by their defaults; this never fails.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Settings::default();

        let environment = match get(ENV_ENVIRONMENT) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!(value = %raw, error = %e, "Ignoring {}", ENV_ENVIRONMENT);
                defaults.environment
            }),
            None => defaults.environment,
        };

        Self {
            api_gateway_url: get(ENV_API_GATEWAY_URL).unwrap_or(defaults.api_gateway_url),
            api_key: get(ENV_API_KEY),
            jwt_token: get(ENV_JWT_TOKEN),
            environment,
            request_timeout: parse_timeout(ENV_REQUEST_TIMEOUT, get(ENV_REQUEST_TIMEOUT))
                .unwrap_or(defaults.request_timeout),
            upload_timeout: parse_timeout(ENV_UPLOAD_TIMEOUT, get(ENV_UPLOAD_TIMEOUT))
                .unwrap_or(defaults.upload_timeout),
            local_gateway_url: get(ENV_LOCAL_GATEWAY_URL),
        }
    }

    /// Apply the non-secret command line overrides.
    ///
    /// Must run before the gateway client is built.
    pub fn apply_overrides(&mut self, api_gateway_url: Option<String>, environment: Option<Environment>) {
        if let Some(url) = api_gateway_url.filter(|u| !u.trim().is_empty()) {
            self.api_gateway_url = url;
        }
        if let Some(environment) = environment {
            self.environment = environment;
        }
    }

    pub fn is_local_dev(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Base URL every request is issued against.
    pub fn effective_gateway_url(&self) -> String {
        let url = if self.is_local_dev() {
            self.local_gateway_url
                .as_deref()
                .unwrap_or(LOCAL_API_GATEWAY_URL)
        } else {
            self.api_gateway_url.as_str()
        };
        url.trim_end_matches('/').to_string()
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() || self.jwt_token.is_some()
    }

    pub fn require_credentials(&self) -> Result<()> {
        if self.has_credentials() {
            Ok(())
        } else {
            Err(FinPilotError::ConfigError(format!(
                "No authentication configured. Set {} or {} environment variable.",
                ENV_API_KEY, ENV_JWT_TOKEN
            )))
        }
    }
}

fn parse_timeout(key: &str, raw: Option<String>) -> Option<Duration> {
    let raw = raw?;
    match raw.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => Some(Duration::from_secs_f64(secs)),
        _ => {
            warn!(value = %raw, "Ignoring {}: expected a positive number of seconds", key);
            None
        }
    }
}
