//! Client configuration: which vendor environment to talk to and where it lives.
//!
//! Base URLs are resolved once, when the configuration is built, and then
//! passed into `ZapSignClient`. Nothing reads the process environment later.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_PRODUCTION_BASE_URL: &str = "https://api.zapsign.com.br";
pub const DEFAULT_SANDBOX_BASE_URL: &str = "https://sandbox.api.zapsign.com.br";

pub const PRODUCTION_BASE_URL_ENV: &str = "ZAPSIGN_API_BASE_URL";
pub const SANDBOX_BASE_URL_ENV: &str = "ZAPSIGN_API_BASE_URL_SANDBOX";

const DEFAULT_USER_AGENT: &str = concat!("zapsign-core/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown environment '{0}', expected 'sandbox' or 'production'")]
    UnknownEnvironment(String),

    #[error("base URL must be an absolute http(s) URL, got '{0}'")]
    InvalidBaseUrl(String),
}

/// Vendor environment selected by the stored credential.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "sandbox" => Ok(Environment::Sandbox),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Sandbox => write!(f, "sandbox"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub environment: Environment,
    pub production_base_url: String,
    pub sandbox_base_url: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            production_base_url: DEFAULT_PRODUCTION_BASE_URL.to_string(),
            sandbox_base_url: DEFAULT_SANDBOX_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }

    /// Defaults overridden by `ZAPSIGN_API_BASE_URL` and
    /// `ZAPSIGN_API_BASE_URL_SANDBOX` when they are set and non-empty.
    pub fn from_env(environment: Environment) -> Result<Self, ConfigError> {
        Self::from_lookup(environment, |key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(environment: Environment, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(environment);
        if let Some(url) = lookup(PRODUCTION_BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.production_base_url = validate_base_url(&url)?;
        }
        if let Some(url) = lookup(SANDBOX_BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.sandbox_base_url = validate_base_url(&url)?;
        }
        Ok(config)
    }

    /// Point both environments at one URL, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        let url = validate_base_url(base_url)?;
        self.production_base_url = url.clone();
        self.sandbox_base_url = url;
        Ok(self)
    }

    /// Base URL for the selected environment, without a trailing slash.
    pub fn base_url(&self) -> &str {
        let url = match self.environment {
            Environment::Production => &self.production_base_url,
            Environment::Sandbox => &self.sandbox_base_url,
        };
        url.trim_end_matches('/')
    }
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    match url::Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
            Ok(trimmed.trim_end_matches('/').to_string())
        }
        _ => Err(ConfigError::InvalidBaseUrl(trimmed.to_string())),
    }
}

/// API credential handed to the transport. The token never appears in
/// `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    pub api_token: String,
    pub environment: Environment,
}

impl Credentials {
    pub fn new(api_token: impl Into<String>, environment: Environment) -> Self {
        Self {
            api_token: api_token.into(),
            environment,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &mask_token(&self.api_token))
            .field("environment", &self.environment)
            .finish()
    }
}

pub(crate) fn mask_token(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}
