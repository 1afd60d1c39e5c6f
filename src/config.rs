use anyhow::{Context, Result};
use log::warn;
use url::Url;

pub const ENV_APP_TITLE: &str = "INKSTAND_APP_TITLE";
pub const ENV_APP_VERSION: &str = "INKSTAND_APP_VERSION";
pub const ENV_API_BASE_URL: &str = "INKSTAND_API_BASE_URL";
pub const ENV_DEV_MODE: &str = "INKSTAND_DEV_MODE";

pub const DEFAULT_APP_TITLE: &str = "Inkstand Admin";
pub const DEFAULT_APP_VERSION: &str = "1.0.0";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";

/// Application settings resolved from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub version: String,
    /// Root of the REST backend, e.g. `http://localhost:3001`
    pub api_base_url: Url,
    pub dev_mode: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Unset or blank
    /// values fall back to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            match lookup(key).filter(|value| !value.trim().is_empty()) {
                Some(value) => value,
                None => {
                    warn!("{} is not set, using default: {}", key, default);
                    default.to_string()
                }
            }
        };

        let raw_url = get(ENV_API_BASE_URL, DEFAULT_API_BASE_URL);
        let api_base_url = Url::parse(&raw_url)
            .with_context(|| format!("{} is not a valid URL: {}", ENV_API_BASE_URL, raw_url))?;

        let dev_mode = match lookup(ENV_DEV_MODE) {
            Some(value) => parse_flag(&value),
            None => cfg!(debug_assertions),
        };

        Ok(Self {
            title: get(ENV_APP_TITLE, DEFAULT_APP_TITLE),
            version: get(ENV_APP_VERSION, DEFAULT_APP_VERSION),
            api_base_url,
            dev_mode,
        })
    }

    pub fn is_prod(&self) -> bool {
        !self.dev_mode
    }
}

/// `true` and `1` are truthy; everything else is false
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}
