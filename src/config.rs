//! Runtime configuration read from the environment.
//!
//! The binary loads an optional `.env` file first; library code only ever
//! sees the resulting [`AppConfig`].

use std::time::Duration;
use thiserror::Error;

pub const GEOCODER_API_KEY_VAR: &str = "YANDEX_GEOCODER_API_KEY";
pub const GEOCODER_URL_VAR: &str = "FOODCART_GEOCODER_URL";
pub const GEOCODER_TIMEOUT_VAR: &str = "FOODCART_GEOCODER_TIMEOUT_SECS";
pub const ACTOR_BUFFER_VAR: &str = "FOODCART_ACTOR_BUFFER";

pub const DEFAULT_GEOCODER_URL: &str = "https://geocode-maps.yandex.ru/1.x";
pub const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_ACTOR_BUFFER: usize = 32;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} is invalid: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Settings for the HTTP geocoder.
#[derive(Clone, PartialEq)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for GeocoderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocoderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"REDACTED")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub geocoder: GeocoderConfig,
    /// Channel capacity of every resource actor.
    pub actor_buffer: usize,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name).and_then(|v| {
                let trimmed = v.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
        };

        let api_key = var(GEOCODER_API_KEY_VAR).ok_or(ConfigError::Missing(GEOCODER_API_KEY_VAR))?;
        let base_url = var(GEOCODER_URL_VAR).unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: GEOCODER_URL_VAR,
                message: format!("expected an http(s) URL, got {base_url:?}"),
            });
        }

        let timeout_secs = parse_number(GEOCODER_TIMEOUT_VAR, var(GEOCODER_TIMEOUT_VAR))?
            .unwrap_or(DEFAULT_GEOCODER_TIMEOUT_SECS);
        let actor_buffer =
            parse_number(ACTOR_BUFFER_VAR, var(ACTOR_BUFFER_VAR))?.unwrap_or(DEFAULT_ACTOR_BUFFER);
        if timeout_secs == 0 {
            return Err(zero(GEOCODER_TIMEOUT_VAR));
        }
        if actor_buffer == 0 {
            return Err(zero(ACTOR_BUFFER_VAR));
        }

        Ok(Self {
            geocoder: GeocoderConfig {
                base_url,
                api_key,
                timeout: Duration::from_secs(timeout_secs),
            },
            actor_buffer,
        })
    }
}

fn parse_number<N>(name: &'static str, value: Option<String>) -> Result<Option<N>, ConfigError>
where
    N: std::str::FromStr,
    N::Err: std::fmt::Display,
{
    let Some(v) = value else {
        return Ok(None);
    };
    v.parse::<N>().map(Some).map_err(|e| ConfigError::Invalid {
        name,
        message: e.to_string(),
    })
}

fn zero(name: &'static str) -> ConfigError {
    ConfigError::Invalid {
        name,
        message: "must be greater than zero".into(),
    }
}
