// src/config.rs
use std::{net::SocketAddr, path::PathBuf, time::Duration};

use thiserror::Error;

use crate::services::relay::{DEFAULT_TIMEOUT, WEBHOOK_URL_KEY};

pub const DEFAULT_ANIMATION_URL: &str =
    "https://assets4.lottiefiles.com/packages/lf20_touohxv0.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Startup settings. The webhook URL is not part of this: the relay reads it
/// per call.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub session_ttl: Duration,
    pub webhook_timeout: Duration,
    pub animation_url: Option<String>,
    pub public_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            session_ttl: Duration::from_secs(4 * 60 * 60),
            webhook_timeout: DEFAULT_TIMEOUT,
            animation_url: Some(DEFAULT_ANIMATION_URL.to_string()),
            public_dir: PathBuf::from("public"),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup("IAI_BIND_ADDR") {
            settings.bind_addr = raw.trim().parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    key: "IAI_BIND_ADDR",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(raw) = lookup("IAI_SESSION_TTL_SECS") {
            settings.session_ttl = parse_secs("IAI_SESSION_TTL_SECS", &raw)?;
        }
        if let Some(raw) = lookup("IAI_WEBHOOK_TIMEOUT_SECS") {
            settings.webhook_timeout = parse_secs("IAI_WEBHOOK_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = lookup("IAI_ANIMATION_URL") {
            let raw = raw.trim();
            settings.animation_url = (!raw.is_empty()).then(|| raw.to_string());
        }
        if let Some(raw) = lookup("IAI_PUBLIC_DIR") {
            settings.public_dir = PathBuf::from(raw.trim());
        }

        if lookup(WEBHOOK_URL_KEY).is_none_or(|url| url.trim().is_empty()) {
            tracing::warn!("{WEBHOOK_URL_KEY} is not set; chat replies are disabled until it is");
        }

        Ok(settings)
    }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}
