// src/services/relay.rs
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::message::WebhookRequest;

/// Environment key holding the automation webhook URL.
pub const WEBHOOK_URL_KEY: &str = "N8N_WEBHOOK_URL";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const OUTPUT_FIELD: &str = "output";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("the webhook URL is not configured; set `{key}` to enable replies")]
    ConfigurationMissing { key: &'static str },

    #[error("webhook connection error: {}", describe_transport(.0))]
    Transport(#[source] reqwest::Error),

    #[error("could not decode the webhook JSON response: {0}")]
    MalformedResponse(String),

    #[error("the webhook response did not contain the '{field}' key")]
    ContractViolation { field: &'static str },
}

// The URL is stripped: it is a secret and ends up in user-facing messages.
impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

/// Render a transport error together with its cause chain.
fn describe_transport(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut cause = std::error::Error::source(err);
    while let Some(inner) = cause {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        cause = std::error::Error::source(inner);
    }
    text
}

/// Where the relay finds its endpoint.
#[derive(Debug, Clone)]
pub enum EndpointSource {
    /// Read the named environment variable on every call.
    Env(&'static str),
    Fixed(Option<String>),
}

impl EndpointSource {
    pub fn fixed(url: impl Into<String>) -> Self {
        Self::Fixed(Some(url.into()))
    }

    pub fn resolve(&self) -> Option<String> {
        let url = match self {
            Self::Env(key) => std::env::var(key).ok(),
            Self::Fixed(url) => url.clone(),
        };
        url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Env(key) => key,
            Self::Fixed(_) => WEBHOOK_URL_KEY,
        }
    }
}

impl Default for EndpointSource {
    fn default() -> Self {
        Self::Env(WEBHOOK_URL_KEY)
    }
}

pub fn build_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Debug, Clone)]
pub struct WebhookRelay {
    client: Client,
    endpoint: EndpointSource,
    timeout: Duration,
}

impl WebhookRelay {
    pub fn new(client: Client, endpoint: EndpointSource, timeout: Duration) -> Self {
        Self {
            client,
            endpoint,
            timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.resolve().is_some()
    }

    /// Forward one user utterance to the webhook and return its `output` text.
    ///
    /// Performs at most one outbound request and never retries.
    pub async fn relay(&self, user_text: &str, session_id: &str) -> Result<String, RelayError> {
        let url = self
            .endpoint
            .resolve()
            .ok_or(RelayError::ConfigurationMissing {
                key: self.endpoint.key(),
            })?;

        let payload = WebhookRequest {
            message: user_text,
            session_id,
        };

        // `.json()` sets Content-Type: application/json.
        let response = self
            .client
            .post(&url)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        extract_output(&body)
    }
}

fn extract_output(body: &str) -> Result<String, RelayError> {
    let data: Value =
        serde_json::from_str(body).map_err(|e| RelayError::MalformedResponse(e.to_string()))?;

    match data.get(OUTPUT_FIELD) {
        Some(Value::String(text)) => Ok(text.clone()),
        None | Some(Value::Null) => Err(RelayError::ContractViolation {
            field: OUTPUT_FIELD,
        }),
        Some(other) => Ok(other.to_string()),
    }
}
