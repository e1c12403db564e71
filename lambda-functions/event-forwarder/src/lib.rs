use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, info};
use url::Url;

/// Environment variable holding the ingestion endpoint.
pub const ENDPOINT_VAR: &str = "FUNC_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error: missing url environment variable")]
    Missing,
    #[error("error: invalid ingestion url; see - {0}")]
    Invalid(#[from] url::ParseError),
}

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("error decoding the request payload; no event data sent")]
    Decode(#[source] serde_json::Error),
    #[error("error serializing the event payload; no event data sent")]
    Encode(#[source] serde_json::Error),
    #[error("error occurred logging the event. See: {0:#}")]
    Transport(anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwarderConfig {
    pub endpoint: Url,
}

impl ForwarderConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_value(std::env::var(ENDPOINT_VAR).ok())
    }

    pub fn from_value(value: Option<String>) -> Result<Self, ConfigError> {
        let raw = value.ok_or(ConfigError::Missing)?;
        let endpoint = Url::parse(&raw)?;
        Ok(Self { endpoint })
    }
}

/// Envelope posted to the ingestion endpoint.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Event {
    pub trigger: &'static str,
    pub event: &'static str,
    pub payload: Map<String, Value>,
}

impl Event {
    pub fn log(payload: Map<String, Value>) -> Self {
        Self {
            trigger: "fn",
            event: "log",
            payload,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Response {
    #[serde(rename = "Log")]
    pub log: Vec<String>,
}

impl Response {
    fn single(message: String) -> Self {
        Self { log: vec![message] }
    }
}

pub struct EventForwarderService {
    client: Client,
    endpoint: Url,
}

impl EventForwarderService {
    pub fn new(config: ForwarderConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint,
        }
    }

    /// Wraps the payload in an [`Event`] and posts it. Anything but a JSON
    /// object is a decode error and nothing is sent.
    pub async fn forward(&self, payload: Value) -> Response {
        let result = match serde_json::from_value(payload) {
            Ok(payload) => self.send_event(Event::log(payload)).await,
            Err(e) => {
                error!(error = %e, "Failed to decode request payload");
                Err(ForwardError::Decode(e))
            }
        };

        match result {
            Ok(status) => {
                info!("Event logged with status: {}", status);
                Response::single(format!("event logged with status: {}", status))
            }
            Err(e) => Response::single(e.to_string()),
        }
    }

    async fn send_event(&self, event: Event) -> Result<StatusCode, ForwardError> {
        let body = serde_json::to_vec(&event).map_err(|e| {
            error!("Failed to serialize event: {}", e);
            ForwardError::Encode(e)
        })?;
        let logged_body = String::from_utf8_lossy(&body).into_owned();

        match self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(response) => Ok(response.status()),
            Err(e) => {
                let e = anyhow::Error::from(e);
                error!(event = %logged_body, "Failed to log event: {:#}", e);
                Err(ForwardError::Transport(e))
            }
        }
    }
}
