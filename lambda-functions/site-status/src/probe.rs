use std::future::Future;

use reqwest::{Client, StatusCode};
use tracing::{info, warn};

/// Classified result of a single GET against a site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Status line of a 200 response, e.g. `200 OK`.
    Ok(String),
    /// Status line of any other response, or the transport failure.
    Error(String),
}

impl ProbeOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

pub trait Prober {
    /// Issues exactly one request for `url`. Never fails: non-200 responses
    /// and transport errors are folded into [`ProbeOutcome::Error`].
    fn probe(&self, url: &str) -> impl Future<Output = ProbeOutcome> + Send;
}

/// Probes sites over HTTP using a default `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        match self.client.get(url).send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                info!(url, status = %response.status(), "Site is up");
                ProbeOutcome::Ok(response.status().to_string())
            }
            Ok(response) => {
                warn!(url, status = %response.status(), "Site returned a non-200 status");
                ProbeOutcome::Error(response.status().to_string())
            }
            Err(e) => {
                let reason = describe_transport_error(e);
                warn!(url, error = %reason, "Site request failed");
                ProbeOutcome::Error(reason)
            }
        }
    }
}

/// Renders the error together with its source chain.
fn describe_transport_error(error: reqwest::Error) -> String {
    format!("{:#}", anyhow::Error::from(error))
}
