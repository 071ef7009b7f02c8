//! Remote instance poller
//!
//! Turns one remote instance's `suites/json` response into an
//! [`InstanceSummary`]. Failures never escape: they are classified and
//! carried in the summary.

use async_trait::async_trait;
use jefmon_client::{ClientError, InstanceClient};
use jefmon_core::domain::summary::{InstanceSummary, RemoteError};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

/// Produces a summary for a remote instance
#[async_trait]
pub trait InstancePoller: Send + Sync {
    /// Polls the instance at `base_url`
    ///
    /// Always returns a summary; on failure it carries a [`RemoteError`]
    /// and a placeholder name.
    async fn poll(&self, base_url: &str) -> InstanceSummary;
}

/// HTTP implementation of [`InstancePoller`]
///
/// One connection pool is shared by every instance polled.
#[derive(Debug, Clone)]
pub struct HttpInstancePoller {
    client: Client,
}

impl HttpInstancePoller {
    /// Creates a poller whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Creates a poller over a preconfigured HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InstancePoller for HttpInstancePoller {
    async fn poll(&self, base_url: &str) -> InstanceSummary {
        let client = InstanceClient::with_client(base_url, self.client.clone());
        // Tag with the URL as registered, not the normalized base.
        let decoded = client
            .fetch_suites()
            .await
            .and_then(|suites| suites.into_summary(base_url).map_err(ClientError::from));
        decoded.unwrap_or_else(|err| InstanceSummary::failed(base_url, classify(base_url, err)))
    }
}

/// Maps a client failure onto the dashboard's error taxonomy
fn classify(base_url: &str, err: ClientError) -> RemoteError {
    match err {
        ClientError::NoContent => {
            debug!("Instance {} returned no content", base_url);
            RemoteError::no_content()
        }
        ClientError::ParseError(detail) => {
            debug!("Instance {} returned a bad response: {}", base_url, detail);
            RemoteError::bad_format(detail)
        }
        other => {
            error!("Could not fetch monitor instance {}: {}", base_url, other);
            RemoteError::fetch_failed(other.to_string())
        }
    }
}
