//! JEF Monitor HTTP Client
//!
//! A small, type-safe HTTP client for reading the summary another JEF
//! Monitor instance publishes on its `suites/json` endpoint.
//!
//! # Example
//!
//! ```no_run
//! use jefmon_client::InstanceClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = InstanceClient::new("http://prod-monitor:8080");
//!
//!     let summary = client.fetch_summary().await?;
//!     println!("{}: {} suites", summary.name(), summary.total_roots());
//!     Ok(())
//! }
//! ```

pub mod error;
mod suites;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use jefmon_core::dto::suites::SuitesJson;

use jefmon_core::dto::suites::SUITES_JSON_PATH;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for one remote monitor instance
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct InstanceClient {
    /// Base URL of the instance, without trailing slash
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl InstanceClient {
    /// Create a new instance client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the instance (e.g., "http://localhost:8080")
    ///
    /// # Example
    /// ```
    /// use jefmon_client::InstanceClient;
    ///
    /// let client = InstanceClient::new("http://localhost:8080/");
    /// assert_eq!(client.suites_url(), "http://localhost:8080/suites/json");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new instance client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    /// Pollers share one configured client across every instance.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the instance
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the instance's summary endpoint
    pub fn suites_url(&self) -> String {
        format!("{}/{}", self.base_url, SUITES_JSON_PATH)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize its JSON body
    ///
    /// Error statuses, empty bodies and undecodable bodies are reported as
    /// distinct [`ClientError`] variants.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ClientError::NoContent);
        }

        Ok(serde_json::from_slice(&body)?)
    }
}
