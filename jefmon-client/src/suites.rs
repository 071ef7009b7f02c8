//! Summary endpoint

use crate::InstanceClient;
use crate::error::Result;
use jefmon_core::domain::summary::InstanceSummary;
use jefmon_core::dto::suites::SuitesJson;
use tracing::debug;

impl InstanceClient {
    /// Fetch the raw `suites/json` document
    ///
    /// # Returns
    /// The instance's name, root suite total and per-state counts as sent
    pub async fn fetch_suites(&self) -> Result<SuitesJson> {
        let url = self.suites_url();
        debug!("Fetching instance summary from {}", url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Fetch and decode the instance summary
    ///
    /// Every state name in the response must be a known job state, otherwise
    /// the whole response is rejected as a parse error.
    ///
    /// # Returns
    /// A summary tagged with this client's base URL
    pub async fn fetch_summary(&self) -> Result<InstanceSummary> {
        let suites = self.fetch_suites().await?;
        Ok(suites.into_summary(self.base_url.clone())?)
    }
}
