//! Aggregation service
//!
//! Builds the dashboard's instance list: this instance first, then every
//! registered remote instance in registry order.

use jefmon_core::domain::snapshot::SnapshotProvider;
use jefmon_core::domain::summary::{InstanceSummary, RemoteError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time;
use tracing::{debug, warn};

use crate::registry::InstanceRegistry;
use crate::service::poller::InstancePoller;

const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_CONCURRENT_POLLS: usize = 4;

/// Produces one [`InstanceSummary`] per monitored instance on demand
///
/// Remote polls run concurrently, capped by a semaphore shared by every
/// refresh, and each poll is bounded by the poll timeout. Dropping a
/// `refresh()` future cancels its in-flight polls.
pub struct AggregationService {
    registry: Arc<InstanceRegistry>,
    snapshots: Arc<dyn SnapshotProvider>,
    poller: Arc<dyn InstancePoller>,
    poll_timeout: Duration,
    semaphore: Arc<Semaphore>,
}

impl AggregationService {
    pub fn new(
        registry: Arc<InstanceRegistry>,
        snapshots: Arc<dyn SnapshotProvider>,
        poller: Arc<dyn InstancePoller>,
    ) -> Self {
        Self {
            registry,
            snapshots,
            poller,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            semaphore: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENT_POLLS)),
        }
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Caps how many remote polls may be in flight at once (minimum 1)
    pub fn with_max_concurrent_polls(mut self, max: usize) -> Self {
        self.semaphore = Arc::new(Semaphore::new(max.max(1)));
        self
    }

    /// Summary of this instance, read straight from the engine's snapshots
    pub fn local_summary(&self) -> InstanceSummary {
        InstanceSummary::local(self.registry.instance_name(), self.snapshots.as_ref())
    }

    /// Summaries of every instance: local first, then remotes in registry order
    ///
    /// Never fails; unreachable or misbehaving remotes are reported in
    /// their own summary.
    pub async fn refresh(&self) -> Vec<InstanceSummary> {
        let local = self.local_summary();
        let urls = self.registry.list();
        debug!("Refreshing local instance and {} remote(s)", urls.len());

        let mut summaries = Vec::with_capacity(urls.len() + 1);
        summaries.push(local);
        summaries.extend(self.poll_remotes(urls).await);
        summaries
    }

    async fn poll_remotes(&self, urls: Vec<String>) -> Vec<InstanceSummary> {
        if urls.is_empty() {
            return Vec::new();
        }

        // Tasks still running when the set is dropped are aborted.
        let mut tasks = JoinSet::new();
        for (index, url) in urls.iter().enumerate() {
            let poller = Arc::clone(&self.poller);
            let semaphore = Arc::clone(&self.semaphore);
            let timeout = self.poll_timeout;
            let url = url.clone();

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    let error = RemoteError::fetch_failed("poller shut down");
                    return (index, InstanceSummary::failed(url, error));
                };
                let outcome = time::timeout(timeout, poller.poll(&url)).await;
                let summary = match outcome {
                    Ok(summary) => summary,
                    Err(_) => {
                        warn!("Polling {} timed out after {:?}", url, timeout);
                        InstanceSummary::failed(
                            url,
                            RemoteError::fetch_failed(format!("timed out after {:?}", timeout)),
                        )
                    }
                };
                (index, summary)
            });
        }

        let mut results: Vec<Option<InstanceSummary>> = vec![None; urls.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, summary)) => results[index] = Some(summary),
                Err(e) => warn!("Remote poll task failed: {}", e),
            }
        }

        urls.into_iter()
            .zip(results)
            .map(|(url, summary)| {
                summary.unwrap_or_else(|| {
                    let error = RemoteError::fetch_failed("poll task did not complete");
                    InstanceSummary::failed(url, error)
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{MonitorSettings, SettingsError, SettingsStore};
    use async_trait::async_trait;
    use jefmon_core::domain::snapshot::{SnapshotStore, SuiteSnapshot};
    use jefmon_core::domain::state::JobState;
    use jefmon_core::domain::status::JobStatus;
    use jefmon_core::domain::summary::{RemoteErrorKind, StatusCounts};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullStore;

    impl SettingsStore for NullStore {
        fn load(&self) -> Result<MonitorSettings, SettingsError> {
            Ok(MonitorSettings::default())
        }

        fn save(&self, _settings: &MonitorSettings) -> Result<(), SettingsError> {
            Ok(())
        }
    }

    /// Poller answering from the URL: `slow` sleeps, `panic` panics,
    /// `down` fails, anything else reports one running suite
    #[derive(Default)]
    struct ScriptedPoller {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        dropped: Arc<AtomicUsize>,
    }

    struct DropCounter(Arc<AtomicUsize>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl InstancePoller for ScriptedPoller {
        async fn poll(&self, base_url: &str) -> InstanceSummary {
            let _guard = DropCounter(Arc::clone(&self.dropped));
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            time::sleep(Duration::from_millis(20)).await;
            if base_url.contains("slow") {
                time::sleep(Duration::from_secs(30)).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if base_url.contains("panic") {
                panic!("poller bug");
            }
            if base_url.contains("down") {
                let error = RemoteError::fetch_failed("connection refused");
                return InstanceSummary::failed(base_url, error);
            }
            let mut counts = StatusCounts::new();
            counts.increment(JobState::Running);
            InstanceSummary::remote(base_url, format!("name of {base_url}"), 1, counts)
        }
    }

    fn service(urls: &[&str], poller: Arc<ScriptedPoller>) -> AggregationService {
        let registry = Arc::new(InstanceRegistry::new(
            Arc::new(NullStore),
            MonitorSettings {
                instance_name: "local".to_string(),
                remote_instance_urls: urls.iter().map(|u| u.to_string()).collect(),
                ..MonitorSettings::default()
            },
        ));
        let snapshots = Arc::new(SnapshotStore::new());
        snapshots.publish(SuiteSnapshot::new("s1", JobStatus::new("r1", JobState::Completed)));
        snapshots.publish(SuiteSnapshot::new("s2", JobStatus::new("r2", JobState::Running)));
        AggregationService::new(registry, snapshots, poller)
    }

    #[tokio::test]
    async fn test_refresh_without_remotes_returns_local_only() {
        let summaries = service(&[], Arc::default()).refresh().await;
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].is_local());
        assert_eq!(summaries[0].name(), "local");
        assert_eq!(summaries[0].total_roots(), 2);
        assert_eq!(summaries[0].counts().get(JobState::Completed), 1);
    }

    #[tokio::test]
    async fn test_refresh_keeps_registry_order() {
        let urls = ["http://c", "http://a", "http://b", "http://d", "http://e", "http://f"];
        let summaries = service(&urls, Arc::default()).refresh().await;

        let seen: Vec<Option<&str>> = summaries.iter().map(InstanceSummary::url).collect();
        let mut expected = vec![None];
        expected.extend(urls.iter().map(|u| Some(*u)));
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let urls = ["http://ok-1", "http://down", "http://panic", "http://ok-2"];
        let summaries = service(&urls, Arc::default()).refresh().await;

        assert_eq!(summaries.len(), 5);
        assert!(!summaries[0].has_error());
        assert_eq!(summaries[1].name(), "name of http://ok-1");
        assert_eq!(
            summaries[2].remote_error().map(|e| e.kind),
            Some(RemoteErrorKind::FetchFailed)
        );
        assert_eq!(summaries[3].url(), Some("http://panic"));
        assert!(summaries[3].has_error());
        assert_eq!(summaries[4].counts().get(JobState::Running), 1);
    }

    #[tokio::test]
    async fn test_slow_remote_times_out() {
        let urls = ["http://slow", "http://fast"];
        let service = service(&urls, Arc::default()).with_poll_timeout(Duration::from_millis(200));

        let summaries = service.refresh().await;
        let err = summaries[1].remote_error().unwrap();
        assert_eq!(err.kind, RemoteErrorKind::FetchFailed);
        assert!(err.message.contains("timed out"));
        assert!(!summaries[2].has_error());
    }

    #[tokio::test]
    async fn test_concurrency_is_capped() {
        let poller = Arc::new(ScriptedPoller::default());
        let urls: Vec<String> = (0..8).map(|i| format!("http://host-{i}")).collect();
        let urls: Vec<&str> = urls.iter().map(String::as_str).collect();

        let summaries = service(&urls, Arc::clone(&poller))
            .with_max_concurrent_polls(2)
            .refresh()
            .await;

        assert_eq!(summaries.len(), 9);
        assert!(poller.max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_abandoned_refresh_cancels_polls() {
        let poller = Arc::new(ScriptedPoller::default());
        let service = service(&["http://slow-1", "http://slow-2"], Arc::clone(&poller));

        let abandoned = time::timeout(Duration::from_millis(100), service.refresh()).await;
        assert!(abandoned.is_err());

        // Aborted tasks drop their poll futures shortly after.
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(poller.dropped.load(Ordering::SeqCst), 2);
    }
}
