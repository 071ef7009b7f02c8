//! JEF Monitor
//!
//! Host process for the monitoring dashboard backend.
//!
//! Architecture:
//! - Configuration: Load settings from environment or defaults
//! - Registry: Persisted list of remote monitor instances
//! - Services: Local summary plus concurrent polling of remote instances
//! - Actions: Per-job operations offered on the job tree
//!
//! Every refresh interval the monitor rebuilds the instance list and logs
//! one line per instance. Job engines embedding the monitor publish their
//! suites to the shared snapshot store.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jefmon_core::domain::snapshot::{SnapshotProvider, SnapshotStore};
use jefmon_monitor::actions::ActionRegistry;
use jefmon_monitor::config::Config;
use jefmon_monitor::registry::InstanceRegistry;
use jefmon_monitor::report;
use jefmon_monitor::service::{AggregationService, HttpInstancePoller};
use jefmon_monitor::settings::JsonSettingsStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jefmon_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JEF Monitor");

    let config = load_config()?;
    info!(
        "Loaded configuration: settings={:?}, poll_timeout={:?}, max_concurrent_polls={}",
        config.settings_path, config.poll_timeout, config.max_concurrent_polls
    );

    let store = Arc::new(JsonSettingsStore::new(config.settings_path.clone()));
    let registry = Arc::new(
        InstanceRegistry::load(store).context("Failed to load monitor settings")?,
    );
    info!(
        "Instance '{}' monitoring {} remote instance(s)",
        registry.instance_name(),
        registry.list().len()
    );

    let poller = HttpInstancePoller::new(config.poll_timeout)
        .context("Failed to build HTTP client")?;
    let snapshots: Arc<dyn SnapshotProvider> = Arc::new(SnapshotStore::new());
    let actions = ActionRegistry::builtin();

    let service = AggregationService::new(registry, Arc::clone(&snapshots), Arc::new(poller))
        .with_poll_timeout(config.poll_timeout)
        .with_max_concurrent_polls(config.max_concurrent_polls);

    let mut ticker = time::interval(config.refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Refreshing every {:?}", config.refresh_interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for summary in service.refresh().await {
                    report::log_summary(&summary);
                }
                report::log_job_tree(&snapshots, &actions);
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!("Failed to listen for shutdown signal: {}", e);
                }
                break;
            }
        }
    }

    info!("JEF Monitor stopped");
    Ok(())
}

/// Loads configuration from environment variables with fallback to defaults
fn load_config() -> Result<Config> {
    match Config::from_env() {
        Ok(config) => {
            config.validate()?;
            Ok(config)
        }
        Err(e) => {
            warn!("Invalid environment configuration ({}), using defaults", e);
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}
