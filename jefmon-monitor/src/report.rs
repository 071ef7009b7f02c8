//! Log output of a refresh pass

use jefmon_core::domain::snapshot::SnapshotProvider;
use jefmon_core::domain::summary::InstanceSummary;
use jefmon_core::tree::JobTreeNode;
use std::sync::Arc;
use tracing::{Level, debug, info, warn};

use crate::actions::ActionRegistry;

/// Logs one line for an instance summary
pub fn log_summary(summary: &InstanceSummary) {
    let location = summary.url().unwrap_or("local");
    if let Some(error) = summary.remote_error() {
        warn!("{} [{}]: {}", summary.name(), location, error);
        return;
    }

    let counts: Vec<String> = summary
        .counts()
        .iter()
        .map(|(bucket, count)| {
            let label = bucket.state().map_or("unclassified", |state| state.as_str());
            format!("{}={}", label, count)
        })
        .collect();
    info!(
        "{} [{}]: {} suite(s) {}",
        summary.name(),
        location,
        summary.total_roots(),
        counts.join(" ")
    );
}

/// Logs the local job tree with the actions visible on each node
///
/// Visibility checks touch the filesystem, so nothing is walked unless
/// debug output is enabled. Returns the number of nodes logged.
pub fn log_job_tree(snapshots: &Arc<dyn SnapshotProvider>, actions: &ActionRegistry) -> usize {
    if !tracing::enabled!(Level::DEBUG) {
        return 0;
    }
    JobTreeNode::roots(snapshots)
        .iter()
        .map(|root| log_node(root, actions, 0))
        .sum()
}

fn log_node(node: &JobTreeNode, actions: &ActionRegistry, depth: usize) -> usize {
    let visible: Vec<&str> = actions
        .visible_for(node)
        .iter()
        .map(|action| action.id())
        .collect();
    let state = node
        .state()
        .map_or_else(|| "-".to_string(), |state| state.to_string());
    debug!(
        "{:indent$}{} {} {:.0}% actions=[{}]",
        "",
        node.key(),
        state,
        node.progress() * 100.0,
        visible.join(","),
        indent = depth * 2
    );
    1 + node
        .children()
        .iter()
        .map(|child| log_node(child, actions, depth + 1))
        .sum::<usize>()
}
