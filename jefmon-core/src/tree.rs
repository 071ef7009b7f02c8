//! Job hierarchy view
//!
//! A [`JobTreeNode`] identifies a job by suite and job id and nothing more.
//! Every field it exposes is looked up in the provider's current snapshot at
//! call time, so a node never shows stale data and needs no invalidation.
//! Nodes are cheap to build; tree renderers create them per pass and drop
//! them afterwards.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::domain::log::LogManager;
use crate::domain::snapshot::{SnapshotProvider, SuiteSnapshot};
use crate::domain::state::JobState;
use crate::domain::status::{JobDuration, JobStatus};

/// Identity of a job within an instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobKey {
    pub suite_id: String,
    pub job_id: String,
}

impl JobKey {
    pub fn new(suite_id: impl Into<String>, job_id: impl Into<String>) -> Self {
        Self {
            suite_id: suite_id.into(),
            job_id: job_id.into(),
        }
    }
}

impl std::fmt::Display for JobKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.suite_id, self.job_id)
    }
}

/// Live handle onto one job of one suite
///
/// Equality and hashing only consider the [`JobKey`], so nodes built in
/// different refresh passes (or from different providers) match in sets
/// such as the tree's expanded-node state.
#[derive(Clone)]
pub struct JobTreeNode {
    key: JobKey,
    root: bool,
    provider: Arc<dyn SnapshotProvider>,
}

impl JobTreeNode {
    pub fn new(
        provider: Arc<dyn SnapshotProvider>,
        suite_id: impl Into<String>,
        job_id: impl Into<String>,
        root: bool,
    ) -> Self {
        Self {
            key: JobKey::new(suite_id, job_id),
            root,
            provider,
        }
    }

    /// Root node of every suite the provider currently knows, in provider order
    pub fn roots(provider: &Arc<dyn SnapshotProvider>) -> Vec<JobTreeNode> {
        provider
            .suites()
            .iter()
            .map(|suite| {
                JobTreeNode::new(
                    Arc::clone(provider),
                    suite.suite_id(),
                    suite.root().job_id.clone(),
                    true,
                )
            })
            .collect()
    }

    pub fn key(&self) -> &JobKey {
        &self.key
    }

    pub fn suite_id(&self) -> &str {
        &self.key.suite_id
    }

    pub fn job_id(&self) -> &str {
        &self.key.job_id
    }

    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Current snapshot of this node's suite, if the suite still exists
    pub fn suite_snapshot(&self) -> Option<Arc<SuiteSnapshot>> {
        self.provider.suite(&self.key.suite_id)
    }

    pub fn log_manager(&self) -> Option<Arc<dyn LogManager>> {
        self.suite_snapshot()?.log_manager().cloned()
    }

    pub fn has_children(&self) -> bool {
        self.suite_snapshot()
            .is_some_and(|suite| !suite.child_ids(&self.key.job_id).is_empty())
    }

    /// Direct children, in the order the snapshot lists them
    pub fn children(&self) -> Vec<JobTreeNode> {
        let Some(suite) = self.suite_snapshot() else {
            return Vec::new();
        };
        suite
            .child_ids(&self.key.job_id)
            .iter()
            .map(|child_id| {
                JobTreeNode::new(
                    Arc::clone(&self.provider),
                    self.key.suite_id.clone(),
                    child_id.clone(),
                    false,
                )
            })
            .collect()
    }

    /// Full status record, or `None` if the suite or job is gone
    pub fn status(&self) -> Option<JobStatus> {
        self.with_status(JobStatus::clone)
    }

    pub fn state(&self) -> Option<JobState> {
        self.with_status(|s| s.state)
    }

    /// Progress in `[0, 1]`; zero when unavailable
    pub fn progress(&self) -> f64 {
        self.with_status(JobStatus::progress).unwrap_or(0.0)
    }

    pub fn note(&self) -> Option<String> {
        self.with_status(|s| s.note.clone()).flatten()
    }

    pub fn resume_attempts(&self) -> u32 {
        self.with_status(|s| s.resume_attempts).unwrap_or(0)
    }

    pub fn duration(&self) -> Option<JobDuration> {
        self.with_status(|s| s.duration)
    }

    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.with_status(|s| s.last_activity).flatten()
    }

    pub fn properties(&self) -> HashMap<String, String> {
        self.with_status(|s| s.properties.clone()).unwrap_or_default()
    }

    pub fn is_started(&self) -> bool {
        self.with_status(JobStatus::is_started).unwrap_or(false)
    }

    pub fn is_resumed(&self) -> bool {
        self.with_status(JobStatus::is_resumed).unwrap_or(false)
    }

    pub fn is_aborted(&self) -> bool {
        self.with_status(JobStatus::is_aborted).unwrap_or(false)
    }

    pub fn is_stopped(&self) -> bool {
        self.with_status(JobStatus::is_stopped).unwrap_or(false)
    }

    pub fn is_stopping(&self) -> bool {
        self.with_status(JobStatus::is_stopping).unwrap_or(false)
    }

    pub fn is_completed(&self) -> bool {
        self.with_status(JobStatus::is_completed).unwrap_or(false)
    }

    pub fn is_prematurely_ended(&self) -> bool {
        self.with_status(JobStatus::is_prematurely_ended)
            .unwrap_or(false)
    }

    pub fn is_running(&self) -> bool {
        self.with_status(JobStatus::is_running).unwrap_or(false)
    }

    pub fn is_state(&self, states: &[JobState]) -> bool {
        self.with_status(|s| s.is_state(states)).unwrap_or(false)
    }

    fn with_status<T>(&self, f: impl FnOnce(&JobStatus) -> T) -> Option<T> {
        let suite = self.suite_snapshot()?;
        suite.job_status(&self.key.job_id).map(f)
    }
}

impl PartialEq for JobTreeNode {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for JobTreeNode {}

impl Hash for JobTreeNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl std::fmt::Debug for JobTreeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobTreeNode")
            .field("key", &self.key)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::log::FileLogManager;
    use crate::domain::snapshot::SnapshotStore;
    use std::collections::HashSet;

    fn store_with_suite() -> Arc<SnapshotStore> {
        let store = Arc::new(SnapshotStore::new());
        store.publish(
            SuiteSnapshot::new(
                "suite",
                JobStatus::new("root", JobState::Running)
                    .with_progress(0.5)
                    .with_note("halfway"),
            )
            .with_child("root", JobStatus::new("extract", JobState::Completed).with_progress(1.0))
            .with_child("root", JobStatus::new("load", JobState::Running))
            .with_log_manager(Arc::new(FileLogManager::new("/var/log/jef"))),
        );
        store
    }

    fn node(store: &Arc<SnapshotStore>, job_id: &str, root: bool) -> JobTreeNode {
        let provider: Arc<dyn SnapshotProvider> = store.clone();
        JobTreeNode::new(provider, "suite", job_id, root)
    }

    #[test]
    fn test_roots_lists_one_node_per_suite() {
        let store = store_with_suite();
        store.publish(SuiteSnapshot::new("other", JobStatus::new("solo", JobState::Stopped)));
        let provider: Arc<dyn SnapshotProvider> = store;

        let roots = JobTreeNode::roots(&provider);
        assert_eq!(roots.len(), 2);
        assert!(roots.iter().all(JobTreeNode::is_root));
        assert_eq!(roots[0].job_id(), "solo");
        assert_eq!(roots[1].job_id(), "root");
    }

    #[test]
    fn test_children_follow_snapshot_order() {
        let store = store_with_suite();
        let root = node(&store, "root", true);

        assert!(root.has_children());
        let children = root.children();
        let ids: Vec<&str> = children.iter().map(JobTreeNode::job_id).collect();
        assert_eq!(ids, vec!["extract", "load"]);
        assert!(children.iter().all(|c| !c.is_root() && c.suite_id() == "suite"));
    }

    #[test]
    fn test_leaf_has_no_children() {
        let store = store_with_suite();
        let leaf = node(&store, "load", false);
        assert!(!leaf.has_children());
        assert!(leaf.children().is_empty());
    }

    #[test]
    fn test_accessors_read_current_snapshot() {
        let store = store_with_suite();
        let root = node(&store, "root", true);
        assert_eq!(root.state(), Some(JobState::Running));
        assert_eq!(root.progress(), 0.5);
        assert_eq!(root.note().as_deref(), Some("halfway"));
        assert!(root.is_running());

        store.publish(SuiteSnapshot::new(
            "suite",
            JobStatus::new("root", JobState::Completed).with_progress(1.0),
        ));

        // Same handle, new data.
        assert_eq!(root.state(), Some(JobState::Completed));
        assert_eq!(root.progress(), 1.0);
        assert_eq!(root.note(), None);
        assert!(root.is_completed());
        assert!(!root.has_children());
    }

    #[test]
    fn test_progress_stays_in_unit_range() {
        let store = store_with_suite();
        let root = node(&store, "root", true);

        let mut status = JobStatus::new("root", JobState::Running);
        status.progress = 3.0;
        store.publish(SuiteSnapshot::new("suite", status.clone()));
        assert_eq!(root.progress(), 1.0);

        status.progress = f64::NAN;
        store.publish(SuiteSnapshot::new("suite", status));
        assert_eq!(root.progress(), 0.0);
    }

    #[test]
    fn test_removed_suite_yields_neutral_values() {
        let store = store_with_suite();
        let root = node(&store, "root", true);
        store.remove("suite");

        assert!(root.suite_snapshot().is_none());
        assert!(root.log_manager().is_none());
        assert!(root.status().is_none());
        assert_eq!(root.state(), None);
        assert_eq!(root.progress(), 0.0);
        assert_eq!(root.resume_attempts(), 0);
        assert_eq!(root.duration(), None);
        assert_eq!(root.last_activity(), None);
        assert!(root.properties().is_empty());
        assert!(!root.is_running());
        assert!(!root.is_state(&JobState::ALL));
        assert!(!root.has_children());
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_missing_job_yields_neutral_values() {
        let store = store_with_suite();
        let ghost = node(&store, "ghost", false);
        assert!(ghost.suite_snapshot().is_some());
        assert!(ghost.status().is_none());
        assert!(!ghost.is_started());
        assert!(!ghost.has_children());
    }

    #[test]
    fn test_equality_ignores_root_flag_and_provider() {
        let a = node(&store_with_suite(), "root", true);
        let b = node(&store_with_suite(), "root", false);
        let other = node(&store_with_suite(), "load", false);

        assert_eq!(a, b);
        assert_ne!(a, other);

        let mut expanded = HashSet::new();
        expanded.insert(a);
        assert!(expanded.contains(&b));
        assert!(!expanded.insert(b));
        assert!(!expanded.contains(&other));
    }

    #[test]
    fn test_log_manager_comes_from_snapshot() {
        let store = store_with_suite();
        let manager = node(&store, "extract", false).log_manager().unwrap();
        assert!(manager.log_file("root").is_some());
    }
}
