//! Suite snapshot domain types
//!
//! A [`SuiteSnapshot`] is the engine's immutable view of one job suite at a
//! point in time. The engine replaces snapshots as jobs progress; readers
//! hold an `Arc` to whichever snapshot was current when they looked.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::domain::log::LogManager;
use crate::domain::status::JobStatus;

/// Immutable statuses of every job in one suite
#[derive(Debug, Clone)]
pub struct SuiteSnapshot {
    suite_id: String,
    root_id: String,
    jobs: HashMap<String, JobStatus>,
    children: HashMap<String, Vec<String>>,
    log_manager: Option<Arc<dyn LogManager>>,
}

impl SuiteSnapshot {
    /// Creates a snapshot holding only the suite's root job
    pub fn new(suite_id: impl Into<String>, root: JobStatus) -> Self {
        let root_id = root.job_id.clone();
        let mut jobs = HashMap::new();
        jobs.insert(root_id.clone(), root);
        Self {
            suite_id: suite_id.into(),
            root_id,
            jobs,
            children: HashMap::new(),
            log_manager: None,
        }
    }

    /// Adds a child job under `parent_id`
    ///
    /// Children are reported in the order they were added. Re-adding an
    /// existing job id replaces its status without duplicating it.
    pub fn with_child(mut self, parent_id: &str, child: JobStatus) -> Self {
        let child_id = child.job_id.clone();
        if self.jobs.insert(child_id.clone(), child).is_none() {
            self.children
                .entry(parent_id.to_string())
                .or_default()
                .push(child_id);
        }
        self
    }

    pub fn with_log_manager(mut self, log_manager: Arc<dyn LogManager>) -> Self {
        self.log_manager = Some(log_manager);
        self
    }

    pub fn suite_id(&self) -> &str {
        &self.suite_id
    }

    pub fn root(&self) -> &JobStatus {
        // The root is inserted by `new` and never removed.
        &self.jobs[&self.root_id]
    }

    pub fn job_status(&self, job_id: &str) -> Option<&JobStatus> {
        self.jobs.get(job_id)
    }

    /// Ids of the direct children of `job_id`, in engine order
    pub fn child_ids(&self, job_id: &str) -> &[String] {
        self.children.get(job_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Statuses of the direct children of `job_id`, in engine order
    pub fn children(&self, job_id: &str) -> Vec<&JobStatus> {
        self.child_ids(job_id)
            .iter()
            .filter_map(|id| self.jobs.get(id))
            .collect()
    }

    pub fn log_manager(&self) -> Option<&Arc<dyn LogManager>> {
        self.log_manager.as_ref()
    }

    /// Number of jobs in the suite, root included
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl AsRef<SuiteSnapshot> for SuiteSnapshot {
    fn as_ref(&self) -> &SuiteSnapshot {
        self
    }
}

/// Read interface onto an instance's current suite snapshots
///
/// Any lookup may miss: suites come and go while the monitor is running.
pub trait SnapshotProvider: Send + Sync {
    /// Current snapshot of one suite
    fn suite(&self, suite_id: &str) -> Option<Arc<SuiteSnapshot>>;

    /// Current snapshots of every suite
    fn suites(&self) -> Vec<Arc<SuiteSnapshot>>;
}

/// In-process snapshot collection, fed by the engine
///
/// The lock is only held long enough to clone an `Arc` out or swap one in.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    suites: RwLock<BTreeMap<String, Arc<SuiteSnapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a snapshot, replacing any previous one for the same suite
    pub fn publish(&self, snapshot: SuiteSnapshot) {
        let mut suites = self.suites.write().unwrap_or_else(|e| e.into_inner());
        suites.insert(snapshot.suite_id.clone(), Arc::new(snapshot));
    }

    /// Drops a suite; returns false if it was not present
    pub fn remove(&self, suite_id: &str) -> bool {
        let mut suites = self.suites.write().unwrap_or_else(|e| e.into_inner());
        suites.remove(suite_id).is_some()
    }
}

impl SnapshotProvider for SnapshotStore {
    fn suite(&self, suite_id: &str) -> Option<Arc<SuiteSnapshot>> {
        let suites = self.suites.read().unwrap_or_else(|e| e.into_inner());
        suites.get(suite_id).cloned()
    }

    fn suites(&self) -> Vec<Arc<SuiteSnapshot>> {
        let suites = self.suites.read().unwrap_or_else(|e| e.into_inner());
        suites.values().cloned().collect()
    }
}
