//! Instance summary domain types
//!
//! An [`InstanceSummary`] is what the dashboard's top-level view shows for
//! one monitored instance: how many root suites it has and how many of
//! them sit in each state. It is built once per poll and never modified.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::snapshot::{SnapshotProvider, SuiteSnapshot};
use crate::domain::state::StateBucket;

/// Display name given to instances whose poll failed
pub const FAILED_INSTANCE_NAME: &str = "error";

/// Number of root suites per state bucket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCounts(BTreeMap<StateBucket, u64>);

impl StatusCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, bucket: impl Into<StateBucket>) {
        *self.0.entry(bucket.into()).or_insert(0) += 1;
    }

    /// Sets the count for a bucket, replacing any previous value
    pub fn insert(&mut self, bucket: impl Into<StateBucket>, count: u64) {
        self.0.insert(bucket.into(), count);
    }

    /// Count for a bucket; zero if the bucket was never seen
    pub fn get(&self, bucket: impl Into<StateBucket>) -> u64 {
        self.0.get(&bucket.into()).copied().unwrap_or(0)
    }

    /// Sum of every bucket
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateBucket, u64)> + '_ {
        self.0.iter().map(|(bucket, count)| (*bucket, *count))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(StateBucket, u64)> for StatusCounts {
    fn from_iter<T: IntoIterator<Item = (StateBucket, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Why a remote instance could not be summarized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteErrorKind {
    /// The instance answered without a body
    NoContent,
    /// The body was not a valid `suites/json` document
    BadFormat,
    /// The instance could not be reached or answered with an error status
    FetchFailed,
}

impl std::fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteErrorKind::NoContent => write!(f, "No content"),
            RemoteErrorKind::BadFormat => write!(f, "Bad format"),
            RemoteErrorKind::FetchFailed => write!(f, "Fetch failed"),
        }
    }
}

/// Classified failure of one remote poll
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn no_content() -> Self {
        Self::new(RemoteErrorKind::NoContent, "instance returned an empty response")
    }

    pub fn bad_format(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::BadFormat, message)
    }

    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::FetchFailed, message)
    }
}

/// Per-state root suite counts of one monitored instance
///
/// `total_roots` and `counts` always come from the same snapshot or the same
/// HTTP response. When `remote_error` is set, `counts` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSummary {
    name: String,
    url: Option<String>,
    total_roots: u64,
    counts: StatusCounts,
    remote_error: Option<RemoteError>,
}

impl InstanceSummary {
    /// Reduces suite snapshots to a summary: one count per root job state
    pub fn from_snapshots<I>(name: impl Into<String>, snapshots: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<SuiteSnapshot>,
    {
        let mut counts = StatusCounts::new();
        let mut total_roots = 0;
        for snapshot in snapshots {
            counts.increment(snapshot.as_ref().root().state);
            total_roots += 1;
        }
        Self {
            name: name.into(),
            url: None,
            total_roots,
            counts,
            remote_error: None,
        }
    }

    /// Summarizes the instance this process runs in
    pub fn local(name: impl Into<String>, provider: &dyn SnapshotProvider) -> Self {
        Self::from_snapshots(name, provider.suites())
    }

    /// Summary successfully decoded from a remote instance
    pub fn remote(
        url: impl Into<String>,
        name: impl Into<String>,
        total_roots: u64,
        counts: StatusCounts,
    ) -> Self {
        Self {
            name: name.into(),
            url: Some(url.into()),
            total_roots,
            counts,
            remote_error: None,
        }
    }

    /// Placeholder summary for a remote instance whose poll failed
    pub fn failed(url: impl Into<String>, error: RemoteError) -> Self {
        Self {
            name: FAILED_INSTANCE_NAME.to_string(),
            url: Some(url.into()),
            total_roots: 0,
            counts: StatusCounts::new(),
            remote_error: Some(error),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base URL of a remote instance; `None` for the local one
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_local(&self) -> bool {
        self.url.is_none()
    }

    pub fn total_roots(&self) -> u64 {
        self.total_roots
    }

    pub fn counts(&self) -> &StatusCounts {
        &self.counts
    }

    pub fn remote_error(&self) -> Option<&RemoteError> {
        self.remote_error.as_ref()
    }

    pub fn has_error(&self) -> bool {
        self.remote_error.is_some()
    }
}
