//! Job state domain types

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle phase of a single job
///
/// The set is closed and defined by the job-execution engine. Wire names
/// are the upper snake case variant names (e.g. `PREMATURE_TERMINATION`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Aborted,
    Completed,
    PrematureTermination,
    Running,
    Stopped,
    Stopping,
    Unknown,
}

impl JobState {
    /// Every state, in declaration order
    pub const ALL: [JobState; 7] = [
        JobState::Aborted,
        JobState::Completed,
        JobState::PrematureTermination,
        JobState::Running,
        JobState::Stopped,
        JobState::Stopping,
        JobState::Unknown,
    ];

    /// Name used on the wire and in persisted snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Aborted => "ABORTED",
            JobState::Completed => "COMPLETED",
            JobState::PrematureTermination => "PREMATURE_TERMINATION",
            JobState::Running => "RUNNING",
            JobState::Stopped => "STOPPED",
            JobState::Stopping => "STOPPING",
            JobState::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state name that is not part of the closed [`JobState`] set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized job state: {0:?}")]
pub struct ParseStateError(pub String);

impl FromStr for JobState {
    type Err = ParseStateError;

    /// Parses an exact, case-sensitive wire name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ParseStateError(s.to_string()))
    }
}

/// Key under which root suites are counted in a summary
///
/// Remote instances may report jobs whose state they could not classify
/// using an empty key; those are kept in their own bucket rather than dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateBucket {
    State(JobState),
    Unclassified,
}

impl StateBucket {
    /// Decodes a `statuses` object key: blank means unclassified,
    /// anything else must be a known state name
    pub fn from_wire_key(key: &str) -> Result<Self, ParseStateError> {
        if key.trim().is_empty() {
            return Ok(StateBucket::Unclassified);
        }
        key.parse().map(StateBucket::State)
    }

    /// Encodes this bucket as a `statuses` object key
    pub fn wire_key(&self) -> &'static str {
        match self {
            StateBucket::State(state) => state.as_str(),
            StateBucket::Unclassified => "",
        }
    }

    pub fn state(&self) -> Option<JobState> {
        match self {
            StateBucket::State(state) => Some(*state),
            StateBucket::Unclassified => None,
        }
    }
}

impl From<JobState> for StateBucket {
    fn from(state: JobState) -> Self {
        StateBucket::State(state)
    }
}
