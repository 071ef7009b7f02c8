//! Job status domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::state::JobState;

/// Point-in-time status of one job, as recorded by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub job_id: String,
    pub state: JobState,
    /// Fraction of work done as recorded; read it through
    /// [`JobStatus::progress`] to get a value in `[0, 1]`
    pub progress: f64,
    pub note: Option<String>,
    pub resume_attempts: u32,
    pub duration: JobDuration,
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl JobStatus {
    /// Creates a status with no progress and no timing information
    pub fn new(job_id: impl Into<String>, state: JobState) -> Self {
        Self {
            job_id: job_id.into(),
            state,
            progress: 0.0,
            note: None,
            resume_attempts: 0,
            duration: JobDuration::default(),
            last_activity: None,
            properties: HashMap::new(),
        }
    }

    /// Sets the progress, clamping it to `[0, 1]`
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = clamp_progress(progress);
        self
    }

    /// Fraction of work done, in `[0, 1]`; NaN reads as zero
    pub fn progress(&self) -> f64 {
        clamp_progress(self.progress)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_duration(mut self, duration: JobDuration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_last_activity(mut self, at: DateTime<Utc>) -> Self {
        self.last_activity = Some(at);
        self
    }

    pub fn with_resume_attempts(mut self, attempts: u32) -> Self {
        self.resume_attempts = attempts;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn is_started(&self) -> bool {
        self.duration.start.is_some()
    }

    pub fn is_resumed(&self) -> bool {
        self.resume_attempts > 0
    }

    pub fn is_aborted(&self) -> bool {
        self.state == JobState::Aborted
    }

    pub fn is_stopped(&self) -> bool {
        self.state == JobState::Stopped
    }

    pub fn is_stopping(&self) -> bool {
        self.state == JobState::Stopping
    }

    pub fn is_completed(&self) -> bool {
        self.state == JobState::Completed
    }

    pub fn is_prematurely_ended(&self) -> bool {
        self.state == JobState::PrematureTermination
    }

    pub fn is_running(&self) -> bool {
        self.state == JobState::Running
    }

    /// True if the job is in any of the given states
    pub fn is_state(&self, states: &[JobState]) -> bool {
        states.contains(&self.state)
    }
}

fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Timing of a job run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDuration {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Start of the latest resumed run, if the job was resumed
    pub resumed_start: Option<DateTime<Utc>>,
}

impl JobDuration {
    pub fn started_at(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            ..Self::default()
        }
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            resumed_start: None,
        }
    }

    /// Time spent so far: start to end, or start to `now` while unfinished
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        let start = self.start?;
        let end = self.end.unwrap_or(now);
        Some((end - start).max(chrono::Duration::zero()))
    }
}
