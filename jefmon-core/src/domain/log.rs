//! Log domain types

use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Where an engine keeps the logs of a suite's jobs
///
/// Managers that do not write to the local filesystem return `None` from
/// [`LogManager::log_file`]; callers treat that as "no log to show".
pub trait LogManager: Debug + Send + Sync {
    /// Path of the log file for a job, if this manager writes log files
    fn log_file(&self, job_id: &str) -> Option<PathBuf>;
}

/// Log manager writing one `<job id>.log` file per job under a directory
#[derive(Debug, Clone)]
pub struct FileLogManager {
    log_dir: PathBuf,
}

impl FileLogManager {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

impl LogManager for FileLogManager {
    fn log_file(&self, job_id: &str) -> Option<PathBuf> {
        if job_id.is_empty() {
            return None;
        }
        // Job ids are free text; keep them from escaping the log directory.
        let file_name: String = job_id
            .chars()
            .map(|c| if c == '/' || c == '\\' || c == ':' { '_' } else { c })
            .collect();
        Some(self.log_dir.join(format!("{file_name}.log")))
    }
}
