//! View job log action

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use jefmon_core::tree::JobTreeNode;
use tracing::debug;

use crate::actions::{ActionOutput, JobAction};

const DEFAULT_MAX_LINES: usize = 500;

/// Shows the tail of the suite's log file
///
/// Suites log to a single file named after their root job, so every node
/// of a suite shows the same log.
#[derive(Debug, Clone)]
pub struct ViewJobLogAction {
    max_lines: usize,
}

impl ViewJobLogAction {
    pub fn new(max_lines: usize) -> Self {
        Self {
            max_lines: max_lines.max(1),
        }
    }

    fn log_path(node: &JobTreeNode) -> Option<PathBuf> {
        let snapshot = node.suite_snapshot()?;
        let manager = snapshot.log_manager()?;
        let path = manager.log_file(&snapshot.root().job_id)?;
        path.is_file().then_some(path)
    }
}

impl Default for ViewJobLogAction {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl JobAction for ViewJobLogAction {
    fn id(&self) -> &'static str {
        "view-job-log"
    }

    fn name(&self) -> &'static str {
        "View job log"
    }

    fn icon(&self) -> &'static str {
        "fa fa-indent"
    }

    fn is_visible(&self, node: &JobTreeNode) -> bool {
        Self::log_path(node).is_some()
    }

    fn execute(&self, node: &JobTreeNode) -> Option<ActionOutput> {
        let path = Self::log_path(node)?;
        match tail_lines(&path, self.max_lines) {
            Ok(lines) => Some(ActionOutput::LogLines(lines)),
            Err(err) => {
                debug!("Could not read log {:?} for {}: {}", path, node.key(), err);
                None
            }
        }
    }
}

/// Last `max` lines of a file, oldest first
fn tail_lines(path: &Path, max: usize) -> io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = VecDeque::with_capacity(max);
    for line in reader.split(b'\n') {
        let line = line?;
        let line = String::from_utf8_lossy(&line);
        if lines.len() == max {
            lines.pop_front();
        }
        lines.push_back(line.trim_end_matches('\r').to_string());
    }
    Ok(lines.into())
}
