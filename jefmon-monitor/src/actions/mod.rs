//! Job actions
//!
//! Operations offered next to each row of the job tree. The set is fixed
//! when the monitor starts; the tree only asks each action whether it
//! applies to a node and, when the user picks it, runs it.

mod view_log;

pub use view_log::ViewJobLogAction;

use jefmon_core::tree::JobTreeNode;
use std::sync::Arc;

/// What an action produced for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutput {
    /// Lines of text, oldest first
    LogLines(Vec<String>),
}

/// A per-job operation
pub trait JobAction: Send + Sync {
    /// Stable identifier
    fn id(&self) -> &'static str;

    /// Human readable title
    fn name(&self) -> &'static str;

    /// Icon CSS class shown in the actions column
    fn icon(&self) -> &'static str;

    /// Whether the action applies to `node` right now
    ///
    /// Must only read: the snapshot, log manager or files it looks at may
    /// be missing, which simply means "not visible".
    fn is_visible(&self, node: &JobTreeNode) -> bool;

    /// Runs the action; `None` when there is nothing to show
    fn execute(&self, node: &JobTreeNode) -> Option<ActionOutput>;
}

/// Read-only set of the actions known to this monitor
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: Vec<Arc<dyn JobAction>>,
}

impl ActionRegistry {
    pub fn new(actions: Vec<Arc<dyn JobAction>>) -> Self {
        Self { actions }
    }

    /// Registry holding every built-in action
    pub fn builtin() -> Self {
        let actions: Vec<Arc<dyn JobAction>> = vec![Arc::new(ViewJobLogAction::default())];
        Self::new(actions)
    }

    pub fn all(&self) -> &[Arc<dyn JobAction>] {
        &self.actions
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn JobAction>> {
        self.actions.iter().find(|action| action.id() == id)
    }

    /// Actions that currently apply to `node`, in registration order
    pub fn visible_for(&self, node: &JobTreeNode) -> Vec<&Arc<dyn JobAction>> {
        self.actions
            .iter()
            .filter(|action| action.is_visible(node))
            .collect()
    }
}
