//! Core domain types
//!
//! These types describe what an instance's job-execution engine exposes
//! (states, statuses, suite snapshots, logs) and what the monitor derives
//! from it (per-instance summaries). Snapshots are owned by the engine;
//! everything here only reads them.

pub mod log;
pub mod snapshot;
pub mod state;
pub mod status;
pub mod summary;
