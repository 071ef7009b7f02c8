//! JEF Monitor
//!
//! Aggregates job suite status from this instance and any number of remote
//! monitor instances for the dashboard.
//!
//! Architecture:
//! - Configuration: runtime settings from the environment, persisted
//!   instance settings from a JSON file
//! - Registry: the ordered, persisted list of remote instance URLs
//! - Services: remote polling and per-refresh aggregation
//! - Actions: per-job operations offered next to each tree row

pub mod actions;
pub mod config;
pub mod registry;
pub mod report;
pub mod service;
pub mod settings;
