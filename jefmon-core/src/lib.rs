//! JEF Monitor Core
//!
//! Core types and abstractions for the JEF monitoring dashboard.
//!
//! This crate contains:
//! - Domain types: job states, job statuses, suite snapshots and instance summaries
//! - DTOs: the `suites/json` wire format exchanged between monitor instances
//! - Tree: the live, non-caching job hierarchy view over a snapshot provider

pub mod domain;
pub mod dto;
pub mod tree;
