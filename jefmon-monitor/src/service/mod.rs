//! Service layer
//!
//! Services hold the monitor's refresh logic: polling remote instances and
//! folding every instance into the dashboard summary list.
//!
//! The poller is trait-based so aggregation can be tested without a network.

mod aggregation;
mod poller;

// Re-export traits
pub use poller::InstancePoller;

// Re-export implementations
pub use aggregation::AggregationService;
pub use poller::HttpInstancePoller;
