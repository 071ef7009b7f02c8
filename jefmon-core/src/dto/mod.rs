//! Data Transfer Objects for inter-instance communication
//!
//! Monitor instances expose their summary to each other over HTTP. The
//! types here are the wire representation of that exchange.

pub mod suites;
