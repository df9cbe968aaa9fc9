//! Run Output
//!
//! Reporters and per-run statistics.

pub mod report;
pub mod stats;

pub use report::{PropagationReport, Reporter};
pub use stats::{RunStats, StatsCollector};
