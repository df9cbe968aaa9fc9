//! Event Logging
//!
//! JSONL output of propagation events.

pub mod logger;

pub use logger::EventLogger;
