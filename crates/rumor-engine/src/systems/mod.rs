//! Propagation Systems
//!
//! Message assessment, belief revision and the per-message deliberation
//! pipeline.

pub mod assessment;
pub mod deliberation;
pub mod revision;

pub use assessment::{assess, topic_agreement, Assessment};
pub use deliberation::Deliberation;
pub use revision::{revise_to_fixpoint, RevisionOutcome};
