//! Belief Revision
//!
//! Runs an agent's belief rules to a fixpoint: the full rule list is applied
//! pass after pass until one pass changes nothing. The pass cap turns a rule
//! set that never settles into an error instead of a hang.

use std::collections::BTreeMap;

use rumor_types::{AgentId, Message, TopicId};

use crate::error::EngineError;
use crate::rules::belief::BeliefRevision;
use crate::systems::assessment::Assessment;

/// Result of a settled revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevisionOutcome {
    /// Passes executed, including the final pass that changed nothing
    pub passes: usize,
    /// Passes in which at least one rule reported a change
    pub changing_passes: usize,
}

impl RevisionOutcome {
    pub fn changed(&self) -> bool {
        self.changing_passes > 0
    }
}

/// Apply `rules` to `beliefs` until a pass reports no change.
///
/// Every rule runs in every pass, in order. Fails with
/// [`EngineError::NonTerminationRisk`] if `max_passes` passes all changed
/// something.
pub fn revise_to_fixpoint<R: BeliefRevision>(
    agent: &AgentId,
    rules: &[R],
    beliefs: &mut BTreeMap<TopicId, i32>,
    assessment: &Assessment,
    message: &Message,
    max_passes: usize,
) -> Result<RevisionOutcome, EngineError> {
    let mut outcome = RevisionOutcome::default();

    while outcome.passes < max_passes {
        outcome.passes += 1;

        let mut changed = false;
        for rule in rules {
            // Non-short-circuiting: later rules still run after an earlier change
            changed |= rule.change(beliefs, assessment, message);
        }

        if !changed {
            return Ok(outcome);
        }
        outcome.changing_passes += 1;
    }

    Err(EngineError::NonTerminationRisk {
        agent: agent.clone(),
        passes: max_passes,
    })
}
