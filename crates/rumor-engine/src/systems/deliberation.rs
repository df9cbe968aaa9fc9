//! Deliberation
//!
//! What an agent does with one delivered message: update the hypothesis
//! about the sender, revise its own beliefs, pick a decision rule and hand
//! the outgoing copies to the router.
//!
//! The assessment driving both revision and decision is computed once, on
//! the beliefs the agent held when the message arrived.

use tracing::debug;

use rumor_types::{AgentId, Message, PropagationEvent, PropagationEventType};

use crate::components::agent::Agent;
use crate::environment::DeliveryContext;
use crate::error::EngineError;
use crate::rules::DecisionRule;
use crate::systems::assessment::{assess, Assessment};
use crate::systems::revision::revise_to_fixpoint;

/// What happened to one delivered message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deliberation {
    /// Decision rule that claimed the message, `None` when every rule declined
    pub rule: Option<&'static str>,
    /// Belief revision changed the receiver's beliefs
    pub revised: bool,
    /// The winning rule withheld the message
    pub suppressed: bool,
    /// Neighbors a copy was sent to, in name order
    pub recipients: Vec<AgentId>,
}

impl Deliberation {
    pub fn ignored(&self) -> bool {
        self.rule.is_none()
    }
}

fn event(tick: u64, event_type: PropagationEventType, agent: &AgentId) -> PropagationEvent {
    PropagationEvent::new(String::new(), tick, event_type, agent.clone())
}

impl Agent {
    /// Process one delivered message.
    ///
    /// The incoming message is never mutated; decision rules work on a copy.
    pub fn receive_message(
        &mut self,
        original: &Message,
        ctx: &mut DeliveryContext<'_>,
    ) -> Result<Deliberation, EngineError> {
        original.validate()?;
        self.update_neighbor_beliefs(original)?;

        ctx.reporter.report_agent(&self.name);
        let mut received = event(ctx.tick, PropagationEventType::Received, &self.name)
            .with_strength(original.strength);
        if let Some(source) = &original.source {
            received = received.with_counterpart(source.clone());
        }
        ctx.reporter.record(received);

        let message = original.clone();
        let assessment = assess(&self.beliefs, &message.beliefs_as_map());
        debug!(
            agent = %self.name,
            interest = assessment.interest,
            agreement = assessment.average_agreement(),
            "assessed message"
        );

        let revision = revise_to_fixpoint(
            &self.name,
            &self.belief_rules,
            &mut self.beliefs,
            &assessment,
            &message,
            ctx.max_revision_passes,
        )?;
        if revision.changed() {
            debug!(agent = %self.name, passes = revision.passes, "beliefs revised");
            ctx.reporter.record(
                event(ctx.tick, PropagationEventType::Revised, &self.name)
                    .with_detail(format!("settled after {} passes", revision.passes)),
            );
        }

        let mut outcome = self.deliberate(&message, &assessment, ctx)?;
        outcome.revised = revision.changed();
        Ok(outcome)
    }

    fn deliberate(
        &self,
        message: &Message,
        assessment: &Assessment,
        ctx: &mut DeliveryContext<'_>,
    ) -> Result<Deliberation, EngineError> {
        let mut outcome = Deliberation::default();

        let chosen = self
            .decision_rules
            .iter()
            .find(|rule| rule.decide(&self.beliefs, assessment, message, &mut *ctx.rng));
        let Some(rule) = chosen else {
            debug!(agent = %self.name, "no decision rule matched");
            ctx.reporter.record(event(ctx.tick, PropagationEventType::Ignored, &self.name));
            return Ok(outcome);
        };
        outcome.rule = Some(rule.name());

        let Some(new_message) = rule.alter(&self.beliefs, assessment, message) else {
            debug!(agent = %self.name, rule = rule.name(), "message suppressed");
            let line = rule.report(&self.name, message);
            ctx.reporter.report(&line);
            ctx.reporter.record(
                event(ctx.tick, PropagationEventType::Suppressed, &self.name)
                    .with_rule(rule.name())
                    .with_detail(line),
            );
            outcome.suppressed = true;
            return Ok(outcome);
        };

        if matches!(rule, DecisionRule::Agreement { .. }) {
            ctx.reporter.report_agreement(&self.name);
        }
        ctx.reporter.record(
            event(ctx.tick, PropagationEventType::Decided, &self.name)
                .with_rule(rule.name())
                .with_strength(new_message.strength),
        );

        for neighbor in &self.neighbors {
            if message.source.as_ref() == Some(neighbor) {
                continue;
            }
            let neighbor_beliefs = self.hypothesis(neighbor)?.beliefs_as_map();
            if !self.communication_rule.communicate(
                assessment.interest,
                &message.beliefs,
                &neighbor_beliefs,
                &new_message,
            ) {
                debug!(
                    agent = %self.name,
                    neighbor = %neighbor,
                    gate = self.communication_rule.name(),
                    "neighbor skipped"
                );
                continue;
            }

            let mut outgoing = new_message.clone();
            outgoing.source = Some(self.name.clone());
            outgoing.destination = Some(neighbor.clone());
            let line = rule.report(&self.name, &outgoing);
            self.execute_action(rule, outgoing, line, ctx);
            outcome.recipients.push(neighbor.clone());
        }

        Ok(outcome)
    }

    fn execute_action(
        &self,
        rule: &DecisionRule,
        message: Message,
        line: String,
        ctx: &mut DeliveryContext<'_>,
    ) {
        ctx.reporter.report(&line);
        ctx.reporter.report_agent(&self.name);

        let mut sent = event(ctx.tick, PropagationEventType::Sent, &self.name)
            .with_rule(rule.name())
            .with_strength(message.strength)
            .with_detail(line);
        if let Some(destination) = &message.destination {
            sent = sent.with_counterpart(destination.clone());
        }
        ctx.reporter.record(sent);
        ctx.router.send_message(message);
    }
}
