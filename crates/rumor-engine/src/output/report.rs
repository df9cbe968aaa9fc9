//! Propagation Reporting
//!
//! The reporter is the external observer of a run: it collects the set of
//! agents a message reached, the agents that agreed with it, and an audit
//! trail of decisions. Nothing in the engine reads reporter state back.

use std::collections::BTreeSet;

use rumor_types::{AgentId, PropagationEvent};
use tracing::warn;

use crate::events::EventLogger;

/// Observer of a propagation run
pub trait Reporter {
    /// Record an audit line
    fn report(&mut self, text: &str);

    /// Mark an agent as reached by the message
    fn report_agent(&mut self, agent: &AgentId);

    /// Mark an agent as having agreed with the message
    fn report_agreement(&mut self, agent: &AgentId);

    /// Agents reached so far in the current run
    fn notified_agents(&self) -> &BTreeSet<AgentId>;

    /// Forget everything gathered for the previous run
    fn reset(&mut self);

    /// Structured event hook. Ignored unless the reporter keeps events.
    fn record(&mut self, _event: PropagationEvent) {}
}

/// Default reporter: in-memory sets plus an optional JSONL event log
#[derive(Debug, Default)]
pub struct PropagationReport {
    notified: BTreeSet<AgentId>,
    agreeing: BTreeSet<AgentId>,
    lines: Vec<String>,
    logger: Option<EventLogger>,
}

impl PropagationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also write every recorded event to `logger`. The log spans runs.
    pub fn with_logger(mut self, logger: EventLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn agreeing_agents(&self) -> &BTreeSet<AgentId> {
        &self.agreeing
    }

    pub fn notified_count(&self) -> usize {
        self.notified.len()
    }

    pub fn logged_events(&self) -> u64 {
        self.logger.as_ref().map_or(0, EventLogger::event_count)
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        match self.logger.as_mut() {
            Some(logger) => logger.flush(),
            None => Ok(()),
        }
    }
}

impl Reporter for PropagationReport {
    fn report(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    fn report_agent(&mut self, agent: &AgentId) {
        self.notified.insert(agent.clone());
    }

    fn report_agreement(&mut self, agent: &AgentId) {
        self.agreeing.insert(agent.clone());
    }

    fn notified_agents(&self) -> &BTreeSet<AgentId> {
        &self.notified
    }

    fn reset(&mut self) {
        self.notified.clear();
        self.agreeing.clear();
        self.lines.clear();
    }

    fn record(&mut self, mut event: PropagationEvent) {
        let Some(logger) = self.logger.as_mut() else {
            return;
        };
        event.event_id = logger.next_id();
        if let Err(e) = logger.log(&event) {
            // The log is observational; a write failure must not end the run
            warn!(error = %e, "failed to write propagation event");
        }
    }
}
