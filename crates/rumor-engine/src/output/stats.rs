//! Run Statistics
//!
//! Per-run counters gathered while the delivery queue drains.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use uuid::Uuid;

use rumor_types::AgentId;

use crate::systems::Deliberation;

/// Summary of one propagation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub run_id: Uuid,
    /// Agents the message reached, in name order
    pub notified_agents: Vec<AgentId>,
    pub deliveries: u64,
    pub messages_sent: u64,
    pub suppressed: u64,
    /// Deliveries where no decision rule matched
    pub ignored: u64,
    /// Deliveries whose belief revision changed the receiver
    pub revisions: u64,
    pub decisions_by_rule: BTreeMap<String, u64>,
    /// The run stopped at the delivery budget with messages still queued
    pub budget_exhausted: bool,
}

impl RunStats {
    /// Fitness of the seed message: how many distinct agents it reached
    pub fn notified_count(&self) -> usize {
        self.notified_agents.len()
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }
}

/// Accumulates counters during a run
#[derive(Debug, Clone, Default)]
pub struct StatsCollector {
    deliveries: u64,
    messages_sent: u64,
    suppressed: u64,
    ignored: u64,
    revisions: u64,
    decisions_by_rule: BTreeMap<String, u64>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> u64 {
        self.deliveries
    }

    pub fn record_delivery(&mut self, deliberation: &Deliberation) {
        self.deliveries += 1;
        self.messages_sent += deliberation.recipients.len() as u64;
        if deliberation.revised {
            self.revisions += 1;
        }
        if deliberation.suppressed {
            self.suppressed += 1;
        }
        match deliberation.rule {
            Some(rule) => *self.decisions_by_rule.entry(rule.to_string()).or_insert(0) += 1,
            None => self.ignored += 1,
        }
    }

    pub fn finish(self, notified: &BTreeSet<AgentId>, budget_exhausted: bool) -> RunStats {
        RunStats {
            run_id: Uuid::new_v4(),
            notified_agents: notified.iter().cloned().collect(),
            deliveries: self.deliveries,
            messages_sent: self.messages_sent,
            suppressed: self.suppressed,
            ignored: self.ignored,
            revisions: self.revisions,
            decisions_by_rule: self.decisions_by_rule,
            budget_exhausted,
        }
    }
}
