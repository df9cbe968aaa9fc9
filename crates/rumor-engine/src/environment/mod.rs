//! Propagation Environment
//!
//! Owns the pristine agents of a topology and runs seed messages through
//! working copies of them. Every run starts from the pristine state with a
//! freshly seeded RNG, so a run depends only on the topology, the engine
//! configuration and the seed message.

pub mod queue;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use rumor_types::{AgentId, Message, PropagationEvent, PropagationEventType};

use crate::components::agent::Agent;
use crate::config::EngineConfig;
use crate::error::{ConfigurationError, EngineError};
use crate::output::{PropagationReport, Reporter, RunStats, StatsCollector};
use crate::setup::{register_agents, TopologyConfig};

pub use queue::{DeliveryQueue, Router};

/// Everything an agent may touch while deliberating on one delivery
pub struct DeliveryContext<'a> {
    pub router: &'a mut dyn Router,
    pub reporter: &'a mut dyn Reporter,
    pub rng: &'a mut SmallRng,
    pub max_revision_passes: usize,
    /// 1-based delivery sequence number within the run
    pub tick: u64,
}

/// A validated topology plus the reporter observing its runs
#[derive(Debug)]
pub struct Environment {
    agents: BTreeMap<AgentId, Agent>,
    config: EngineConfig,
    reporter: PropagationReport,
    last_run: Option<BTreeMap<AgentId, Agent>>,
}

impl Environment {
    /// Register `agents` and check the topology. Neighbor hypotheses are
    /// instantiated here.
    pub fn new(agents: Vec<Agent>, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let agents = register_agents(agents)?;
        debug!(agents = agents.len(), "environment ready");

        Ok(Self {
            agents,
            config,
            reporter: PropagationReport::new(),
            last_run: None,
        })
    }

    pub fn from_topology(topology: &TopologyConfig) -> Result<Self, EngineError> {
        let agents = topology.build_agents()?;
        Self::new(agents, topology.engine.clone())
    }

    pub fn with_reporter(mut self, reporter: PropagationReport) -> Self {
        self.reporter = reporter;
        self
    }

    /// Same pristine topology and configuration with a fresh, log-less
    /// reporter. Used to run candidates in parallel.
    pub fn fork(&self) -> Self {
        Self {
            agents: self.agents.clone(),
            config: self.config.clone(),
            reporter: PropagationReport::new(),
            last_run: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn agents(&self) -> &BTreeMap<AgentId, Agent> {
        &self.agents
    }

    pub fn agent(&self, name: &AgentId) -> Option<&Agent> {
        self.agents.get(name)
    }

    pub fn reporter(&self) -> &PropagationReport {
        &self.reporter
    }

    /// Working copies as they stood at the end of the last successful run
    pub fn last_run_agents(&self) -> Option<&BTreeMap<AgentId, Agent>> {
        self.last_run.as_ref()
    }

    /// Deliver a copy of `seed` to each of `initial_agents` and propagate
    /// until the queue drains or the delivery budget runs out.
    ///
    /// Initial deliveries carry no source. Duplicate initial agents each
    /// receive their own copy.
    pub fn run_simulation(
        &mut self,
        seed: &Message,
        initial_agents: &[AgentId],
    ) -> Result<RunStats, EngineError> {
        let mut seeds = Vec::with_capacity(initial_agents.len());
        for agent in initial_agents {
            let mut message = seed.clone();
            message.source = None;
            message.destination = Some(agent.clone());
            seeds.push(message);
        }
        self.propagate(seeds)
    }

    /// Propagate a single message that already names its destination
    pub fn run_from(&mut self, message: Message) -> Result<RunStats, EngineError> {
        if message.destination.is_none() {
            return Err(ConfigurationError::MissingDestination.into());
        }
        self.propagate(vec![message])
    }

    fn propagate(&mut self, seeds: Vec<Message>) -> Result<RunStats, EngineError> {
        for message in &seeds {
            self.check_destination(message)?;
            message.validate()?;
        }

        let mut agents = self.agents.clone();
        let mut rng = SmallRng::seed_from_u64(self.config.seed);
        let mut queue = DeliveryQueue::new();
        for message in seeds {
            queue.send_message(message);
        }
        let mut stats = StatsCollector::new();
        let mut budget_exhausted = false;
        let max_revision_passes = self.config.max_revision_passes;
        self.reporter.reset();

        info!(seeds = queue.len(), seed = self.config.seed, "propagation started");

        while let Some(message) = queue.pop() {
            if stats.deliveries() >= self.config.max_deliveries {
                budget_exhausted = true;
                let pending = queue.len() + 1;
                warn!(
                    max_deliveries = self.config.max_deliveries,
                    pending, "delivery budget exhausted, run cut short"
                );
                let agent = message
                    .destination
                    .clone()
                    .unwrap_or_else(|| AgentId::from("environment"));
                self.reporter.record(
                    PropagationEvent::new(
                        String::new(),
                        stats.deliveries(),
                        PropagationEventType::BudgetExhausted,
                        agent,
                    )
                    .with_detail(format!("{} deliveries pending", pending)),
                );
                break;
            }

            let destination = message
                .destination
                .clone()
                .ok_or(ConfigurationError::MissingDestination)?;
            let agent = agents
                .get_mut(&destination)
                .ok_or(ConfigurationError::UnknownAgent { agent: destination })?;

            let mut ctx = DeliveryContext {
                router: &mut queue,
                reporter: &mut self.reporter,
                rng: &mut rng,
                max_revision_passes,
                tick: stats.deliveries() + 1,
            };
            let deliberation = agent.receive_message(&message, &mut ctx)?;
            stats.record_delivery(&deliberation);
        }

        if let Err(e) = self.reporter.flush() {
            warn!(error = %e, "failed to flush propagation events");
        }

        let stats = stats.finish(self.reporter.notified_agents(), budget_exhausted);
        info!(
            run_id = %stats.run_id,
            notified = stats.notified_count(),
            deliveries = stats.deliveries,
            budget_exhausted,
            "propagation finished"
        );
        self.last_run = Some(agents);
        Ok(stats)
    }

    fn check_destination(&self, message: &Message) -> Result<(), ConfigurationError> {
        match &message.destination {
            None => Err(ConfigurationError::MissingDestination),
            Some(name) if !self.agents.contains_key(name) => Err(ConfigurationError::UnknownAgent {
                agent: name.clone(),
            }),
            Some(_) => Ok(()),
        }
    }
}
