//! End-to-end propagation tests
//!
//! Topologies are loaded or built, seeded, and checked through the run
//! statistics, the reporter and the JSONL event log.

use std::io::BufRead;
use std::path::PathBuf;

use rumor_engine::setup::shapes;
use rumor_engine::{
    Agent, BeliefRule, ConfigurationError, DecisionRule, EngineConfig, EngineError, Environment,
    EventLogger, PropagationReport, Reporter, TopologyConfig,
};
use rumor_types::fixtures::{self, FIXTURE_TOPIC};
use rumor_types::{AgentId, Belief, Message, PropagationEvent, PropagationEventType};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_events(path: &std::path::Path) -> Vec<PropagationEvent> {
    let file = std::fs::File::open(path).unwrap();
    std::io::BufReader::new(file)
        .lines()
        .map(|line| PropagationEvent::from_jsonl(&line.unwrap()).unwrap())
        .collect()
}

fn id(name: &str) -> AgentId {
    AgentId::from(name)
}

#[test]
fn test_line_relays_away_from_sender() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("events.jsonl");

    let topology = TopologyConfig::from_file(fixture("line.toml")).unwrap();
    let mut env = Environment::from_topology(&topology)
        .unwrap()
        .with_reporter(PropagationReport::new().with_logger(EventLogger::new(&log_path).unwrap()));

    let message = fixtures::single_topic_seed()
        .with_source("a")
        .with_destination("b");
    let stats = env.run_from(message).unwrap();

    // b agrees and relays a strengthened copy to c only
    assert_eq!(stats.deliveries, 2);
    assert_eq!(stats.messages_sent, 1);
    assert_eq!(stats.notified_agents, vec![id("b"), id("c")]);

    let events = read_events(&log_path);
    let sent: Vec<&PropagationEvent> = events
        .iter()
        .filter(|e| e.event_type == PropagationEventType::Sent)
        .collect();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].agent, id("b"));
    assert_eq!(sent[0].counterpart, Some(id("c")));
    assert_eq!(sent[0].strength, Some(9));
    assert!(events.iter().all(|e| e.counterpart != Some(id("a")) || e.event_type == PropagationEventType::Received));
    assert!(events.windows(2).all(|w| w[0].event_id < w[1].event_id));

    assert!(env.reporter().agreeing_agents().contains(&id("b")));
    assert!(env.reporter().agreeing_agents().contains(&id("c")));
}

#[test]
fn test_seeded_line_reaches_everyone() {
    let topology = TopologyConfig::from_file(fixture("line.toml")).unwrap();
    let mut env = Environment::from_topology(&topology).unwrap();

    let stats = env
        .run_simulation(&fixtures::single_topic_seed(), &[id("a")])
        .unwrap();

    assert_eq!(stats.notified_count(), 3);
    assert_eq!(stats.decisions_by_rule["agreement"], 3);
    assert!(!stats.budget_exhausted);
}

#[test]
fn test_one_way_links_carry_messages() {
    let topology = TopologyConfig::from_file(fixture("directed.toml")).unwrap();
    let mut env = Environment::from_topology(&topology).unwrap();

    let stats = env
        .run_simulation(&fixtures::single_topic_seed(), &[id("a")])
        .unwrap();

    assert_eq!(stats.notified_agents, vec![id("a"), id("b"), id("c")]);
    assert_eq!(stats.messages_sent, 2);

    // c never lists b, yet it still builds a hypothesis about what b says
    let c = &env.last_run_agents().unwrap()[&id("c")];
    let about_b = c.hypothesis(&id("b")).unwrap();
    assert_eq!(about_b.beliefs_as_map()[&FIXTURE_TOPIC.id()], 2);
}

#[test]
fn test_sink_behind_one_way_link() {
    let agents = vec![
        Agent::new("a").with_belief(FIXTURE_TOPIC.id(), 2).with_neighbor("b"),
        Agent::new("b").with_belief(FIXTURE_TOPIC.id(), 2),
    ];
    let mut env = Environment::new(agents, EngineConfig::default()).unwrap();

    let stats = env
        .run_simulation(&fixtures::single_topic_seed(), &[id("a")])
        .unwrap();

    assert_eq!(stats.notified_agents, vec![id("a"), id("b")]);
    assert_eq!(stats.deliveries, 2);
    // b has nobody to forward to, the in-only sender a included
    assert_eq!(stats.messages_sent, 1);
}

#[test]
fn test_disagreeing_agent_stops_the_message() {
    let mut agents = shapes::line(&["a", "b", "c", "d"]);
    for agent in agents.iter_mut() {
        agent.beliefs.insert(FIXTURE_TOPIC.id(), 2);
    }
    // c holds the opposite view and suppresses anything it disagrees with
    agents[2].beliefs.insert(FIXTURE_TOPIC.id(), -2);
    agents[2].decision_rules = vec![DecisionRule::Disagreement {
        below_agreement: 0.25,
        min_interest: 1,
    }];

    let mut env = Environment::new(agents, EngineConfig::default()).unwrap();
    let stats = env
        .run_simulation(&fixtures::single_topic_seed(), &[id("a")])
        .unwrap();

    assert_eq!(stats.notified_agents, vec![id("a"), id("b"), id("c")]);
    assert_eq!(stats.suppressed, 1);
    assert!(env.reporter().lines().iter().any(|l| l.contains("c disagrees")));
}

#[test]
fn test_default_rules_withhold_an_opposed_message() {
    let mut agents = shapes::line(&["a", "b", "c"]);
    agents[1].beliefs.insert("t".into(), 2);
    agents[1].beliefs.insert("u".into(), 2);
    let mut env = Environment::new(agents, EngineConfig::default()).unwrap();

    let message = Message::new(5, vec![Belief::new("t", -2), Belief::new("u", -2)])
        .with_source("a")
        .with_destination("b");
    let stats = env.run_from(message).unwrap();

    assert_eq!(stats.decisions_by_rule["disagreement"], 1);
    assert_eq!(stats.suppressed, 1);
    assert_eq!(stats.messages_sent, 0);
    assert_eq!(stats.notified_agents, vec![id("b")]);
}

#[test]
fn test_ring_is_cut_by_delivery_budget() {
    let mut agents = shapes::ring(&["a", "b", "c", "d", "e"]);
    for agent in agents.iter_mut() {
        agent.beliefs.insert(FIXTURE_TOPIC.id(), 2);
    }
    let config = EngineConfig::default().with_max_deliveries(40);
    let mut env = Environment::new(agents, config).unwrap();

    let stats = env
        .run_simulation(&fixtures::single_topic_seed(), &[id("a")])
        .unwrap();

    assert!(stats.budget_exhausted);
    assert_eq!(stats.deliveries, 40);
    assert_eq!(stats.notified_count(), 5);
}

#[test]
fn test_runs_are_deterministic_for_a_seed() {
    let build = || {
        let mut agents = shapes::star("hub", &["w", "x", "y", "z"]);
        for agent in agents.iter_mut() {
            agent.decision_rules = vec![DecisionRule::random()];
        }
        Environment::new(agents, EngineConfig::default().with_seed(1234)).unwrap()
    };

    let seed = fixtures::mixed_seed();
    let first = build().run_simulation(&seed, &[id("hub")]).unwrap();

    let mut env = build();
    let second = env.run_simulation(&seed, &[id("hub")]).unwrap();
    let third = env.run_simulation(&seed, &[id("hub")]).unwrap();

    assert_eq!(first.notified_agents, second.notified_agents);
    assert_eq!(first.decisions_by_rule, second.decisions_by_rule);
    assert_eq!(second.notified_agents, third.notified_agents);
    assert_ne!(first.run_id, second.run_id);
}

#[test]
fn test_unsettled_revision_is_an_error() {
    let agents = vec![
        Agent::new("a")
            .with_belief(FIXTURE_TOPIC.id(), 0)
            .with_belief_rules(vec![
                BeliefRule::Conform { min_agreement: 0.0 },
                BeliefRule::Entrench { max_agreement: 1.0 },
            ]),
    ];
    let config = EngineConfig::default().with_max_revision_passes(8);
    let mut env = Environment::new(agents, config).unwrap();

    let err = env
        .run_simulation(&fixtures::single_topic_seed(), &[id("a")])
        .unwrap_err();
    assert_eq!(err, EngineError::NonTerminationRisk { agent: id("a"), passes: 8 });
    assert!(env.last_run_agents().is_none());
}

#[test]
fn test_malformed_seed_is_rejected_before_delivery() {
    let mut env = Environment::new(shapes::line(&["a", "b"]), EngineConfig::default()).unwrap();

    let err = env
        .run_simulation(&fixtures::malformed_message(), &[id("a")])
        .unwrap_err();
    assert!(matches!(err, EngineError::InvariantViolation(_)));
    assert!(env.reporter().notified_agents().is_empty());
}

#[test]
fn test_topology_errors_surface_at_setup() {
    let err = Environment::new(
        vec![Agent::new("a").with_neighbor("nobody")],
        EngineConfig::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        EngineError::Configuration(ConfigurationError::UnknownNeighbor {
            agent: id("a"),
            neighbor: id("nobody"),
        })
    );

    let err = Environment::new(shapes::line(&["a"]), EngineConfig::default().with_max_deliveries(0))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Configuration(ConfigurationError::InvalidValue { field: "max_deliveries", .. })
    ));
}

#[test]
fn test_empty_message_relies_on_random_rule() {
    let mut agents = shapes::line(&["a", "b"]);
    for agent in agents.iter_mut() {
        agent.decision_rules = vec![DecisionRule::agreement(), DecisionRule::Random { probability: 1.0 }];
    }
    let mut env = Environment::new(agents, EngineConfig::default()).unwrap();

    let stats = env.run_simulation(&fixtures::empty_message(), &[id("a")]).unwrap();

    assert_eq!(stats.notified_count(), 2);
    assert_eq!(stats.decisions_by_rule["random"], 2);
    assert!(env.reporter().agreeing_agents().is_empty());
}

#[test]
fn test_adopt_spreads_new_topics() {
    let mut agents = shapes::line(&["a", "b"]);
    agents[1].belief_rules = vec![BeliefRule::adopt()];
    agents[1].beliefs.insert(FIXTURE_TOPIC.id(), 1);
    let mut env = Environment::new(agents, EngineConfig::default()).unwrap();

    let seed = Message::new(
        5,
        vec![Belief::new(FIXTURE_TOPIC.id(), 1), Belief::new("Pets", 2)],
    );
    env.run_simulation(&seed, &[id("b")]).unwrap();

    let b = &env.last_run_agents().unwrap()[&id("b")];
    assert_eq!(b.opinion(&"Pets".into()), Some(2));
    // Pristine copy is untouched
    assert_eq!(env.agent(&id("b")).unwrap().opinion(&"Pets".into()), None);
}
