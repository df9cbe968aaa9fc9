//! rumor-search
//!
//! Loads a topology, runs the genetic search for the seed message that
//! reaches the most agents, and prints the outcome as JSON.

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use rumor_engine::{Environment, EventLogger, PropagationReport, TopologyConfig};
use rumor_search::{
    genetic_algorithm, genetic_algorithm_concurrent, PropagationEvaluator, SearchConfig,
    SearchError, SearchOutcome,
};
use rumor_types::AgentId;

/// Command line arguments for the search
#[derive(Parser, Debug)]
#[command(name = "rumor-search")]
#[command(about = "Search for the seed message that spreads furthest through a topology")]
struct Args {
    /// Topology file (TOML)
    #[arg(long)]
    topology: PathBuf,

    /// Search configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the search RNG, overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Number of generations, overrides the config file
    #[arg(long)]
    generations: Option<usize>,

    /// Population size, overrides the config file
    #[arg(long)]
    population: Option<usize>,

    /// Write propagation events to this JSONL file (sequential runs only)
    #[arg(long)]
    events: Option<PathBuf>,

    /// Evaluate each generation on parallel blocking tasks
    #[arg(long)]
    concurrent: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    seed: u64,
    generations: usize,
    population_size: usize,
    #[serde(flatten)]
    outcome: &'a SearchOutcome,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), SearchError> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::from_file(path)?,
        None => SearchConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(generations) = args.generations {
        config.generations = generations;
    }
    if let Some(population) = args.population {
        config.population_size = population;
        config.num_parents = config.num_parents.min(population);
    }
    config.validate()?;

    let topology = TopologyConfig::from_file(&args.topology)?;
    let mut environment = Environment::from_topology(&topology)?;
    if let Some(path) = &args.events {
        let logger = EventLogger::new(path)?;
        environment = environment.with_reporter(PropagationReport::new().with_logger(logger));
    }

    let initial_agents = config
        .initial_agents
        .iter()
        .map(|name| AgentId::from(name.as_str()))
        .collect();
    let mut evaluator = PropagationEvaluator::new(environment, initial_agents)?;

    info!(
        topology = %args.topology.display(),
        agents = evaluator.environment().agents().len(),
        seed = config.seed,
        generations = config.generations,
        population = config.population_size,
        concurrent = args.concurrent,
        "starting search"
    );

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let outcome = if args.concurrent {
        genetic_algorithm_concurrent(&config, &evaluator, &mut rng).await?
    } else {
        genetic_algorithm(&config, &mut evaluator, &mut rng)?
    };

    let report = Report {
        seed: config.seed,
        generations: config.generations,
        population_size: config.population_size,
        outcome: &outcome,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
