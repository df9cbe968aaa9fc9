//! Population Setup
//!
//! Topology files, agent registration and canned shapes.

pub mod shapes;
pub mod topology;

pub use topology::{register_agents, AgentSpec, TopologyConfig, TopologyError};
