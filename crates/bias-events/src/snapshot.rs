//! Snapshot Types
//!
//! Serialization structs for population snapshots.
//!
//! A snapshot captures everything a renderer needs after a driver step:
//! each agent's opinion, its forward edges (with the random-rewire flag)
//! and its backward edges.

use serde::{Deserialize, Serialize};

/// Generates a snapshot ID with the given step number.
pub fn generate_snapshot_id(step: u64) -> String {
    format!("snap_{:06}", step)
}

/// A single forward edge slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub target: usize,
    #[serde(default)]
    pub is_random: bool,
}

/// Agent state at snapshot time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub index: usize,
    pub opinion: u8,
    #[serde(default)]
    pub confidence: f64,
    pub forward: Vec<EdgeSnapshot>,
    pub backward: Vec<usize>,
}

impl AgentSnapshot {
    /// Number of forward slots overwritten by a rewire.
    pub fn random_edge_count(&self) -> usize {
        self.forward.iter().filter(|e| e.is_random).count()
    }
}

/// Population-level measurements computed at snapshot time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationMetrics {
    pub size: usize,
    pub ones: usize,
    pub fraction_ones: f64,
    pub diversity: f64,
    pub random_edges: usize,
    pub anchors: usize,
}

/// Complete population snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    pub snapshot_id: String,
    pub step: u64,
    pub triggered_by: String,
    pub tension: f64,
    pub agents: Vec<AgentSnapshot>,
    #[serde(default)]
    pub metrics: PopulationMetrics,
}

impl PopulationSnapshot {
    /// Creates an empty snapshot for the given step.
    pub fn new(step: u64, tension: f64, triggered_by: impl Into<String>) -> Self {
        Self {
            snapshot_id: generate_snapshot_id(step),
            step,
            triggered_by: triggered_by.into(),
            tension,
            agents: Vec::new(),
            metrics: PopulationMetrics::default(),
        }
    }

    /// Opinions in agent order.
    pub fn opinions(&self) -> Vec<u8> {
        self.agents.iter().map(|a| a.opinion).collect()
    }

    /// Looks up an agent by index.
    pub fn agent(&self, index: usize) -> Option<&AgentSnapshot> {
        self.agents.iter().find(|a| a.index == index)
    }
}
