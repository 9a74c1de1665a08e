//! Agent Components
//!
//! A single graph node: its opinion, its confidence and its ring-lattice edges.

use serde::{Deserialize, Serialize};

/// Binary opinion value (0 or 1)
pub type Opinion = u8;

/// Forward and backward slots per agent
pub const NEIGHBORS_PER_SIDE: usize = 10;

/// One forward edge slot
///
/// `is_random` marks slots overwritten by the rewiring step. Keeping the flag
/// beside the target means the two can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Index of the neighbor in the population
    pub neighbor: usize,
    pub is_random: bool,
}

impl Edge {
    pub fn structural(neighbor: usize) -> Self {
        Self { neighbor, is_random: false }
    }

    pub fn random(neighbor: usize) -> Self {
        Self { neighbor, is_random: true }
    }
}

/// A simulated individual
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub(crate) opinion: Opinion,
    pub(crate) confidence: f64,
    pub(crate) forward: Vec<Edge>,
    pub(crate) backward: Vec<usize>,
}

impl Agent {
    /// Create an unwired agent holding `opinion`.
    pub fn new(opinion: Opinion) -> Self {
        Self {
            opinion,
            confidence: 0.0,
            forward: Vec::with_capacity(NEIGHBORS_PER_SIDE),
            backward: Vec::with_capacity(NEIGHBORS_PER_SIDE),
        }
    }

    pub fn opinion(&self) -> Opinion {
        self.opinion
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Overwrite the stored confidence (anchors are agents above 0.8).
    pub fn set_confidence(&mut self, confidence: f64) {
        self.confidence = confidence;
    }

    pub fn forward_edges(&self) -> &[Edge] {
        &self.forward
    }

    /// Forward neighbors paired with their rewire flag.
    pub fn forward_edges_with_flags(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.forward.iter().map(|e| (e.neighbor, e.is_random))
    }

    pub fn backward_edges(&self) -> &[usize] {
        &self.backward
    }

    /// All neighbor slots, forward first. Duplicates are kept.
    pub fn neighbors(&self) -> impl Iterator<Item = usize> + '_ {
        self.forward
            .iter()
            .map(|e| e.neighbor)
            .chain(self.backward.iter().copied())
    }

    pub fn degree(&self) -> usize {
        self.forward.len() + self.backward.len()
    }

    pub fn random_edge_count(&self) -> usize {
        self.forward.iter().filter(|e| e.is_random).count()
    }

    pub(crate) fn clear_edges(&mut self) {
        self.forward.clear();
        self.backward.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_agent_is_unwired() {
        let agent = Agent::new(1);
        assert_eq!(agent.opinion(), 1);
        assert_eq!(agent.confidence(), 0.0);
        assert_eq!(agent.degree(), 0);
    }

    #[test]
    fn test_neighbors_forward_then_backward() {
        let mut agent = Agent::new(0);
        agent.forward = vec![Edge::structural(1), Edge::random(4)];
        agent.backward = vec![3, 3];

        let neighbors: Vec<usize> = agent.neighbors().collect();
        assert_eq!(neighbors, vec![1, 4, 3, 3]);
        assert_eq!(agent.random_edge_count(), 1);

        let flags: Vec<(usize, bool)> = agent.forward_edges_with_flags().collect();
        assert_eq!(flags, vec![(1, false), (4, true)]);
    }

    #[test]
    fn test_clear_edges_keeps_opinion() {
        let mut agent = Agent::new(1);
        agent.forward.push(Edge::structural(2));
        agent.backward.push(2);
        agent.clear_edges();
        assert_eq!(agent.degree(), 0);
        assert_eq!(agent.opinion(), 1);
    }
}
