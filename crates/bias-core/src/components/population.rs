//! Population Resource
//!
//! The owned collection of agents. Neighbor references are indices into it.

use bevy_ecs::prelude::*;

use super::agent::{Agent, Opinion};

/// Confidence above which an agent counts as an anchor
pub const ANCHOR_THRESHOLD: f64 = 0.8;

/// All agents of one network build
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Population {
    agents: Vec<Agent>,
}

impl Population {
    /// Unwired population with the given opinions.
    pub fn from_opinions(opinions: &[Opinion]) -> Self {
        Self {
            agents: opinions.iter().map(|&o| Agent::new(o)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn get(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Agent> {
        self.agents.get_mut(index)
    }

    pub(crate) fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn opinions(&self) -> Vec<Opinion> {
        self.agents.iter().map(Agent::opinion).collect()
    }

    pub fn count_ones(&self) -> usize {
        self.agents.iter().filter(|a| a.opinion() == 1).count()
    }

    /// Mean opinion value; 0 for an empty population.
    pub fn fraction_ones(&self) -> f64 {
        if self.agents.is_empty() {
            return 0.0;
        }
        let total: f64 = self.agents.iter().map(|a| a.opinion() as f64).sum();
        total / self.agents.len() as f64
    }

    pub fn anchor_count(&self) -> usize {
        self.agents
            .iter()
            .filter(|a| a.confidence() > ANCHOR_THRESHOLD)
            .count()
    }

    pub fn random_edge_count(&self) -> usize {
        self.agents.iter().map(Agent::random_edge_count).sum()
    }

    /// Total forward plus backward slots over all agents.
    pub fn edge_count(&self) -> usize {
        self.agents.iter().map(Agent::degree).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_opinions() {
        let population = Population::from_opinions(&[0, 1, 1, 0]);
        assert_eq!(population.len(), 4);
        assert_eq!(population.opinions(), vec![0, 1, 1, 0]);
        assert_eq!(population.count_ones(), 2);
        assert_eq!(population.fraction_ones(), 0.5);
        assert_eq!(population.edge_count(), 0);
    }

    #[test]
    fn test_empty_population_guards() {
        let population = Population::default();
        assert!(population.is_empty());
        assert_eq!(population.fraction_ones(), 0.0);
        assert_eq!(population.anchor_count(), 0);
    }

    #[test]
    fn test_anchor_count_is_strictly_above_threshold() {
        let mut population = Population::from_opinions(&[0, 1, 0]);
        population.get_mut(0).unwrap().set_confidence(0.8);
        population.get_mut(1).unwrap().set_confidence(0.81);
        assert_eq!(population.anchor_count(), 1);
    }
}
