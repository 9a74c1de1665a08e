//! Bias Update Rule
//!
//! Each agent moves toward a neighborhood-weighted opinion whose pull depends
//! on the current tension. All agents read their neighbors' pre-update
//! opinions; new values are committed only after every agent is computed.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{Opinion, Population};

use super::tension::StepClock;

/// What happens to the per-update local confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidencePolicy {
    /// Local confidence is used inside the update and then dropped; stored
    /// confidence keeps whatever value it had.
    #[default]
    Transient,
    /// Local confidence is written back to each agent. Agents agreeing with
    /// their neighborhood get 1.0 and become anchors.
    Persist,
}

/// Bias rule configuration
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BiasRule {
    pub confidence: ConfidencePolicy,
}

/// One agent's computed next state
#[derive(Debug, Clone, Copy, PartialEq)]
struct Update {
    opinion: Opinion,
    confidence: f64,
}

impl BiasRule {
    /// Apply one bias step to the whole population.
    ///
    /// `tension` is used as given; callers keep it in [0, 1].
    pub fn apply(&self, population: &mut Population, tension: f64) {
        let updates = next_opinions(population, tension);

        for (agent, update) in population.agents_mut().iter_mut().zip(updates) {
            agent.opinion = update.opinion;
            if self.confidence == ConfidencePolicy::Persist {
                agent.confidence = update.confidence;
            }
        }
    }
}

/// Apply one bias step with the default rule.
pub fn apply_bias(population: &mut Population, tension: f64) {
    BiasRule::default().apply(population, tension);
}

fn next_opinions(population: &Population, tension: f64) -> Vec<Update> {
    let agents = population.agents();
    let size = agents.len() as f64;
    let b = (0.5 + 0.3 * tension).clamp(0.0, 1.0);
    let similarity_weight = 0.3 + 0.4 * tension;
    let exposure = (20.0 / size) * (1.0 - tension);

    agents
        .iter()
        .map(|agent| {
            let own = agent.opinion() as f64;

            let (sum, count) = agent
                .neighbors()
                .filter_map(|i| agents.get(i))
                .fold((0.0, 0usize), |(sum, count), n| (sum + n.opinion() as f64, count + 1));
            if count == 0 {
                return Update {
                    opinion: agent.opinion(),
                    confidence: agent.confidence(),
                };
            }
            let average = sum / count as f64;

            let confidence = if own == average.round_ties_even() { 1.0 } else { 0.5 };
            let similarity = 1.0 - (own - average).abs();

            let influence_factor = (0.4 * (1.0 - confidence)
                + 0.3 * exposure
                + similarity_weight * (1.0 - similarity))
                .clamp(0.0, 1.0);

            let blended = (1.0 - b) * average + b * own;
            let adjusted = blended * (1.0 - influence_factor);

            Update {
                opinion: adjusted.round_ties_even() as Opinion,
                confidence,
            }
        })
        .collect()
}

/// System: diffuse bias using the tension measured this step
pub fn diffuse_bias(mut population: ResMut<Population>, rule: Res<BiasRule>, clock: Res<StepClock>) {
    rule.apply(&mut population, clock.tension);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::build_population_from;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn wired(opinions: &[u8]) -> Population {
        let mut rng = SmallRng::seed_from_u64(0);
        build_population_from(opinions, 0, &mut rng).0
    }

    #[test]
    fn test_unanimous_zero_is_stable() {
        let mut population = wired(&[0; 30]);
        apply_bias(&mut population, 0.5);
        assert_eq!(population.opinions(), vec![0; 30]);
    }

    #[test]
    fn test_lone_dissenter_flips() {
        let mut opinions = [0u8; 21];
        opinions[10] = 1;
        let mut population = wired(&opinions);
        apply_bias(&mut population, 0.5);
        assert_eq!(population.opinions(), vec![0; 21]);
    }

    #[test]
    fn test_small_unanimous_ones_decay_without_tension() {
        // Exposure is 20/10 at zero tension: influence 0.6 drags 1 down to 0.4
        let mut population = wired(&[1; 10]);
        apply_bias(&mut population, 0.0);
        assert_eq!(population.opinions(), vec![0; 10]);
    }

    #[test]
    fn test_large_population_holds_ones_at_high_tension() {
        // blended = 1, influence = 0.3 * (20/100) * 0.1 = 0.006
        let mut population = wired(&[1; 100]);
        apply_bias(&mut population, 0.9);
        assert_eq!(population.opinions(), vec![1; 100]);
    }

    #[test]
    fn test_update_is_independent_of_agent_order() {
        // Rotating the ring relabels agents; with simultaneous updates the
        // result must rotate the same way.
        let opinions: Vec<u8> = (0..30).map(|i| (i % 4 < 2) as u8).collect();
        let shift = 7;
        let rotated: Vec<u8> = (0..30).map(|i| opinions[(i + shift) % 30]).collect();

        let mut population = wired(&opinions);
        let mut rotated_population = wired(&rotated);
        apply_bias(&mut population, 0.9);
        apply_bias(&mut rotated_population, 0.9);

        let result = population.opinions();
        let expected: Vec<u8> = (0..30).map(|i| result[(i + shift) % 30]).collect();
        assert_eq!(rotated_population.opinions(), expected);
    }

    #[test]
    fn test_transient_confidence_is_not_stored() {
        let mut population = wired(&[0; 25]);
        apply_bias(&mut population, 0.4);
        assert!(population.agents().iter().all(|a| a.confidence() == 0.0));
    }

    #[test]
    fn test_persisted_confidence_creates_anchors() {
        let mut population = wired(&[0; 25]);
        let rule = BiasRule {
            confidence: ConfidencePolicy::Persist,
        };
        rule.apply(&mut population, 0.4);
        assert!(population.agents().iter().all(|a| a.confidence() == 1.0));
        assert_eq!(population.anchor_count(), 25);
    }

    #[test]
    fn test_opinions_stay_binary() {
        let opinions: Vec<u8> = (0..40).map(|i| ((i * 7) % 3 == 0) as u8).collect();
        let mut population = wired(&opinions);
        for step in 0..20 {
            apply_bias(&mut population, (step as f64) / 20.0);
            assert!(population.opinions().iter().all(|&o| o <= 1));
        }
    }

    #[test]
    fn test_empty_population_is_noop() {
        let mut population = Population::default();
        apply_bias(&mut population, 0.5);
        assert!(population.is_empty());
    }
}
