//! Run Statistics
//!
//! Summarizes how a run moved opinions and tension.

use std::fmt;

use bias_events::{TensionBand, TensionSample};

use crate::components::{Opinion, Population};

/// Summary of one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub iterations: u64,
    pub agents: usize,
    pub initial_fraction_ones: f64,
    pub final_fraction_ones: f64,
    /// Agents whose final opinion differs from their initial one
    pub changed: usize,
    pub min_tension: f64,
    pub max_tension: f64,
    pub mean_tension: f64,
    pub final_tension: f64,
    pub final_band: TensionBand,
}

impl RunStats {
    /// Compare the population against the opinions it started the run with.
    pub fn collect(initial: &[Opinion], population: &Population, samples: &[TensionSample]) -> Self {
        let initial_fraction_ones = if initial.is_empty() {
            0.0
        } else {
            initial.iter().filter(|&&o| o == 1).count() as f64 / initial.len() as f64
        };
        let changed = initial
            .iter()
            .zip(population.agents())
            .filter(|&(&before, agent)| before != agent.opinion())
            .count();

        let tensions = samples.iter().map(|s| s.tension);
        let (min_tension, max_tension, mean_tension, final_tension) = match samples.last() {
            Some(last) => (
                tensions.clone().fold(f64::INFINITY, f64::min),
                tensions.clone().fold(f64::NEG_INFINITY, f64::max),
                tensions.sum::<f64>() / samples.len() as f64,
                last.tension,
            ),
            None => {
                let neutral = crate::systems::tension::INITIAL_TENSION;
                (neutral, neutral, neutral, neutral)
            }
        };

        Self {
            iterations: samples.len() as u64,
            agents: population.len(),
            initial_fraction_ones,
            final_fraction_ones: population.fraction_ones(),
            changed,
            min_tension,
            max_tension,
            mean_tension,
            final_tension,
            final_band: TensionBand::from_value(final_tension),
        }
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Iterations: {}", self.iterations)?;
        writeln!(f, "Agents: {} ({} changed opinion)", self.agents, self.changed)?;
        writeln!(
            f,
            "Opinion 1 share: {:.3} -> {:.3}",
            self.initial_fraction_ones, self.final_fraction_ones
        )?;
        write!(
            f,
            "Tension: final {:.4} ({:?}), range {:.4}..{:.4}, mean {:.4}",
            self.final_tension, self.final_band, self.min_tension, self.max_tension, self.mean_tension
        )
    }
}
