//! Tension Model
//!
//! A smoothed scalar in [0, 1] blending structural measurements of the
//! population with seeded per-step noise.
//!
//! Each step:
//! 1. Measure conflict, diversity and anchor fraction
//! 2. Blend them into a structural composite
//! 3. Draw normal noise from a source seeded by `(seed, step)`
//! 4. Mix noise and structure into an instantaneous value
//! 5. Smooth with exponential memory plus a tiny jitter

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use bias_events::TensionSample;

use crate::components::Population;
use crate::error::ConfigError;

/// Starting tension of every fresh model
pub const INITIAL_TENSION: f64 = 0.5;

/// Half-width of the smoothing jitter
const JITTER: f64 = 1e-4;

/// How an edge is judged to be disagreeing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictMeasure {
    /// Compare the agent's opinion with the neighbor's own edge collection.
    /// An opinion never equals an edge list, so every examined edge counts
    /// and conflict is 1 whenever the population has edges.
    #[default]
    EdgeReference,
    /// Compare the agent's opinion with the neighbor's opinion.
    OpinionValue,
}

/// Tension model configuration, fixed for the lifetime of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TensionParams {
    /// Base seed for the per-step noise source. All 64 bits take part.
    pub seed: u64,
    /// Memory weight (higher = slower swings)
    pub alpha: f64,
    /// Weight of noise against structure
    pub gamma_seed: f64,
    /// Noise amplitude
    pub sigma_noise: f64,
    /// Conflict weight
    pub beta_c: f64,
    /// Diversity weight
    pub beta_d: f64,
    /// Anchor weight
    pub beta_a: f64,
    pub conflict_measure: ConflictMeasure,
}

impl Default for TensionParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            alpha: 0.85,
            gamma_seed: 0.3,
            sigma_noise: 0.2,
            beta_c: 0.5,
            beta_d: 0.4,
            beta_a: 0.1,
            conflict_measure: ConflictMeasure::EdgeReference,
        }
    }
}

impl TensionParams {
    /// Reject values the update cannot work with.
    ///
    /// The beta weights are only required to be finite; they are not
    /// normalized.
    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_interval("alpha", self.alpha)?;
        unit_interval("gamma_seed", self.gamma_seed)?;
        finite("sigma_noise", self.sigma_noise)?;
        if self.sigma_noise < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "sigma_noise",
                value: self.sigma_noise,
                reason: "must be non-negative",
            });
        }
        finite("beta_c", self.beta_c)?;
        finite("beta_d", self.beta_d)?;
        finite("beta_a", self.beta_a)?;
        Ok(())
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must lie in [0, 1]",
        })
    }
}

/// Fraction of examined edges counted as disagreeing; 0 with no edges.
pub fn compute_conflict(population: &Population, measure: ConflictMeasure) -> f64 {
    let agents = population.agents();
    let mut disagreements = 0usize;
    let mut total_edges = 0usize;

    for agent in agents {
        for neighbor in agent.neighbors() {
            total_edges += 1;
            let disagrees = match measure {
                ConflictMeasure::EdgeReference => true,
                ConflictMeasure::OpinionValue => agents
                    .get(neighbor)
                    .is_some_and(|other| other.opinion() != agent.opinion()),
            };
            if disagrees {
                disagreements += 1;
            }
        }
    }

    if total_edges == 0 {
        0.0
    } else {
        disagreements as f64 / total_edges as f64
    }
}

/// 4·p·(1−p) over the fraction of opinion-1 agents; 0 when empty.
pub fn compute_diversity(population: &Population) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    let p = population.fraction_ones();
    4.0 * p * (1.0 - p)
}

/// Fraction of anchor agents; 0 when empty.
pub fn compute_anchors(population: &Population) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    population.anchor_count() as f64 / population.len() as f64
}

/// The three structural measurements of one step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StructuralSignals {
    pub conflict: f64,
    pub diversity: f64,
    pub anchors: f64,
}

impl StructuralSignals {
    pub fn measure(population: &Population, measure: ConflictMeasure) -> Self {
        Self {
            conflict: compute_conflict(population, measure),
            diversity: compute_diversity(population),
            anchors: compute_anchors(population),
        }
    }

    pub fn composite(&self, params: &TensionParams) -> f64 {
        params.beta_c * self.conflict + params.beta_d * self.diversity + params.beta_a * self.anchors
    }
}

/// Stateful tension process, one per run
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TensionModel {
    params: TensionParams,
    tension: f64,
}

impl TensionModel {
    /// Create a model at the neutral starting tension.
    ///
    /// Fails if `params` does not pass [`TensionParams::validate`].
    pub fn new(params: TensionParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self::from_validated(params))
    }

    pub(crate) fn from_validated(params: TensionParams) -> Self {
        Self {
            params,
            tension: INITIAL_TENSION,
        }
    }

    pub fn params(&self) -> &TensionParams {
        &self.params
    }

    /// Current smoothed tension.
    pub fn tension(&self) -> f64 {
        self.tension
    }

    /// Advance one step and return the new tension.
    pub fn update(&mut self, population: &Population, step: u64) -> f64 {
        self.sample(population, step).tension
    }

    /// Advance one step, returning every intermediate of the update.
    pub fn sample(&mut self, population: &Population, step: u64) -> TensionSample {
        let params = &self.params;
        let signals = StructuralSignals::measure(population, params.conflict_measure);
        let structural = signals.composite(params);

        let mut rng = noise_source(params.seed, step);
        let raw: f64 = rng.sample(StandardNormal);
        let noise = (raw * params.sigma_noise).clamp(-1.0, 1.0);

        let instantaneous = (params.gamma_seed * (0.5 + noise / 2.0)
            + (1.0 - params.gamma_seed) * structural)
            .clamp(0.0, 1.0);

        let jitter = rng.gen_range(-JITTER..=JITTER);
        self.tension = (params.alpha * self.tension + (1.0 - params.alpha) * instantaneous + jitter)
            .clamp(0.0, 1.0);

        TensionSample {
            step,
            conflict: signals.conflict,
            diversity: signals.diversity,
            anchors: signals.anchors,
            structural,
            noise,
            instantaneous,
            jitter,
            tension: self.tension,
        }
    }
}

impl Default for TensionModel {
    fn default() -> Self {
        Self::from_validated(TensionParams::default())
    }
}

/// Deterministic random source for one step.
///
/// Seeds below 2^32 give `(seed << 32) ^ step`; rotating instead of shifting
/// keeps the high half of larger seeds. `SmallRng` output is stable for a
/// given platform and rand release only, not across them.
fn noise_source(seed: u64, step: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed.rotate_left(32) ^ step)
}

/// Step index and tension handed from the tension system to the bias system
#[derive(Resource, Debug, Clone, Default)]
pub struct StepClock {
    pub step: u64,
    pub tension: f64,
    pub last_sample: Option<TensionSample>,
}

/// System: update the tension model for the current step
pub fn measure_tension(
    population: Res<Population>,
    mut model: ResMut<TensionModel>,
    mut clock: ResMut<StepClock>,
) {
    let sample = model.sample(&population, clock.step);
    tracing::debug!(
        step = sample.step,
        conflict = sample.conflict,
        diversity = sample.diversity,
        anchors = sample.anchors,
        noise = sample.noise,
        tension = sample.tension,
        "Tension updated"
    );
    clock.tension = sample.tension;
    clock.last_sample = Some(sample);
}
