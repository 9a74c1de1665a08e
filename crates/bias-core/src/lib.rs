//! Bias diffusion simulation library.
//!
//! Agents on a ring lattice with random long-range rewires hold a binary
//! opinion. Every step a tension model measures the population and a bias
//! rule moves each agent toward its neighborhood, with tension deciding how
//! strongly agents resist.
//!
//! - [`setup`]: network building
//! - [`systems`]: tension model and bias rule
//! - [`driver`]: the [`Simulation`] that owns a population and runs steps
//! - [`output`]: snapshots, tension traces and run statistics

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod driver;
pub mod error;
pub mod output;
pub mod setup;
pub mod systems;

pub use components::{Agent, Edge, Opinion, Population};
pub use config::{parse_iterations, parse_population_size, SimConfig};
pub use driver::{run, RunSummary, Simulation};
pub use error::{ConfigError, SimError};
pub use setup::{build_population, build_population_from, connect};
pub use systems::{apply_bias, BiasRule, ConfidencePolicy, ConflictMeasure, TensionModel, TensionParams};

/// Seeded random number generator resource used for network builds
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
