//! Population setup: ring-lattice wiring and random rewires.

pub mod network;

pub use network::{
    build_population, build_population_from, connect, DEFAULT_POPULATION_SIZE, MIN_POPULATION,
};
