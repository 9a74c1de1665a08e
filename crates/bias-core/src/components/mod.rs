//! Simulation data: agents and the population that owns them.

pub mod agent;
pub mod population;

pub use agent::{Agent, Edge, Opinion, NEIGHBORS_PER_SIDE};
pub use population::Population;
