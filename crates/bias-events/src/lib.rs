//! Shared snapshot and trace types for the bias simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! The visualization side only ever reads these.

pub mod snapshot;
pub mod tension;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export snapshot types
pub use snapshot::{
    generate_snapshot_id, AgentSnapshot, EdgeSnapshot, PopulationMetrics, PopulationSnapshot,
};

// Re-export tension types
pub use tension::{TensionBand, TensionSample};
