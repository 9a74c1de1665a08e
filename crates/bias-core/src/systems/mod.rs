//! Per-step systems: tension measurement and bias diffusion.

pub mod bias;
pub mod tension;

pub use bias::{apply_bias, diffuse_bias, BiasRule, ConfidencePolicy};
pub use tension::{
    compute_anchors, compute_conflict, compute_diversity, measure_tension, ConflictMeasure,
    StepClock, StructuralSignals, TensionModel, TensionParams,
};
