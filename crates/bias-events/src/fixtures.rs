//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // bias-events = { path = "../bias-events", features = ["test-fixtures"] }
//!
//! use bias_events::fixtures;
//!
//! let snapshot = fixtures::sample_snapshot();
//! let trace = fixtures::sample_trace();
//! ```

use crate::{PopulationSnapshot, TensionSample};

/// Returns a sample snapshot from the fixtures file.
///
/// Contains a 3-agent population after one step, with one rewired
/// forward edge on agent 0.
pub fn sample_snapshot() -> PopulationSnapshot {
    let json = include_str!("../tests/fixtures/sample_snapshot.json");
    serde_json::from_str(json).expect("Failed to parse sample_snapshot.json")
}

/// Returns sample tension samples from the fixtures file.
///
/// Contains 3 consecutive steps starting at step 0.
pub fn sample_trace() -> Vec<TensionSample> {
    let jsonl = include_str!("../tests/fixtures/sample_trace.jsonl");
    jsonl
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            TensionSample::from_jsonl(l).unwrap_or_else(|e| {
                panic!("Failed to parse trace line: {}\nError: {}", l, e)
            })
        })
        .collect()
}
