//! Tension Types
//!
//! One record per driver step, carrying every intermediate of the tension update.

use serde::{Deserialize, Serialize};

/// Coarse label for a tension value, used in logs and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensionBand {
    /// Below 0.33
    Calm,
    /// 0.33 to 0.66
    Uneasy,
    /// Above 0.66
    Strained,
}

impl TensionBand {
    pub fn from_value(tension: f64) -> Self {
        if tension < 0.33 {
            TensionBand::Calm
        } else if tension <= 0.66 {
            TensionBand::Uneasy
        } else {
            TensionBand::Strained
        }
    }
}

/// A single tension update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TensionSample {
    pub step: u64,
    /// Fraction of examined edges counted as disagreeing
    pub conflict: f64,
    /// 4·p·(1−p) over the fraction of opinion-1 agents
    pub diversity: f64,
    /// Fraction of agents with confidence above the anchor threshold
    pub anchors: f64,
    /// Weighted blend of the three structural signals
    pub structural: f64,
    /// Scaled and clamped standard-normal draw
    pub noise: f64,
    /// Unsmoothed tension for this step
    pub instantaneous: f64,
    pub jitter: f64,
    /// Smoothed tension after this step
    pub tension: f64,
}

impl TensionSample {
    pub fn band(&self) -> TensionBand {
        TensionBand::from_value(self.tension)
    }

    /// Parses a sample from a JSONL line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Serializes the sample as a single JSONL line (no trailing newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
