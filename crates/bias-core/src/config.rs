//! Configuration System
//!
//! Loads simulation parameters from tuning.toml so runs can be adjusted
//! without recompiling. Every section is optional and falls back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SimError};
use crate::setup::DEFAULT_POPULATION_SIZE;
use crate::systems::{BiasRule, TensionParams};

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub population: PopulationConfig,
    pub tension: TensionParams,
    pub bias: BiasRule,
    pub run: RunConfig,
}

/// Network build parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Requested agent count; values below 2 are clamped
    pub size: i64,
    /// Forward edges to rewire
    pub random_connections: usize,
    /// Seed for initial opinions and rewiring
    pub seed: u64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 100,
            random_connections: 10,
            seed: 42,
        }
    }
}

/// Run and output parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub iterations: u64,
    /// Steps between snapshots (0 disables periodic snapshots)
    pub snapshot_interval: u64,
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: 1,
            snapshot_interval: 0,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default path, or use defaults if not found
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Self::load_or_default_from(DEFAULT_TUNING_PATH)
    }

    /// Load `path`, falling back to defaults only when the file is missing.
    /// A file that exists but fails to read, parse or validate is an error.
    pub fn load_or_default_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("{} not found. Using defaults.", path.display());
                Ok(Self::default())
            }
            result => result,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tension.validate()
    }
}

/// Read a population size typed by a user.
///
/// Unreadable input falls back to the default size; the builder clamps
/// anything below 2.
pub fn parse_population_size(input: &str) -> i64 {
    input
        .trim()
        .parse()
        .unwrap_or(DEFAULT_POPULATION_SIZE as i64)
}

/// Read an iteration count typed by a user.
pub fn parse_iterations(input: &str) -> Result<u64, SimError> {
    input.trim().parse().map_err(|_| SimError::InvalidIterations {
        input: input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::{ConfidencePolicy, ConflictMeasure};

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.population.size, 100);
        assert_eq!(config.population.random_connections, 10);
        assert_eq!(config.run.iterations, 1);
        assert_eq!(config.tension, TensionParams::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimConfig::from_str(
            r#"
            [population]
            size = 21

            [tension]
            seed = 1
            conflict_measure = "opinion_value"

            [bias]
            confidence = "persist"
            "#,
        )
        .unwrap();

        assert_eq!(config.population.size, 21);
        assert_eq!(config.population.random_connections, 10);
        assert_eq!(config.tension.seed, 1);
        assert_eq!(config.tension.alpha, 0.85);
        assert_eq!(config.tension.conflict_measure, ConflictMeasure::OpinionValue);
        assert_eq!(config.bias.confidence, ConfidencePolicy::Persist);
        assert_eq!(config.run.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn test_invalid_values_fail_fast() {
        let err = SimConfig::from_str("[tension]\nalpha = 3.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "alpha", .. }));

        let err = SimConfig::from_str("[population]\nsize = \"many\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.toml");
        fs::write(&path, "[run]\niterations = 25\nsnapshot_interval = 5\n").unwrap();

        let config = SimConfig::load(&path).unwrap();
        assert_eq!(config.run.iterations, 25);
        assert_eq!(config.run.snapshot_interval, 5);

        assert!(matches!(
            SimConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_parse_population_size() {
        assert_eq!(parse_population_size(" 64 "), 64);
        assert_eq!(parse_population_size("-3"), -3);
        assert_eq!(parse_population_size("lots"), 20);
    }

    #[test]
    fn test_parse_iterations() {
        assert_eq!(parse_iterations("12").unwrap(), 12);
        assert!(matches!(
            parse_iterations("ten"),
            Err(SimError::InvalidIterations { .. })
        ));
        assert!(parse_iterations("-1").is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = SimConfig::load_or_default_from(dir.path().join("tuning.toml")).unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_load_or_default_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.toml");
        fs::write(&path, "[tension]\nalpha = 3.0\n").unwrap();

        let result = SimConfig::load_or_default_from(&path);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "alpha", .. })
        ));
    }

    #[test]
    fn test_load_or_default_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.toml");
        fs::write(&path, "[tension\nalpha = ").unwrap();

        assert!(matches!(
            SimConfig::load_or_default_from(&path),
            Err(ConfigError::Toml(_))
        ));
    }
}
