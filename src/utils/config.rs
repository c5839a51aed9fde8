//! Configuration management
//!
//! Both binaries receive a [`Config`] instead of hard-coded paths. It is read
//! from TOML; every field has a default, so a partial file is enough.

use crate::error::{Error, Result};
use crate::features::FeatureSet;
use crate::models::{ForestConfig, MaxFeatures};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "sustainability.toml";

/// Dataset and artifact locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub dataset: PathBuf,
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub encoder: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("datasets/farm_data.csv"),
            model: PathBuf::from("artifacts/sustainability_model.bin"),
            scaler: PathBuf::from("artifacts/sustainability_scaler.bin"),
            encoder: PathBuf::from("artifacts/crop_encoder.json"),
        }
    }
}

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    pub oob_score: bool,
    pub test_ratio: f64,
    /// Quantile bins of the target used to stratify the split
    pub n_bins: usize,
    pub seed: u64,
    pub feature_set: FeatureSet,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        let forest = ForestConfig::default();
        Self {
            n_trees: forest.n_trees,
            max_depth: forest.max_depth,
            min_samples_split: forest.min_samples_split,
            min_samples_leaf: forest.min_samples_leaf,
            max_features: forest.max_features,
            bootstrap: forest.bootstrap,
            oob_score: forest.oob_score,
            test_ratio: 0.2,
            n_bins: 5,
            seed: forest.seed,
            feature_set: FeatureSet::Raw,
        }
    }
}

impl TrainingConfig {
    /// Forest hyperparameters
    pub fn forest_config(&self) -> ForestConfig {
        ForestConfig {
            n_trees: self.n_trees,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
            bootstrap: self.bootstrap,
            seed: self.seed,
            oob_score: self.oob_score,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive; each binary has its own default when unset
    pub level: Option<String>,
}

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub training: TrainingConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load and validate configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("cannot parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Explicit file if given, else [`DEFAULT_CONFIG_FILE`] if present, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                debug!(file = DEFAULT_CONFIG_FILE, "using config from working directory");
                Self::load(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| Error::persistence(path, e))
    }

    /// Reject settings the trainer cannot work with
    pub fn validate(&self) -> Result<()> {
        let t = &self.training;

        if t.n_trees == 0 {
            return Err(Error::Config("training.n_trees must be at least 1".into()));
        }
        if t.max_depth == 0 {
            return Err(Error::Config("training.max_depth must be at least 1".into()));
        }
        if t.min_samples_split < 2 {
            return Err(Error::Config("training.min_samples_split must be at least 2".into()));
        }
        if t.min_samples_leaf == 0 {
            return Err(Error::Config("training.min_samples_leaf must be at least 1".into()));
        }
        if !(t.test_ratio > 0.0 && t.test_ratio < 1.0) {
            return Err(Error::Config(format!(
                "training.test_ratio must be in (0, 1), got {}",
                t.test_ratio
            )));
        }
        if t.n_bins == 0 {
            return Err(Error::Config("training.n_bins must be at least 1".into()));
        }
        if t.max_features == MaxFeatures::Count(0) {
            return Err(Error::Config("training.max_features count must be at least 1".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.training.n_trees, 200);
        assert_eq!(config.training.max_depth, 15);
        assert_eq!(config.training.min_samples_split, 5);
        assert_eq!(config.training.min_samples_leaf, 2);
        assert_eq!(config.training.max_features, MaxFeatures::Sqrt);
        assert_eq!(config.training.seed, 42);
        assert_eq!(config.training.n_bins, 5);
        assert_eq!(config.training.feature_set, FeatureSet::Raw);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.training.max_features = MaxFeatures::Count(3);
        config.logging.level = Some("debug".to_string());

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [paths]
            model = "out/model.bin"

            [training]
            n_trees = 10
            feature_set = "engineered"
            max_features = "all"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.paths.model, PathBuf::from("out/model.bin"));
        assert_eq!(parsed.paths.scaler, PathsConfig::default().scaler);
        assert_eq!(parsed.training.n_trees, 10);
        assert_eq!(parsed.training.feature_set, FeatureSet::Engineered);
        assert_eq!(parsed.training.max_features, MaxFeatures::All);
        assert_eq!(parsed.training.max_depth, 15);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.training.test_ratio = 1.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.training.n_trees = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.training.min_samples_split = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.paths.dataset = PathBuf::from("data/other.csv");

        config.save(file.path()).unwrap();
        let loaded = Config::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Config::load("no/such/config.toml"),
            Err(Error::Config(_))
        ));
    }
}
