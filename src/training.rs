//! Training pipeline
//!
//! records -> features -> stratified split -> scaler (train rows only)
//! -> random forest -> report

use crate::artifacts::{SustainabilityModel, TrainedArtifacts};
use crate::data::{load_records, FarmRecord};
use crate::error::Result;
use crate::features::FeatureEngine;
use crate::models::{RandomForest, StandardScaler};
use crate::utils::Config;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Diagnostics produced by a training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub train_r2: f64,
    pub test_r2: f64,
    pub train_mse: f64,
    pub test_mse: f64,
    pub oob_r2: Option<f64>,
    /// Feature importances, most important first
    pub importances: Vec<(String, f64)>,
    pub target_range: (f64, f64),
    pub elapsed: Duration,
}

/// Fitted artifacts plus the report that describes them
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifacts: TrainedArtifacts,
    pub report: TrainingReport,
}

/// Runs the training pipeline for one configuration
pub struct Trainer {
    config: Config,
}

impl Trainer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the configured dataset and train on it
    pub fn run(&self) -> Result<TrainingOutcome> {
        let path = &self.config.paths.dataset;
        info!(path = %path.display(), "loading dataset");
        let records = load_records(path)?;
        self.fit_records(&records)
    }

    /// Train on records already in memory
    pub fn fit_records(&self, records: &[FarmRecord]) -> Result<TrainingOutcome> {
        let training = &self.config.training;
        let start = Instant::now();

        let engine = FeatureEngine::new(training.feature_set);
        let (dataset, encoder) = engine.generate(records)?;
        info!(
            rows = dataset.n_samples(),
            features = dataset.n_features(),
            crops = encoder.len(),
            "features generated"
        );

        let split = dataset.stratified_split(training.test_ratio, training.n_bins, training.seed)?;
        debug!(train = split.train.n_samples(), test = split.test.n_samples(), "stratified split");

        let scaler = StandardScaler::fit(&split.train.features_array())?;
        let train = split
            .train
            .with_features_array(&scaler.transform(&split.train.features_array())?)?;
        let test = split
            .test
            .with_features_array(&scaler.transform(&split.test.features_array())?)?;

        info!(n_trees = training.n_trees, "training random forest");
        let mut forest = RandomForest::new(training.forest_config());
        forest.fit(&train);

        let report = TrainingReport {
            n_rows: dataset.n_samples(),
            n_train: train.n_samples(),
            n_test: test.n_samples(),
            train_r2: forest.r2_score(&train),
            test_r2: forest.r2_score(&test),
            train_mse: forest.mse(&train),
            test_mse: forest.mse(&test),
            oob_r2: forest.oob_score(),
            importances: forest
                .feature_importance_ranking()
                .into_iter()
                .map(|(name, imp)| (name.to_string(), imp))
                .collect(),
            // generate() rejects empty input, so the range always exists
            target_range: dataset.label_range().unwrap_or((0.0, 0.0)),
            elapsed: start.elapsed(),
        };

        info!(
            train_r2 = report.train_r2,
            test_r2 = report.test_r2,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "training complete"
        );

        Ok(TrainingOutcome {
            artifacts: TrainedArtifacts {
                model: SustainabilityModel {
                    feature_set: training.feature_set,
                    forest,
                },
                scaler,
                encoder,
            },
            report,
        })
    }
}
