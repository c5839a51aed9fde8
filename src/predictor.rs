//! Single-observation scoring
//!
//! Input validation happens in [`parse_features`] and never touches the
//! artifacts; only a validated [`FeatureVector`] reaches [`Predictor::predict`].

use crate::artifacts::{ArtifactStore, TrainedArtifacts};
use crate::data::{FeatureVector, N_RAW_FEATURES, RAW_FEATURE_NAMES};
use crate::error::{Error, Result};
use crate::features::FeatureEngine;
use tracing::{debug, warn};

/// Parse exactly eight numeric arguments in the fixed feature order
pub fn parse_features<S: AsRef<str>>(args: &[S]) -> Result<FeatureVector> {
    if args.len() != N_RAW_FEATURES {
        return Err(Error::ArgumentCount {
            expected: N_RAW_FEATURES,
            actual: args.len(),
        });
    }

    let mut values = [0.0; N_RAW_FEATURES];
    for (i, arg) in args.iter().enumerate() {
        let raw = arg.as_ref().trim();
        let value: f64 = raw.parse().map_err(|e| {
            Error::ArgumentParse(format!(
                "could not convert '{}' to a number for {}: {}",
                raw, RAW_FEATURE_NAMES[i], e
            ))
        })?;

        if !value.is_finite() {
            return Err(Error::ArgumentParse(format!(
                "{} must be a finite number, got '{}'",
                RAW_FEATURE_NAMES[i], raw
            )));
        }
        values[i] = value;
    }

    Ok(FeatureVector(values))
}

/// Format a score the way the predictor prints it
pub fn format_prediction(score: f64) -> String {
    format!("{:.2}", score)
}

/// Loaded model, scaler and encoder ready to score inputs
pub struct Predictor {
    engine: FeatureEngine,
    artifacts: TrainedArtifacts,
}

impl Predictor {
    pub fn new(artifacts: TrainedArtifacts) -> Self {
        Self {
            engine: FeatureEngine::new(artifacts.model.feature_set),
            artifacts,
        }
    }

    /// Load the artifacts from the store
    pub fn load(store: &ArtifactStore) -> Result<Self> {
        let artifacts = store.load()?;
        debug!(
            feature_set = ?artifacts.model.feature_set,
            n_trees = artifacts.model.forest.n_trees(),
            "artifacts loaded"
        );
        Ok(Self::new(artifacts))
    }

    /// Expand, scale and score one observation
    pub fn predict(&self, input: &FeatureVector) -> Result<f64> {
        if self.crop_name(input).is_none() {
            warn!(
                crop_code = input.crop_code(),
                known = self.artifacts.encoder.len(),
                "crop type code was not seen during training"
            );
        }

        let row = self.engine.expand(input);
        let scaled = self.artifacts.scaler.transform_row(&row)?;

        let forest = &self.artifacts.model.forest;
        if scaled.len() != forest.n_features() {
            return Err(Error::Inference(format!(
                "model expects {} features, got {}",
                forest.n_features(),
                scaled.len()
            )));
        }

        let score = forest.predict_one(&scaled);
        if !score.is_finite() {
            return Err(Error::Inference(format!("model produced a non-finite score ({})", score)));
        }

        Ok(score)
    }

    /// Crop name for the input's encoded crop type, if it is a known code
    pub fn crop_name(&self, input: &FeatureVector) -> Option<&str> {
        self.artifacts.encoder.decode(input.crop_code())
    }
}
