//! # Farm Sustainability - Random Forest scoring of farm observations
//!
//! This library trains a Random Forest regressor that maps eight agronomic
//! measurements of a farm to a sustainability score, and scores single
//! observations with the persisted model.
//!
//! ## Modules
//!
//! - `data` - Farm records, CSV loading, datasets and stratified splitting
//! - `features` - Crop encoding and feature set expansion
//! - `models` - Decision Tree, Random Forest, scaler and metrics
//! - `training` - Training pipeline and report
//! - `artifacts` - Model, scaler and encoder persistence
//! - `predictor` - Argument validation and single-observation scoring
//! - `assessment` - Rating bands and recommendations
//! - `utils` - Configuration and logging

pub mod artifacts;
pub mod assessment;
pub mod data;
pub mod error;
pub mod features;
pub mod models;
pub mod predictor;
pub mod training;
pub mod utils;

pub use artifacts::{ArtifactStore, TrainedArtifacts};
pub use data::{Dataset, FarmRecord, FeatureVector};
pub use error::{Error, Result};
pub use features::FeatureEngine;
pub use models::{DecisionTree, RandomForest, StandardScaler};
pub use predictor::Predictor;
pub use training::Trainer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::artifacts::{ArtifactStore, SustainabilityModel, TrainedArtifacts};
    pub use crate::assessment::{Assessment, Rating};
    pub use crate::data::{Dataset, FarmRecord, FeatureVector, Split};
    pub use crate::error::{Error, Result};
    pub use crate::features::{Feature, FeatureEngine, FeatureSet, LabelEncoder};
    pub use crate::models::{DecisionTree, ForestConfig, RandomForest, StandardScaler, TreeConfig};
    pub use crate::predictor::{format_prediction, parse_features, Predictor};
    pub use crate::training::{Trainer, TrainingOutcome, TrainingReport};
    pub use crate::utils::Config;
}
