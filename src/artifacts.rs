//! Persisted training artifacts
//!
//! The trainer writes three files and the predictor reads them back:
//! the model and scaler as bincode blobs, the crop encoder as JSON so the
//! category mapping can be inspected by hand. Writes overwrite in place.

use crate::error::{Error, Result};
use crate::features::{FeatureSet, LabelEncoder};
use crate::models::{RandomForest, StandardScaler};
use crate::utils::PathsConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Fitted forest plus the feature set it expects as input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SustainabilityModel {
    pub feature_set: FeatureSet,
    pub forest: RandomForest,
}

/// Everything the predictor needs
#[derive(Debug, Clone)]
pub struct TrainedArtifacts {
    pub model: SustainabilityModel,
    pub scaler: StandardScaler,
    pub encoder: LabelEncoder,
}

impl TrainedArtifacts {
    /// Scaler, forest and feature set must agree on the number of columns
    pub fn check_consistency(&self) -> std::result::Result<(), String> {
        let expected = self.model.feature_set.width();

        if self.model.forest.n_features() != expected {
            return Err(format!(
                "model was fitted on {} features but declares the {:?} set ({} features)",
                self.model.forest.n_features(),
                self.model.feature_set,
                expected
            ));
        }
        if self.scaler.n_features() != expected {
            return Err(format!(
                "scaler has {} features, model expects {}",
                self.scaler.n_features(),
                expected
            ));
        }
        Ok(())
    }
}

/// Locations of the three artifact files
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    model_path: PathBuf,
    scaler_path: PathBuf,
    encoder_path: PathBuf,
}

impl ArtifactStore {
    pub fn new(paths: &PathsConfig) -> Self {
        Self {
            model_path: paths.model.clone(),
            scaler_path: paths.scaler.clone(),
            encoder_path: paths.encoder.clone(),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn scaler_path(&self) -> &Path {
        &self.scaler_path
    }

    pub fn encoder_path(&self) -> &Path {
        &self.encoder_path
    }

    /// Write all artifacts, creating parent directories as needed
    pub fn save(&self, artifacts: &TrainedArtifacts) -> Result<()> {
        write_bincode(&self.model_path, &artifacts.model)?;
        info!(path = %self.model_path.display(), "model saved");

        write_bincode(&self.scaler_path, &artifacts.scaler)?;
        info!(path = %self.scaler_path.display(), "scaler saved");

        let mut writer = BufWriter::new(create_file(&self.encoder_path)?);
        serde_json::to_writer_pretty(&mut writer, &artifacts.encoder)
            .map_err(|e| Error::persistence(&self.encoder_path, e))?;
        writer
            .flush()
            .map_err(|e| Error::persistence(&self.encoder_path, e))?;
        info!(path = %self.encoder_path.display(), "encoder saved");

        Ok(())
    }

    /// Read all artifacts and check they describe the same feature layout
    pub fn load(&self) -> Result<TrainedArtifacts> {
        let scaler: StandardScaler = read_bincode(&self.scaler_path)?;
        let model: SustainabilityModel = read_bincode(&self.model_path)?;

        let file = File::open(&self.encoder_path)
            .map_err(|e| Error::artifact_load(&self.encoder_path, e))?;
        let encoder: LabelEncoder = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::artifact_load(&self.encoder_path, e))?;

        let artifacts = TrainedArtifacts {
            model,
            scaler,
            encoder,
        };
        artifacts
            .check_consistency()
            .map_err(|reason| Error::artifact_load(&self.model_path, reason))?;

        Ok(artifacts)
    }
}

fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::persistence(path, e))?;
    }
    File::create(path).map_err(|e| Error::persistence(path, e))
}

fn write_bincode<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(create_file(path)?);
    bincode::serialize_into(&mut writer, value).map_err(|e| Error::persistence(path, e))?;
    writer.flush().map_err(|e| Error::persistence(path, e))
}

fn read_bincode<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| Error::artifact_load(path, e))?;
    bincode::deserialize_from(BufReader::new(file)).map_err(|e| Error::artifact_load(path, e))
}
