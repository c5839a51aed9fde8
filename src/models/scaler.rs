//! Feature standardization

use crate::error::{Error, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Standard scaler for normalizing data to zero mean and unit variance.
///
/// Statistics use the population variance. A feature with zero variance keeps
/// a scale of 1, so it is only centred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean of each feature
    mean: Array1<f64>,
    /// Standard deviation of each feature (1.0 where the feature is constant)
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Fit the scaler to data
    pub fn fit(data: &Array2<f64>) -> Result<Self> {
        let mean = data.mean_axis(Axis(0)).ok_or_else(|| {
            Error::InsufficientData("cannot fit scaler on an empty matrix".into())
        })?;
        let mut scale = data.std_axis(Axis(0), 0.0);

        for (i, s) in scale.iter_mut().enumerate() {
            if *s < 1e-10 {
                warn!(feature = i, "feature has zero variance, leaving it unscaled");
                *s = 1.0;
            }
        }

        Ok(Self { mean, scale })
    }

    /// Transform data using fitted parameters
    pub fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        if data.ncols() != self.n_features() {
            return Err(Error::Inference(format!(
                "scaler expects {} features, got {}",
                self.n_features(),
                data.ncols()
            )));
        }

        let mut result = data.clone();
        for (i, mut col) in result.columns_mut().into_iter().enumerate() {
            let (mean, scale) = (self.mean[i], self.scale[i]);
            col.mapv_inplace(|v| (v - mean) / scale);
        }
        Ok(result)
    }

    /// Transform a single row
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.n_features() {
            return Err(Error::Inference(format!(
                "scaler expects {} features, got {}",
                self.n_features(),
                row.len()
            )));
        }

        Ok(row
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(v, (m, s))| (v - m) / s)
            .collect())
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }
}
