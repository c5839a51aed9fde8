//! Dataset structure for machine learning

use super::split::{quantile_bins, stratified_indices};
use crate::error::{Error, Result};
use ndarray::Array2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Dataset for machine learning with features and labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Feature matrix (n_samples x n_features)
    pub features: Vec<Vec<f64>>,
    /// Target labels
    pub labels: Vec<f64>,
    /// Feature names
    pub feature_names: Vec<String>,
}

/// Train/test split result
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

impl Dataset {
    /// Create a new empty dataset
    pub fn new(feature_names: Vec<String>) -> Self {
        Self {
            features: Vec::new(),
            labels: Vec::new(),
            feature_names,
        }
    }

    /// Number of samples
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    /// Number of features
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Add a sample
    pub fn add_sample(&mut self, features: Vec<f64>, label: f64) {
        assert_eq!(features.len(), self.feature_names.len());
        self.features.push(features);
        self.labels.push(label);
    }

    /// Get feature matrix as ndarray
    pub fn features_array(&self) -> Array2<f64> {
        let n_samples = self.n_samples();
        let n_features = self.n_features();

        if n_samples == 0 {
            return Array2::zeros((0, n_features));
        }

        Array2::from_shape_fn((n_samples, n_features), |(i, j)| self.features[i][j])
    }

    /// Same labels and names with a replaced feature matrix (e.g. after scaling)
    pub fn with_features_array(&self, features: &Array2<f64>) -> Result<Dataset> {
        if features.nrows() != self.n_samples() || features.ncols() != self.n_features() {
            return Err(Error::Inference(format!(
                "feature matrix shape {:?} does not match dataset ({}, {})",
                features.shape(),
                self.n_samples(),
                self.n_features()
            )));
        }

        Ok(Dataset {
            features: features.rows().into_iter().map(|row| row.to_vec()).collect(),
            labels: self.labels.clone(),
            feature_names: self.feature_names.clone(),
        })
    }

    /// Split into train and test sets, stratified on quantile bins of the labels.
    ///
    /// The test partition holds `ceil(test_ratio * n)` rows (at least one,
    /// leaving at least one for training).
    pub fn stratified_split(&self, test_ratio: f64, n_bins: usize, seed: u64) -> Result<Split> {
        let n = self.n_samples();
        if n < 2 {
            return Err(Error::InsufficientData(format!(
                "need at least 2 rows to split, got {}",
                n
            )));
        }

        let bins = quantile_bins(&self.labels, n_bins);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (train_indices, test_indices) = stratified_indices(&bins, test_ratio, &mut rng);

        Ok(Split {
            train: self.subset(&train_indices),
            test: self.subset(&test_indices),
        })
    }

    /// Create a subset of the dataset by indices
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            feature_names: self.feature_names.clone(),
        }
    }

    /// Minimum and maximum label
    pub fn label_range(&self) -> Option<(f64, f64)> {
        if self.labels.is_empty() {
            return None;
        }
        let min = self.labels.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self.labels.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_dataset(n: usize) -> Dataset {
        let mut dataset = Dataset::new(vec!["f1".to_string(), "f2".to_string()]);
        for i in 0..n {
            dataset.add_sample(vec![i as f64, (i * 2) as f64], i as f64 * 0.5);
        }
        dataset
    }

    #[test]
    fn test_dataset_operations() {
        let dataset = linear_dataset(3);

        assert_eq!(dataset.n_samples(), 3);
        assert_eq!(dataset.n_features(), 2);
        assert_eq!(dataset.features_array().shape(), &[3, 2]);
        assert_eq!(dataset.label_range(), Some((0.0, 1.0)));
    }

    #[test]
    fn test_stratified_split_sizes() {
        let dataset = linear_dataset(100);
        let split = dataset.stratified_split(0.2, 5, 42).unwrap();

        assert_eq!(split.train.n_samples(), 80);
        assert_eq!(split.test.n_samples(), 20);

        // Every quintile of the target contributes four test rows
        for bin in 0..5 {
            let lo = bin as f64 * 10.0;
            let hi = lo + 10.0;
            let count = split
                .test
                .labels
                .iter()
                .filter(|&&y| y >= lo && y < hi)
                .count();
            assert_eq!(count, 4, "bin {}", bin);
        }
    }

    #[test]
    fn test_stratified_split_is_seeded() {
        let dataset = linear_dataset(50);
        let a = dataset.stratified_split(0.2, 5, 7).unwrap();
        let b = dataset.stratified_split(0.2, 5, 7).unwrap();
        assert_eq!(a.test.labels, b.test.labels);
        assert_eq!(a.train.labels, b.train.labels);
    }

    #[test]
    fn test_stratified_split_too_small() {
        let dataset = linear_dataset(1);
        assert!(matches!(
            dataset.stratified_split(0.2, 5, 42),
            Err(Error::InsufficientData(_))
        ));
    }

    #[test]
    fn test_with_features_array_shape_check() {
        let dataset = linear_dataset(4);
        let wrong = Array2::zeros((4, 3));
        assert!(dataset.with_features_array(&wrong).is_err());

        let replaced = dataset.with_features_array(&Array2::ones((4, 2))).unwrap();
        assert_eq!(replaced.features[3], vec![1.0, 1.0]);
        assert_eq!(replaced.labels, dataset.labels);
    }
}
