//! Random Forest regressor

use super::decision_tree::{DecisionTree, TreeConfig};
use super::metrics;
use crate::data::Dataset;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of features drawn at each split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaxFeatures {
    /// `max(1, floor(sqrt(n_features)))`
    Sqrt,
    /// Every feature
    All,
    /// A fixed count, clamped to the number of features
    Count(usize),
}

impl MaxFeatures {
    pub fn resolve(&self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Count(k) => *k,
        };
        k.clamp(1, n_features.max(1))
    }
}

/// Random Forest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features considered per split
    pub max_features: MaxFeatures,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Random seed
    pub seed: u64,
    /// Out-of-bag score calculation
    pub oob_score: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 200,
            max_depth: 15,
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed: 42,
            oob_score: true,
        }
    }
}

/// Random Forest model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
    feature_names: Vec<String>,
    feature_importances: Vec<f64>,
    oob_score_value: Option<f64>,
}

impl RandomForest {
    /// Create a new random forest
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            feature_names: Vec::new(),
            feature_importances: Vec::new(),
            oob_score_value: None,
        }
    }

    /// Train the random forest
    pub fn fit(&mut self, dataset: &Dataset) {
        self.feature_names = dataset.feature_names.clone();
        let n_features = dataset.n_features();
        let n_samples = dataset.n_samples();
        let max_features = self.config.max_features.resolve(n_features);

        debug!(
            n_trees = self.config.n_trees,
            n_samples,
            n_features,
            max_features,
            "fitting random forest"
        );

        // Build trees in parallel; each tree is seeded by its index so the
        // result does not depend on scheduling
        let config = &self.config;
        let trees: Vec<DecisionTree> = (0..config.n_trees)
            .into_par_iter()
            .map(|i| {
                let tree_seed = config.seed.wrapping_add(i as u64);
                let tree_config = TreeConfig {
                    max_depth: config.max_depth,
                    min_samples_split: config.min_samples_split,
                    min_samples_leaf: config.min_samples_leaf,
                    max_features: Some(max_features),
                    seed: tree_seed,
                };

                let indices = if config.bootstrap {
                    bootstrap_indices(n_samples, tree_seed)
                } else {
                    (0..n_samples).collect()
                };

                let mut tree = DecisionTree::new(tree_config);
                tree.fit_indices(dataset, indices);
                tree
            })
            .collect();

        self.trees = trees;

        // Aggregate feature importances
        self.feature_importances = vec![0.0; n_features];
        for tree in &self.trees {
            for (i, &imp) in tree.feature_importances().iter().enumerate() {
                self.feature_importances[i] += imp;
            }
        }

        // Normalize
        let sum: f64 = self.feature_importances.iter().sum();
        if sum > 0.0 {
            for imp in &mut self.feature_importances {
                *imp /= sum;
            }
        }

        self.oob_score_value = if self.config.oob_score && self.config.bootstrap {
            self.calculate_oob_score(dataset)
        } else {
            None
        };
    }

    /// R² of each training row predicted by the trees that did not see it
    fn calculate_oob_score(&self, dataset: &Dataset) -> Option<f64> {
        let n_samples = dataset.n_samples();

        // Per-tree out-of-bag predictions, accumulated in tree order so the
        // floating point sums are reproducible
        let per_tree: Vec<Vec<(usize, f64)>> = self
            .trees
            .par_iter()
            .enumerate()
            .map(|(tree_idx, tree)| {
                let seed = self.config.seed.wrapping_add(tree_idx as u64);
                let mut in_bag = vec![false; n_samples];
                for i in bootstrap_indices(n_samples, seed) {
                    in_bag[i] = true;
                }

                (0..n_samples)
                    .filter(|&i| !in_bag[i])
                    .map(|i| (i, tree.predict_one(&dataset.features[i])))
                    .collect()
            })
            .collect();

        let mut sums = vec![0.0; n_samples];
        let mut counts = vec![0usize; n_samples];
        for (i, pred) in per_tree.into_iter().flatten() {
            sums[i] += pred;
            counts[i] += 1;
        }

        let (labels, predictions): (Vec<f64>, Vec<f64>) = (0..n_samples)
            .filter(|&i| counts[i] > 0)
            .map(|i| (dataset.labels[i], sums[i] / counts[i] as f64))
            .unzip();

        if labels.is_empty() {
            None
        } else {
            Some(metrics::r2_score(&labels, &predictions))
        }
    }

    /// Predict for a single sample
    pub fn predict_one(&self, features: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }

        self.trees.iter().map(|t| t.predict_one(features)).sum::<f64>() / self.trees.len() as f64
    }

    /// Predict for multiple samples
    pub fn predict(&self, dataset: &Dataset) -> Vec<f64> {
        dataset
            .features
            .par_iter()
            .map(|f| self.predict_one(f))
            .collect()
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Get feature names with importances, sorted by importance
    pub fn feature_importance_ranking(&self) -> Vec<(&str, f64)> {
        let mut ranking: Vec<(&str, f64)> = self
            .feature_names
            .iter()
            .zip(self.feature_importances.iter())
            .map(|(n, &i)| (n.as_str(), i))
            .collect();

        ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranking
    }

    /// Get OOB score
    pub fn oob_score(&self) -> Option<f64> {
        self.oob_score_value
    }

    /// Calculate MSE
    pub fn mse(&self, dataset: &Dataset) -> f64 {
        metrics::mse(&dataset.labels, &self.predict(dataset))
    }

    /// Calculate R² score
    pub fn r2_score(&self, dataset: &Dataset) -> f64 {
        metrics::r2_score(&dataset.labels, &self.predict(dataset))
    }

    /// Number of trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of input columns the forest was fitted on
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }
}

/// Bootstrap sample indices (with replacement) for one tree.
///
/// Uses a separate ChaCha stream from the tree's feature sampling so the two
/// draws are independent even though they share a seed.
fn bootstrap_indices(n: usize, seed: u64) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(1);
    (0..n).map(|_| rng.gen_range(0..n)).collect()
}
