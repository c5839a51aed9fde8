//! Regression decision tree (CART, variance reduction)

use crate::data::Dataset;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Decision tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of tree
    pub max_depth: usize,
    /// Minimum samples required to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf node
    pub min_samples_leaf: usize,
    /// Maximum features to consider for split (None = all)
    pub max_features: Option<usize>,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 15,
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: None,
            seed: 42,
        }
    }
}

/// Tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        /// Mean target of the samples that reached this leaf
        value: f64,
        n_samples: usize,
    },
    Split {
        feature_idx: usize,
        /// Samples with `x[feature_idx] <= threshold` go left
        threshold: f64,
        n_samples: usize,
        /// MSE at this node
        impurity: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    pub fn n_samples(&self) -> usize {
        match self {
            TreeNode::Leaf { n_samples, .. } | TreeNode::Split { n_samples, .. } => *n_samples,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Best split found at a node
struct BestSplit {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// Decision Tree model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<TreeNode>,
    feature_names: Vec<String>,
    feature_importances: Vec<f64>,
}

impl DecisionTree {
    /// Create a new decision tree with config
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            feature_names: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    /// Train the decision tree on every row of `dataset`
    pub fn fit(&mut self, dataset: &Dataset) {
        let indices: Vec<usize> = (0..dataset.n_samples()).collect();
        self.fit_indices(dataset, indices);
    }

    /// Train on the given rows; repeated indices act as sample weights
    /// (this is how bootstrap samples are passed in)
    pub fn fit_indices(&mut self, dataset: &Dataset, indices: Vec<usize>) {
        self.feature_names = dataset.feature_names.clone();
        self.feature_importances = vec![0.0; dataset.n_features()];

        if indices.is_empty() {
            self.root = None;
            return;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.root = Some(self.build_tree(dataset, indices, 0, &mut rng));

        // Normalize feature importances
        let sum: f64 = self.feature_importances.iter().sum();
        if sum > 0.0 {
            for imp in &mut self.feature_importances {
                *imp /= sum;
            }
        }
    }

    /// Build tree recursively
    fn build_tree(
        &mut self,
        dataset: &Dataset,
        indices: Vec<usize>,
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let n = indices.len();
        let labels: Vec<f64> = indices.iter().map(|&i| dataset.labels[i]).collect();
        let (mean, impurity) = mean_and_mse(&labels);

        // Check stopping conditions
        if depth >= self.config.max_depth
            || n < self.config.min_samples_split
            || n < 2 * self.config.min_samples_leaf
            || impurity < 1e-12
        {
            return TreeNode::Leaf {
                value: mean,
                n_samples: n,
            };
        }

        let Some(split) = self.find_best_split(dataset, &indices, mean, impurity, rng) else {
            return TreeNode::Leaf {
                value: mean,
                n_samples: n,
            };
        };

        // Weighted impurity decrease
        self.feature_importances[split.feature_idx] += split.gain * n as f64;

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| dataset.features[i][split.feature_idx] <= split.threshold);

        let left = self.build_tree(dataset, left_idx, depth + 1, rng);
        let right = self.build_tree(dataset, right_idx, depth + 1, rng);

        TreeNode::Split {
            feature_idx: split.feature_idx,
            threshold: split.threshold,
            n_samples: n,
            impurity,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Find the best split among a random subset of features.
    ///
    /// Each candidate feature is sorted once and swept left to right with
    /// running sums of the mean-centred targets, so a node costs O(k * n log n).
    fn find_best_split(
        &self,
        dataset: &Dataset,
        indices: &[usize],
        parent_mean: f64,
        parent_impurity: f64,
        rng: &mut ChaCha8Rng,
    ) -> Option<BestSplit> {
        let n_features = dataset.n_features();
        let max_features = self.config.max_features.unwrap_or(n_features).clamp(1, n_features);
        let min_leaf = self.config.min_samples_leaf.max(1);

        // Visit features in random order; constant ones do not count
        // towards max_features
        let mut feature_indices: Vec<usize> = (0..n_features).collect();
        feature_indices.shuffle(rng);
        let mut visited = 0;

        let n = indices.len();
        let n_total = n as f64;
        let centred = |i: usize| dataset.labels[i] - parent_mean;
        let total_sum: f64 = indices.iter().map(|&i| centred(i)).sum();
        let total_sq: f64 = indices.iter().map(|&i| centred(i).powi(2)).sum();

        let mut best: Option<BestSplit> = None;
        let mut order = indices.to_vec();

        for &feature_idx in &feature_indices {
            if visited >= max_features {
                break;
            }

            let value = |i: usize| dataset.features[i][feature_idx];
            order.sort_by(|&a, &b| value(a).total_cmp(&value(b)));

            if value(order[n - 1]) <= value(order[0]) {
                continue;
            }
            visited += 1;

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;

            for k in 0..n - 1 {
                let y = centred(order[k]);
                left_sum += y;
                left_sq += y * y;

                let x = value(order[k]);
                let x_next = value(order[k + 1]);
                if x_next <= x {
                    continue;
                }

                let n_left = k + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let (nl, nr) = (n_left as f64, n_right as f64);
                let sse_left = left_sq - left_sum * left_sum / nl;
                let right_sum = total_sum - left_sum;
                let sse_right = (total_sq - left_sq) - right_sum * right_sum / nr;

                let weighted_impurity = (sse_left + sse_right).max(0.0) / n_total;
                let gain = parent_impurity - weighted_impurity;

                if gain > best.as_ref().map_or(1e-12, |b| b.gain) {
                    let mut threshold = (x + x_next) / 2.0;
                    // Midpoint can round up to x_next for adjacent floats
                    if threshold >= x_next {
                        threshold = x;
                    }
                    best = Some(BestSplit {
                        feature_idx,
                        threshold,
                        gain,
                    });
                }
            }
        }

        best
    }

    /// Predict for a single sample
    pub fn predict_one(&self, features: &[f64]) -> f64 {
        let mut node = match &self.root {
            Some(node) => node,
            None => return 0.0,
        };

        loop {
            match node {
                TreeNode::Leaf { value, .. } => return *value,
                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    node = if features[*feature_idx] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Predict for multiple samples
    pub fn predict(&self, dataset: &Dataset) -> Vec<f64> {
        dataset
            .features
            .iter()
            .map(|f| self.predict_one(f))
            .collect()
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |r| r.depth())
    }
}

/// Mean and mean squared deviation (two-pass, so a constant target gives exactly 0)
fn mean_and_mse(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let mse = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, mse)
}
