//! Machine learning models module
//!
//! Provides the regression tree, the Random Forest ensemble, the standard
//! scaler and regression metrics.

mod decision_tree;
pub mod metrics;
mod random_forest;
mod scaler;

pub use decision_tree::{DecisionTree, TreeConfig, TreeNode};
pub use random_forest::{ForestConfig, MaxFeatures, RandomForest};
pub use scaler::StandardScaler;
