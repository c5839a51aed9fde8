//! Data structures and preprocessing module
//!
//! Provides the farm record schema, the raw feature vector, the ML dataset
//! and stratified splitting.

mod dataset;
mod record;
mod split;

pub use dataset::{Dataset, Split};
pub use record::{
    load_records, FarmRecord, FeatureVector, N_RAW_FEATURES, RAW_FEATURE_NAMES, TARGET_NAME,
};
pub use split::{quantile_bins, stratified_indices};
