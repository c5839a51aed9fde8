//! Feature engineering module
//!
//! Provides crop-type encoding and the raw/engineered feature sets.

mod encoder;
mod engine;

pub use encoder::LabelEncoder;
pub use engine::{Feature, FeatureEngine, FeatureSet};
