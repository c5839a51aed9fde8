//! Categorical label encoding for the crop type column

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maps category strings to integer codes.
///
/// Classes are kept sorted, and a class's code is its position in that order.
/// The encoder is persisted next to the model so the predictor and trainer
/// agree on the mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit on the observed categories
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect();

        Self {
            classes: classes.into_iter().collect(),
        }
    }

    /// Code of a known category
    pub fn transform(&self, value: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .map_err(|_| Error::Inference(format!("unknown crop type '{}'", value)))
    }

    /// Category for an integer code
    pub fn inverse(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(|s| s.as_str())
    }

    /// Category for a code supplied as a float, if it is an exact known code
    pub fn decode(&self, code: f64) -> Option<&str> {
        if code.fract() != 0.0 || code < 0.0 {
            return None;
        }
        self.inverse(code as usize)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
