//! Raw farm observations and the fixed-order feature vector

use crate::error::{Error, Result};
use crate::features::LabelEncoder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Number of raw agronomic features
pub const N_RAW_FEATURES: usize = 8;

/// Column names of the raw features, in the order the model consumes them
pub const RAW_FEATURE_NAMES: [&str; N_RAW_FEATURES] = [
    "Soil_pH",
    "Soil_Moisture",
    "Temperature_C",
    "Rainfall_mm",
    "Crop_Type",
    "Fertilizer_Usage_kg",
    "Pesticide_Usage_kg",
    "Crop_Yield_ton",
];

/// Name of the target column
pub const TARGET_NAME: &str = "Sustainability_Score";

/// One row of the farm dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmRecord {
    #[serde(rename = "Soil_pH")]
    pub soil_ph: f64,
    #[serde(rename = "Soil_Moisture")]
    pub soil_moisture: f64,
    #[serde(rename = "Temperature_C")]
    pub temperature_c: f64,
    #[serde(rename = "Rainfall_mm")]
    pub rainfall_mm: f64,
    #[serde(rename = "Crop_Type")]
    pub crop_type: String,
    #[serde(rename = "Fertilizer_Usage_kg")]
    pub fertilizer_usage_kg: f64,
    #[serde(rename = "Pesticide_Usage_kg")]
    pub pesticide_usage_kg: f64,
    #[serde(rename = "Crop_Yield_ton")]
    pub crop_yield_ton: f64,
    #[serde(rename = "Sustainability_Score")]
    pub sustainability_score: f64,
}

impl FarmRecord {
    /// Build the raw feature vector, encoding the crop type with `encoder`
    pub fn to_features(&self, encoder: &LabelEncoder) -> Result<FeatureVector> {
        let crop_code = encoder.transform(&self.crop_type)? as f64;

        Ok(FeatureVector([
            self.soil_ph,
            self.soil_moisture,
            self.temperature_c,
            self.rainfall_mm,
            crop_code,
            self.fertilizer_usage_kg,
            self.pesticide_usage_kg,
            self.crop_yield_ton,
        ]))
    }

    fn numeric_fields(&self) -> [(&'static str, f64); 8] {
        [
            ("Soil_pH", self.soil_ph),
            ("Soil_Moisture", self.soil_moisture),
            ("Temperature_C", self.temperature_c),
            ("Rainfall_mm", self.rainfall_mm),
            ("Fertilizer_Usage_kg", self.fertilizer_usage_kg),
            ("Pesticide_Usage_kg", self.pesticide_usage_kg),
            ("Crop_Yield_ton", self.crop_yield_ton),
            (TARGET_NAME, self.sustainability_score),
        ]
    }
}

/// Load all records from a CSV file with a header row.
///
/// Columns are matched by name; extra columns are ignored. A missing column,
/// an unparsable cell or a non-finite number fails the whole load.
pub fn load_records(path: &Path) -> Result<Vec<FarmRecord>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| Error::data_load(path, e))?;

    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<FarmRecord>().enumerate() {
        let record = result.map_err(|e| Error::data_load(path, format!("row {}: {}", row + 1, e)))?;

        if let Some((column, value)) = record
            .numeric_fields()
            .into_iter()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(Error::data_load(
                path,
                format!("row {}: {} is not finite ({})", row + 1, column, value),
            ));
        }

        records.push(record);
    }

    if records.is_empty() {
        return Err(Error::data_load(path, "dataset contains no rows"));
    }

    debug!(rows = records.len(), path = %path.display(), "loaded farm records");
    Ok(records)
}

/// Raw feature vector in the fixed order of [`RAW_FEATURE_NAMES`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; N_RAW_FEATURES]);

impl FeatureVector {
    pub fn soil_ph(&self) -> f64 {
        self.0[0]
    }

    pub fn soil_moisture(&self) -> f64 {
        self.0[1]
    }

    pub fn temperature_c(&self) -> f64 {
        self.0[2]
    }

    pub fn rainfall_mm(&self) -> f64 {
        self.0[3]
    }

    /// Encoded crop type
    pub fn crop_code(&self) -> f64 {
        self.0[4]
    }

    pub fn fertilizer_usage_kg(&self) -> f64 {
        self.0[5]
    }

    pub fn pesticide_usage_kg(&self) -> f64 {
        self.0[6]
    }

    pub fn crop_yield_ton(&self) -> f64 {
        self.0[7]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
