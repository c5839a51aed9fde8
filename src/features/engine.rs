//! Feature engineering engine

use super::encoder::LabelEncoder;
use crate::data::{Dataset, FarmRecord, FeatureVector};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Features that can be computed from a raw feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    SoilPh,
    SoilMoisture,
    TemperatureC,
    RainfallMm,
    CropType,
    FertilizerUsageKg,
    PesticideUsageKg,
    CropYieldTon,
    /// Soil moisture x fertilizer usage
    WaterFertilizerInteraction,
    /// Temperature x soil moisture
    TemperatureMoistureInteraction,
    SoilPhSquared,
    TemperatureSquared,
}

impl Feature {
    pub fn name(&self) -> &'static str {
        match self {
            Feature::SoilPh => "Soil_pH",
            Feature::SoilMoisture => "Soil_Moisture",
            Feature::TemperatureC => "Temperature_C",
            Feature::RainfallMm => "Rainfall_mm",
            Feature::CropType => "Crop_Type",
            Feature::FertilizerUsageKg => "Fertilizer_Usage_kg",
            Feature::PesticideUsageKg => "Pesticide_Usage_kg",
            Feature::CropYieldTon => "Crop_Yield_ton",
            Feature::WaterFertilizerInteraction => "Water_Fertilizer_Interaction",
            Feature::TemperatureMoistureInteraction => "Temperature_Moisture_Interaction",
            Feature::SoilPhSquared => "Soil_pH_Squared",
            Feature::TemperatureSquared => "Temperature_Squared",
        }
    }

    /// Compute the feature value for one observation
    pub fn compute(&self, raw: &FeatureVector) -> f64 {
        match self {
            Feature::SoilPh => raw.soil_ph(),
            Feature::SoilMoisture => raw.soil_moisture(),
            Feature::TemperatureC => raw.temperature_c(),
            Feature::RainfallMm => raw.rainfall_mm(),
            Feature::CropType => raw.crop_code(),
            Feature::FertilizerUsageKg => raw.fertilizer_usage_kg(),
            Feature::PesticideUsageKg => raw.pesticide_usage_kg(),
            Feature::CropYieldTon => raw.crop_yield_ton(),
            Feature::WaterFertilizerInteraction => raw.soil_moisture() * raw.fertilizer_usage_kg(),
            Feature::TemperatureMoistureInteraction => raw.temperature_c() * raw.soil_moisture(),
            Feature::SoilPhSquared => raw.soil_ph().powi(2),
            Feature::TemperatureSquared => raw.temperature_c().powi(2),
        }
    }
}

const RAW_FEATURES: [Feature; 8] = [
    Feature::SoilPh,
    Feature::SoilMoisture,
    Feature::TemperatureC,
    Feature::RainfallMm,
    Feature::CropType,
    Feature::FertilizerUsageKg,
    Feature::PesticideUsageKg,
    Feature::CropYieldTon,
];

const ENGINEERED_FEATURES: [Feature; 12] = [
    Feature::SoilPh,
    Feature::SoilMoisture,
    Feature::TemperatureC,
    Feature::RainfallMm,
    Feature::CropType,
    Feature::FertilizerUsageKg,
    Feature::PesticideUsageKg,
    Feature::CropYieldTon,
    Feature::WaterFertilizerInteraction,
    Feature::TemperatureMoistureInteraction,
    Feature::SoilPhSquared,
    Feature::TemperatureSquared,
];

/// Which columns the scaler and model are fitted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureSet {
    /// The 8 raw inputs, exactly as the predictor receives them
    #[default]
    Raw,
    /// Raw inputs plus the four interaction and polynomial terms
    Engineered,
}

impl FeatureSet {
    pub fn features(&self) -> &'static [Feature] {
        match self {
            FeatureSet::Raw => &RAW_FEATURES,
            FeatureSet::Engineered => &ENGINEERED_FEATURES,
        }
    }

    pub fn width(&self) -> usize {
        self.features().len()
    }
}

/// Feature engineering engine
#[derive(Debug, Clone, Copy)]
pub struct FeatureEngine {
    feature_set: FeatureSet,
}

impl FeatureEngine {
    /// Create an engine producing the given feature set
    pub fn new(feature_set: FeatureSet) -> Self {
        Self { feature_set }
    }

    pub fn feature_set(&self) -> FeatureSet {
        self.feature_set
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.feature_set
            .features()
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    }

    /// Expand one raw observation into a model row
    pub fn expand(&self, raw: &FeatureVector) -> Vec<f64> {
        self.feature_set
            .features()
            .iter()
            .map(|f| f.compute(raw))
            .collect()
    }

    /// Fit a crop encoder on `records` and generate the training dataset
    pub fn generate(&self, records: &[FarmRecord]) -> Result<(Dataset, LabelEncoder)> {
        if records.is_empty() {
            return Err(Error::InsufficientData("no records to generate features from".into()));
        }

        let encoder = LabelEncoder::fit(records.iter().map(|r| r.crop_type.as_str()));
        let mut dataset = Dataset::new(self.feature_names());

        for record in records {
            let raw = record.to_features(&encoder)?;
            dataset.add_sample(self.expand(&raw), record.sustainability_score);
        }

        Ok((dataset, encoder))
    }
}

impl Default for FeatureEngine {
    fn default() -> Self {
        Self::new(FeatureSet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(crop: &str, score: f64) -> FarmRecord {
        FarmRecord {
            soil_ph: 6.5,
            soil_moisture: 30.0,
            temperature_c: 20.0,
            rainfall_mm: 120.4,
            crop_type: crop.to_string(),
            fertilizer_usage_kg: 45.0,
            pesticide_usage_kg: 3.2,
            crop_yield_ton: 4.8,
            sustainability_score: score,
        }
    }

    #[test]
    fn test_engineered_columns() {
        let raw = FeatureVector([6.5, 30.0, 20.0, 120.4, 0.0, 45.0, 3.2, 4.8]);
        let row = FeatureEngine::new(FeatureSet::Engineered).expand(&raw);

        assert_eq!(row.len(), 12);
        assert_eq!(&row[..8], raw.as_slice());
        assert_eq!(row[8], 30.0 * 45.0);
        assert_eq!(row[9], 20.0 * 30.0);
        assert_eq!(row[10], 6.5 * 6.5);
        assert_eq!(row[11], 400.0);
    }

    #[test]
    fn test_raw_set_is_identity() {
        let raw = FeatureVector([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let engine = FeatureEngine::default();

        assert_eq!(engine.feature_set(), FeatureSet::Raw);
        assert_eq!(engine.expand(&raw), raw.0.to_vec());
        assert_eq!(engine.feature_names(), crate::data::RAW_FEATURE_NAMES.to_vec());
    }

    #[test]
    fn test_generate_dataset() {
        let records = vec![record("Wheat", 72.3), record("Rice", 60.1), record("Wheat", 70.0)];
        let (dataset, encoder) = FeatureEngine::new(FeatureSet::Engineered)
            .generate(&records)
            .unwrap();

        assert_eq!(dataset.n_samples(), 3);
        assert_eq!(dataset.n_features(), 12);
        assert_eq!(dataset.labels, vec![72.3, 60.1, 70.0]);
        assert_eq!(encoder.classes(), &["Rice", "Wheat"]);
        // Crop_Type column carries the encoded value
        assert_eq!(dataset.features[0][4], 1.0);
        assert_eq!(dataset.features[1][4], 0.0);
    }

    #[test]
    fn test_feature_set_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            set: FeatureSet,
        }
        let parsed: Wrapper = toml::from_str("set = \"engineered\"").unwrap();
        assert_eq!(parsed.set, FeatureSet::Engineered);
    }
}
