//! Rating bands and agronomic recommendations for a scored farm

use crate::data::FeatureVector;
use std::fmt;

/// Qualitative band of a sustainability score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Excellent,
    VeryGood,
    Good,
    Fair,
    NeedsImprovement,
}

impl Rating {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Rating::Excellent
        } else if score >= 80.0 {
            Rating::VeryGood
        } else if score >= 70.0 {
            Rating::Good
        } else if score >= 60.0 {
            Rating::Fair
        } else {
            Rating::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::VeryGood => "Very Good",
            Rating::Good => "Good",
            Rating::Fair => "Fair",
            Rating::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Agronomic rules checked against the raw inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    AdjustSoilPh,
    ImproveIrrigation,
    ReduceFertilizer,
    IntegratedPestManagement,
    ImproveYield,
}

impl Recommendation {
    const ALL: [Recommendation; 5] = [
        Recommendation::AdjustSoilPh,
        Recommendation::ImproveIrrigation,
        Recommendation::ReduceFertilizer,
        Recommendation::IntegratedPestManagement,
        Recommendation::ImproveYield,
    ];

    fn applies(&self, input: &FeatureVector) -> bool {
        match self {
            Recommendation::AdjustSoilPh => input.soil_ph() < 6.0 || input.soil_ph() > 7.5,
            Recommendation::ImproveIrrigation => input.soil_moisture() < 30.0,
            Recommendation::ReduceFertilizer => input.fertilizer_usage_kg() > 70.0,
            Recommendation::IntegratedPestManagement => input.pesticide_usage_kg() > 50.0,
            Recommendation::ImproveYield => input.crop_yield_ton() < 50.0,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::AdjustSoilPh => "Consider soil pH adjustment for optimal crop growth",
            Recommendation::ImproveIrrigation => {
                "Implement better irrigation practices to maintain soil moisture"
            }
            Recommendation::ReduceFertilizer => {
                "Consider reducing chemical fertilizer usage and adopt organic alternatives"
            }
            Recommendation::IntegratedPestManagement => {
                "Look into integrated pest management and organic pest control"
            }
            Recommendation::ImproveYield => {
                "Consider crop rotation and soil enrichment to improve yield"
            }
        }
    }
}

/// Rating plus the recommendations that apply to one observation
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub score: f64,
    pub rating: Rating,
    pub recommendations: Vec<Recommendation>,
}

impl Assessment {
    pub fn new(score: f64, input: &FeatureVector) -> Self {
        Self {
            score,
            rating: Rating::from_score(score),
            recommendations: Recommendation::ALL
                .into_iter()
                .filter(|r| r.applies(input))
                .collect(),
        }
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rating: {}", self.rating)?;
        if self.recommendations.is_empty() {
            return writeln!(f, "No recommendations");
        }
        writeln!(f, "Recommendations:")?;
        for rec in &self.recommendations {
            writeln!(f, "  - {}", rec.message())?;
        }
        Ok(())
    }
}
