use crate::catalog::Dimension;
use crate::validation::ResponseSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Consistency classification of a dimension's paired responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyLevel {
    /// |consistency| <= 0.1
    VeryGood,
    /// 0.1 < |consistency| <= 0.5
    Good,
    /// |consistency| > 0.5
    Inconsistent,
}

impl ConsistencyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ConsistencyLevel::VeryGood => "very_good",
            ConsistencyLevel::Good => "good",
            ConsistencyLevel::Inconsistent => "inconsistent",
        }
    }
}

/// Result for a single dimension pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionResult {
    /// Dimension, serialized as its English key
    pub dimension_key: Dimension,
    /// Localized dimension label
    pub dimension_label: String,
    /// Localized text of the positive-framed question
    pub question_a: String,
    /// Localized text of the negative-framed question
    pub question_b: String,
    /// Raw response to question A (-2 to +2)
    pub response_a: i8,
    /// Raw response to question B (-2 to +2)
    pub response_b: i8,
    /// Dimension score (-1.0 to +1.0)
    pub score: f64,
    /// Signed consistency (-1.0 to +1.0)
    pub consistency: f64,
    /// Classification of the consistency
    pub consistency_level: ConsistencyLevel,
}

/// Complete result of one SHS evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Mean of the five dimension scores
    pub overall_score: f64,
    /// Mean of the five signed dimension consistencies
    pub overall_consistency: f64,
    /// Dimension results in catalog order
    pub dimensions: Vec<DimensionResult>,
    /// Copy of the validated responses
    pub responses: ResponseSet,
}

impl EvaluationResult {
    /// First dimension result matching the given dimension
    pub fn dimension(&self, dimension: Dimension) -> Option<&DimensionResult> {
        self.dimensions.iter().find(|d| d.dimension_key == dimension)
    }
}

/// A response set that failed to evaluate within a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchError {
    /// Zero-based position in the batch input
    pub index: usize,
    /// Reason the evaluation failed
    pub message: String,
    /// The offending input, as received
    pub input: Value,
}

/// Results and failures of a batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Successful evaluations, in input order
    pub results: Vec<EvaluationResult>,
    /// Failed items, in input order
    pub errors: Vec<BatchError>,
}

/// Summary of overall scores across a batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation
    pub std: f64,
}

/// Summary of absolute overall consistencies across a batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencySummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Per-dimension statistics across a batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionStatistics {
    pub mean_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    /// Mean of absolute consistencies
    pub mean_consistency: f64,
}

/// Statistics calculated across multiple results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStatistics {
    /// Number of evaluations summarized
    pub n_evaluations: usize,
    /// Overall score summary, absent for an empty batch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<ScoreSummary>,
    /// Overall consistency summary, absent for an empty batch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_consistency: Option<ConsistencySummary>,
    /// Per-dimension statistics keyed by dimension, in catalog order
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dimensions: BTreeMap<Dimension, DimensionStatistics>,
}

impl BatchStatistics {
    pub fn is_empty(&self) -> bool {
        self.n_evaluations == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_consistency_level_serialization() {
        assert_eq!(
            serde_json::to_value(ConsistencyLevel::VeryGood).unwrap(),
            json!("very_good")
        );
        assert_eq!(
            serde_json::to_value(ConsistencyLevel::Inconsistent).unwrap(),
            json!("inconsistent")
        );
        assert_eq!(ConsistencyLevel::Good.as_str(), "good");
    }

    #[test]
    fn test_empty_statistics_serialization() {
        let stats = BatchStatistics::default();
        assert!(stats.is_empty());
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({ "n_evaluations": 0 })
        );
    }

    #[test]
    fn test_statistics_dimensions_keyed_in_catalog_order() {
        let entry = DimensionStatistics {
            mean_score: 0.5,
            min_score: 0.0,
            max_score: 1.0,
            mean_consistency: 0.1,
        };
        let mut dimensions = BTreeMap::new();
        dimensions.insert(Dimension::ResponsivenessToGuidance, entry);
        dimensions.insert(Dimension::FactualAccuracy, entry);

        let stats = BatchStatistics {
            n_evaluations: 1,
            overall_score: None,
            overall_consistency: None,
            dimensions,
        };

        let json = serde_json::to_string(&stats).unwrap();
        let factual = json.find("Factual Accuracy").unwrap();
        let guidance = json.find("Responsiveness to Guidance").unwrap();
        assert!(factual < guidance);
    }
}
