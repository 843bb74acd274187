use crate::catalog::{Dimension, Language};
use crate::error::ShsError;
use crate::models::{ConsistencyLevel, DimensionResult, EvaluationResult};
use crate::validation::{RawResponses, ResponseSet};

/// Upper bound (inclusive) of |consistency| for [`ConsistencyLevel::VeryGood`]
pub const CONSISTENCY_VERY_GOOD: f64 = 0.1;
/// Upper bound (inclusive) of |consistency| for [`ConsistencyLevel::Good`]
pub const CONSISTENCY_GOOD: f64 = 0.5;

/// Dimension score from a positive/negative response pair.
///
/// `(a - b) / 4`, in [-1.0, +1.0]. Positive values mean low hallucination risk.
pub fn dimension_score(response_a: i8, response_b: i8) -> f64 {
    (f64::from(response_a) - f64::from(response_b)) / 4.0
}

/// Consistency of a response pair.
///
/// `(a + b) / 4`, in [-1.0, +1.0]. Values near zero mean the two answers are
/// logical opposites, which is what a careful respondent gives for an
/// affirmation and its negation.
pub fn consistency(response_a: i8, response_b: i8) -> f64 {
    (f64::from(response_a) + f64::from(response_b)) / 4.0
}

/// Classify a consistency value by its absolute magnitude; boundaries fall in the stricter bucket
pub fn classify_consistency(consistency: f64) -> ConsistencyLevel {
    let magnitude = consistency.abs();
    if magnitude <= CONSISTENCY_VERY_GOOD {
        ConsistencyLevel::VeryGood
    } else if magnitude <= CONSISTENCY_GOOD {
        ConsistencyLevel::Good
    } else {
        ConsistencyLevel::Inconsistent
    }
}

/// Validate a raw response set and score it
pub fn calculate(responses: &RawResponses, language: Language) -> Result<EvaluationResult, ShsError> {
    let responses = ResponseSet::try_from(responses)?;
    Ok(score(responses, language))
}

/// Score the positional form `[q1, ..., q10]`
pub fn calculate_from_list(responses: &[i64], language: Language) -> Result<EvaluationResult, ShsError> {
    let responses = ResponseSet::from_list(responses)?;
    Ok(score(responses, language))
}

/// Score an already validated response set
pub fn score(responses: ResponseSet, language: Language) -> EvaluationResult {
    let dimensions: Vec<DimensionResult> = Dimension::ALL
        .iter()
        .map(|&dimension| score_dimension(&responses, dimension, language))
        .collect();

    let count = dimensions.len() as f64;
    let overall_score = dimensions.iter().map(|d| d.score).sum::<f64>() / count;
    let overall_consistency = dimensions.iter().map(|d| d.consistency).sum::<f64>() / count;

    EvaluationResult {
        overall_score,
        overall_consistency,
        dimensions,
        responses,
    }
}

fn score_dimension(responses: &ResponseSet, dimension: Dimension, language: Language) -> DimensionResult {
    let (question_a, question_b) = dimension.questions();
    let response_a = responses.get(question_a);
    let response_b = responses.get(question_b);
    let consistency = consistency(response_a, response_b);

    DimensionResult {
        dimension_key: dimension,
        dimension_label: dimension.label(language).to_string(),
        question_a: question_a.text(language).to_string(),
        question_b: question_b.text(language).to_string(),
        response_a,
        response_b,
        score: dimension_score(response_a, response_b),
        consistency,
        consistency_level: classify_consistency(consistency),
    }
}

/// Evaluator bound to an output language
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    language: Language,
}

impl Evaluator {
    /// Create a new evaluator
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Evaluate a single raw response set
    pub fn evaluate(&self, responses: &RawResponses) -> Result<EvaluationResult, ShsError> {
        calculate(responses, self.language)
    }

    /// Evaluate the positional list form
    pub fn evaluate_list(&self, responses: &[i64]) -> Result<EvaluationResult, ShsError> {
        calculate_from_list(responses, self.language)
    }
}
