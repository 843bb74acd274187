use crate::catalog::{Dimension, Language};
use crate::error::ShsError;
use crate::evaluation::Evaluator;
use crate::models::{
    BatchError, BatchOutcome, BatchStatistics, ConsistencySummary, DimensionStatistics,
    EvaluationResult, ScoreSummary,
};
use crate::validation::{RawResponses, responses_from_value};
use rayon::prelude::*;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// An entry of a batch: a response map, or any JSON value read from an input file
pub trait BatchItem: Sync {
    /// The response map to evaluate; fails if the item is not a map
    fn responses(&self) -> Result<Cow<'_, RawResponses>, ShsError>;

    /// The item as it is reported back in a [`BatchError`]
    fn to_value(&self) -> Value;
}

impl BatchItem for RawResponses {
    fn responses(&self) -> Result<Cow<'_, RawResponses>, ShsError> {
        Ok(Cow::Borrowed(self))
    }

    fn to_value(&self) -> Value {
        Value::Object(self.clone().into_iter().collect())
    }
}

impl BatchItem for Value {
    fn responses(&self) -> Result<Cow<'_, RawResponses>, ShsError> {
        responses_from_value(self).map(Cow::Owned)
    }

    fn to_value(&self) -> Value {
        self.clone()
    }
}

/// Runs the scorer over a collection of response sets
#[derive(Debug, Clone, Copy, Default)]
pub struct Runner {
    evaluator: Evaluator,
    parallel: bool,
}

impl Runner {
    /// Create a new sequential runner for the given language
    pub fn new(language: Language) -> Self {
        Self {
            evaluator: Evaluator::new(language),
            parallel: false,
        }
    }

    /// Evaluate items on the rayon thread pool; output order is unchanged
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Evaluate every response set, collecting failures instead of aborting
    pub fn process_batch<T: BatchItem>(&self, responses: &[T]) -> BatchOutcome {
        debug!(
            count = responses.len(),
            parallel = self.parallel,
            language = %self.evaluator.language(),
            "Processing batch"
        );

        let evaluated = self.evaluate_all(responses);
        let outcome = partition_outcomes(responses, evaluated);

        self.log_batch_errors(&outcome.errors);
        info!(
            succeeded = outcome.results.len(),
            failed = outcome.errors.len(),
            "Batch processed"
        );

        outcome
    }

    /// One result per input, in input order
    fn evaluate_all<T: BatchItem>(&self, responses: &[T]) -> Vec<Result<EvaluationResult, ShsError>> {
        let evaluator = self.evaluator;
        let evaluate = |item: &T| item.responses().and_then(|r| evaluator.evaluate(&r));
        if self.parallel {
            responses.par_iter().map(evaluate).collect()
        } else {
            responses.iter().map(evaluate).collect()
        }
    }

    fn log_batch_errors(&self, errors: &[BatchError]) {
        if errors.is_empty() {
            return;
        }

        warn!("{} evaluations failed", errors.len());
        for error in errors {
            warn!(index = error.index, "{}", error.message);
        }
    }
}

fn partition_outcomes<T: BatchItem>(
    responses: &[T],
    evaluated: Vec<Result<EvaluationResult, ShsError>>,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (index, (input, result)) in responses.iter().zip(evaluated).enumerate() {
        match result {
            Ok(result) => outcome.results.push(result),
            Err(e) => outcome.errors.push(BatchError {
                index,
                message: e.to_string(),
                input: input.to_value(),
            }),
        }
    }

    outcome
}

/// Evaluate a batch sequentially in the given language
pub fn process_batch<T: BatchItem>(responses: &[T], language: Language) -> BatchOutcome {
    Runner::new(language).process_batch(responses)
}

/// Aggregate descriptive statistics over a set of evaluation results
pub fn compute_statistics(results: &[EvaluationResult]) -> BatchStatistics {
    if results.is_empty() {
        return BatchStatistics::default();
    }

    let scores: Vec<f64> = results.iter().map(|r| r.overall_score).collect();
    let consistencies: Vec<f64> = results.iter().map(|r| r.overall_consistency.abs()).collect();

    let (score_min, score_max) = calculate_range(&scores);
    let (consistency_min, consistency_max) = calculate_range(&consistencies);

    BatchStatistics {
        n_evaluations: results.len(),
        overall_score: Some(ScoreSummary {
            mean: calculate_mean(&scores),
            min: score_min,
            max: score_max,
            std: calculate_std(&scores),
        }),
        overall_consistency: Some(ConsistencySummary {
            mean: calculate_mean(&consistencies),
            min: consistency_min,
            max: consistency_max,
        }),
        dimensions: calculate_dimension_statistics(results),
    }
}

/// Per-dimension statistics; dimensions with no contributing values are left out
fn calculate_dimension_statistics(results: &[EvaluationResult]) -> BTreeMap<Dimension, DimensionStatistics> {
    let mut dimensions = BTreeMap::new();

    for dimension in Dimension::ALL {
        let (scores, consistencies): (Vec<f64>, Vec<f64>) = results
            .iter()
            .filter_map(|r| r.dimension(dimension))
            .map(|d| (d.score, d.consistency.abs()))
            .unzip();

        if scores.is_empty() {
            continue;
        }

        let (min_score, max_score) = calculate_range(&scores);
        dimensions.insert(
            dimension,
            DimensionStatistics {
                mean_score: calculate_mean(&scores),
                min_score,
                max_score,
                mean_consistency: calculate_mean(&consistencies),
            },
        );
    }

    dimensions
}

/// Calculate mean of values
fn calculate_mean(values: &[f64]) -> f64 {
    let sum: f64 = values.iter().sum();
    sum / values.len() as f64
}

/// Calculate (min, max) of non-empty values
fn calculate_range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| (min.min(v), max.max(v)))
}

/// Population standard deviation (divides by N)
fn calculate_std(values: &[f64]) -> f64 {
    let mean = calculate_mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QuestionId;
    use crate::evaluation::calculate_from_list;
    use crate::models::ConsistencyLevel;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw(values: [i64; 10]) -> RawResponses {
        QuestionId::ALL
            .iter()
            .zip(values)
            .map(|(q, v)| (q.as_str().to_string(), json!(v)))
            .collect()
    }

    fn three_item_batch() -> Vec<RawResponses> {
        let mut invalid = raw([0; 10]);
        invalid.insert("q4".to_string(), json!(3));

        vec![
            raw([2, -2, 2, -2, 2, -2, 2, -2, 2, -2]),
            invalid,
            raw([0; 10]),
        ]
    }

    fn results(lists: &[[i64; 10]]) -> Vec<EvaluationResult> {
        lists
            .iter()
            .map(|l| calculate_from_list(l, Language::En).unwrap())
            .collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_runner_new() {
        let runner = Runner::new(Language::De);
        assert!(!runner.is_parallel());
        assert!(runner.with_parallel(true).is_parallel());
    }

    #[test]
    fn test_process_batch_isolates_failures() {
        let batch = three_item_batch();
        let outcome = process_batch(&batch, Language::En);

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.results[0].overall_score, 1.0);
        assert_eq!(outcome.results[1].overall_score, 0.0);

        let error = &outcome.errors[0];
        assert_eq!(error.index, 1);
        assert_eq!(error.input, batch[1].to_value());
        assert!(error.message.contains("q4"));
    }

    #[test]
    fn test_process_batch_parallel_matches_sequential() {
        let mut batch = three_item_batch();
        for i in 0..50i64 {
            batch.push(raw([i % 5 - 2, 0, 1, -1, 2, (i % 3) - 1, 0, 0, 1, -2]));
        }
        batch.push(RawResponses::new());

        let sequential = Runner::new(Language::Fr).process_batch(&batch);
        let parallel = Runner::new(Language::Fr).with_parallel(true).process_batch(&batch);

        assert_eq!(sequential, parallel);
        assert_eq!(parallel.errors.last().unwrap().index, batch.len() - 1);
    }

    #[test]
    fn test_process_batch_reports_non_object_item_at_its_index() {
        let batch = vec![
            raw([2, -2, 1, -1, 2, -2, 1, -1, 1, -1]).to_value(),
            json!([2, -2, 1, -1, 2, -2, 1, -1, 1, -1]),
            raw([0; 10]).to_value(),
        ];

        for runner in [Runner::new(Language::En), Runner::new(Language::En).with_parallel(true)] {
            let outcome = runner.process_batch(&batch);
            assert_eq!(outcome.results.len(), 2);
            assert_eq!(outcome.errors.len(), 1);

            let error = &outcome.errors[0];
            assert_eq!(error.index, 1);
            assert_eq!(error.input, batch[1]);
            assert_eq!(error.message, "Expected an object of q1..q10 responses, got a list");
        }
    }

    #[test]
    fn test_process_batch_empty() {
        let outcome = process_batch::<RawResponses>(&[], Language::En);
        assert!(outcome.results.is_empty());
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_process_batch_all_invalid() {
        let batch = vec![RawResponses::new(), raw([9; 10])];
        let outcome = process_batch(&batch, Language::En);

        assert!(outcome.results.is_empty());
        let indices: Vec<usize> = outcome.errors.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(outcome.errors[0].message, "Expected 10 responses, got 0");
    }

    #[test]
    fn test_compute_statistics_empty() {
        let stats = compute_statistics(&[]);
        assert_eq!(stats, BatchStatistics::default());
        assert_eq!(stats.n_evaluations, 0);
        assert!(stats.overall_score.is_none());
        assert!(stats.dimensions.is_empty());
    }

    #[test]
    fn test_compute_statistics_single_result() {
        let stats = compute_statistics(&results(&[[2, -2, 1, -1, 2, -2, 1, -1, 1, -1]]));
        let score = stats.overall_score.unwrap();

        assert_eq!(stats.n_evaluations, 1);
        assert_close(score.mean, 0.7);
        assert_eq!(score.min, score.max);
        assert_eq!(score.std, 0.0);
        assert_eq!(stats.dimensions.len(), 5);
    }

    #[test]
    fn test_compute_statistics_overall() {
        let stats = compute_statistics(&results(&[
            [2, -2, 2, -2, 2, -2, 2, -2, 2, -2],
            [0; 10],
            [2; 10],
            [-2; 10],
        ]));

        let score = stats.overall_score.unwrap();
        assert_close(score.mean, 0.25);
        assert_eq!(score.min, 0.0);
        assert_eq!(score.max, 1.0);
        // scores 1, 0, 0, 0 around mean 0.25
        assert_close(score.std, ((0.75f64.powi(2) + 3.0 * 0.25f64.powi(2)) / 4.0).sqrt());

        let consistency = stats.overall_consistency.unwrap();
        assert_close(consistency.mean, 0.5);
        assert_eq!(consistency.min, 0.0);
        assert_eq!(consistency.max, 1.0);
    }

    #[test]
    fn test_compute_statistics_uses_absolute_consistency() {
        let evaluated = results(&[[-2; 10], [-1; 10]]);
        assert!(evaluated.iter().all(|r| r.overall_consistency < 0.0));

        let stats = compute_statistics(&evaluated);
        let consistency = stats.overall_consistency.unwrap();
        assert_close(consistency.mean, 0.75);
        assert_eq!(consistency.min, 0.5);
        assert_eq!(consistency.max, 1.0);

        let factual = stats.dimensions[&Dimension::FactualAccuracy];
        assert_close(factual.mean_consistency, 0.75);
    }

    #[test]
    fn test_compute_statistics_per_dimension() {
        let stats = compute_statistics(&results(&[
            [2, -2, 0, 0, 0, 0, 0, 0, 0, 0],
            [-2, 2, 0, 0, 0, 0, 0, 0, 1, 1],
        ]));

        let factual = stats.dimensions[&Dimension::FactualAccuracy];
        assert_eq!(factual.mean_score, 0.0);
        assert_eq!(factual.min_score, -1.0);
        assert_eq!(factual.max_score, 1.0);
        assert_eq!(factual.mean_consistency, 0.0);

        let guidance = stats.dimensions[&Dimension::ResponsivenessToGuidance];
        assert_eq!(guidance.mean_score, 0.0);
        assert_close(guidance.mean_consistency, 0.25);
    }

    #[test]
    fn test_compute_statistics_omits_missing_dimensions() {
        let mut result = calculate_from_list(&[0; 10], Language::En).unwrap();
        result.dimensions.retain(|d| d.dimension_key != Dimension::Deceptiveness);

        let stats = compute_statistics(&[result]);
        assert_eq!(stats.dimensions.len(), 4);
        assert!(!stats.dimensions.contains_key(&Dimension::Deceptiveness));
    }

    #[test]
    fn test_compute_statistics_uses_first_matching_dimension() {
        let mut result = calculate_from_list(&[2, -2, 0, 0, 0, 0, 0, 0, 0, 0], Language::En).unwrap();
        let mut duplicate = result.dimensions[0].clone();
        duplicate.score = -1.0;
        duplicate.consistency_level = ConsistencyLevel::Inconsistent;
        result.dimensions.push(duplicate);

        let stats = compute_statistics(&[result]);
        assert_eq!(stats.dimensions[&Dimension::FactualAccuracy].mean_score, 1.0);
    }

    #[test]
    fn test_calculate_std_population() {
        assert_close(calculate_std(&[1.0, 3.0]), 1.0);
        assert_close(calculate_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.0);
    }

    #[test]
    fn test_calculate_range() {
        assert_eq!(calculate_range(&[0.5, -0.25, 1.0]), (-0.25, 1.0));
    }
}
