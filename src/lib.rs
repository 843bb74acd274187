pub mod catalog;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod input;
pub mod models;
pub mod output;
pub mod runner;
pub mod validation;

pub use catalog::{Dimension, Language, QuestionId, dimension_label, question_text};
pub use error::{InvalidInput, InvalidInputKind, ParseError, ShsError};
pub use evaluation::{
    Evaluator, calculate, calculate_from_list, classify_consistency, consistency, dimension_score,
};
pub use models::{
    BatchError, BatchOutcome, BatchStatistics, ConsistencyLevel, DimensionResult, EvaluationResult,
};
pub use runner::{BatchItem, Runner, compute_statistics, process_batch};
pub use validation::{RawResponses, ResponseSet, validate};
