use thiserror::Error;

/// Errors raised while scoring a single response set
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShsError {
    /// The response set failed validation
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    /// Question identifier not in the catalog
    #[error("Unknown question ID: {0}")]
    UnknownQuestion(String),

    /// Dimension key not in the catalog
    #[error("Unknown dimension key: {0}")]
    UnknownDimension(String),

    /// List input of the wrong length
    #[error("Expected {expected} responses, got {actual}")]
    Shape { expected: usize, actual: usize },
}

/// Shape and range violations on a single response set
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidInput {
    #[error("Expected 10 responses, got {count}")]
    WrongCount { count: usize },

    #[error("Missing response for {question}")]
    MissingField { question: String },

    #[error("Invalid response value for {question}: {value}. Expected integer in range [-2, 2]")]
    OutOfRange { question: String, value: i128 },

    #[error("Invalid response value for {question}: {value}. Expected integer in range [-2, 2]")]
    NotInteger { question: String, value: String },

    #[error("Expected an object of q1..q10 responses, got {found}")]
    NotAnObject { found: String },
}

/// Fieldless discriminant of [`InvalidInput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInputKind {
    WrongCount,
    MissingField,
    OutOfRange,
    NotInteger,
    NotAnObject,
}

impl InvalidInput {
    pub fn kind(&self) -> InvalidInputKind {
        match self {
            InvalidInput::WrongCount { .. } => InvalidInputKind::WrongCount,
            InvalidInput::MissingField { .. } => InvalidInputKind::MissingField,
            InvalidInput::OutOfRange { .. } => InvalidInputKind::OutOfRange,
            InvalidInput::NotInteger { .. } => InvalidInputKind::NotInteger,
            InvalidInput::NotAnObject { .. } => InvalidInputKind::NotAnObject,
        }
    }
}

impl ShsError {
    /// Validation kind, if this is an input error
    pub fn invalid_input_kind(&self) -> Option<InvalidInputKind> {
        match self {
            ShsError::InvalidInput(e) => Some(e.kind()),
            _ => None,
        }
    }
}

/// Errors raised by the input loaders
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("JSON input must contain a list of response objects")]
    NotAList,

    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column {column} in CSV")]
    MissingColumn { column: String },

    #[error("Invalid value for {column} in row {row}: {value}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}
