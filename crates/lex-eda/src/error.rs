//! Custom error types for the profiling engine.
//!
//! Only structural problems with the input are errors. Degenerate statistics
//! (too few observations, zero variance, empty groups) are reported inside
//! the report as `not_computable` markers and never surface here.
//!
//! Errors are serializable so a caller can forward them as JSON.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the profiling engine.
#[derive(Error, Debug)]
pub enum EdaError {
    /// Dataset has no rows or no columns.
    #[error("Dataset is empty: {0}")]
    EmptyDataset(String),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Two columns share the same name.
    #[error("Column '{0}' appears more than once")]
    DuplicateColumn(String),

    /// A column's length differs from the dataset row count.
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Outcome column does not hold exactly two distinct values.
    #[error("Outcome column '{column}' must be binary, found {distinct} distinct values")]
    OutcomeNotBinary { column: String, distinct: usize },

    /// A numeric column holds infinite values.
    #[error("Column '{0}' contains non-finite values")]
    NonFiniteValues(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EdaError>,
    },
}

impl EdaError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EdaError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for machine consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyDataset(_) => "EMPTY_DATASET",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::DuplicateColumn(_) => "DUPLICATE_COLUMN",
            Self::ColumnLengthMismatch { .. } => "COLUMN_LENGTH_MISMATCH",
            Self::OutcomeNotBinary { .. } => "OUTCOME_NOT_BINARY",
            Self::NonFiniteValues(_) => "NON_FINITE_VALUES",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a violated input precondition.
    ///
    /// Input errors are raised before any statistics are computed and name
    /// the offending column or structural problem.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::EmptyDataset(_)
            | Self::ColumnNotFound(_)
            | Self::DuplicateColumn(_)
            | Self::ColumnLengthMismatch { .. }
            | Self::OutcomeNotBinary { .. } => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for EdaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EdaError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for profiling operations.
pub type Result<T> = std::result::Result<T, EdaError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EdaError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            EdaError::EmptyDataset("no rows".to_string()).error_code(),
            "EMPTY_DATASET"
        );
        assert_eq!(
            EdaError::ColumnNotFound("target".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            EdaError::OutcomeNotBinary {
                column: "target".to_string(),
                distinct: 3
            }
            .error_code(),
            "OUTCOME_NOT_BINARY"
        );
    }

    #[test]
    fn test_is_input_error() {
        assert!(EdaError::EmptyDataset("no rows".to_string()).is_input_error());
        assert!(EdaError::DuplicateColumn("age".to_string()).is_input_error());
        assert!(!EdaError::NonFiniteValues("age".to_string()).is_input_error());
        assert!(!EdaError::InvalidConfig("bad".to_string()).is_input_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = EdaError::ColumnNotFound("Age".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("Age"));
    }

    #[test]
    fn test_with_context() {
        let error = EdaError::ColumnNotFound("target".to_string()).with_context("Resolving outcome");
        assert!(error.to_string().contains("Resolving outcome"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
        assert!(error.is_input_error());
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<()> = Err(EdaError::EmptyDataset("no rows".to_string()));
        let err = result.context("Loading dataset").unwrap_err();
        assert!(err.to_string().starts_with("Loading dataset"));
    }
}
