//! Error types for the tradegen pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`SheetError`] - spreadsheet parsing errors
//! - [`TransformError`] - row-to-trade transformation errors
//! - [`ValidationError`] - schema validation errors
//! - [`SinkError`] - JSON file output errors
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Sheet Parsing Errors
// =============================================================================

/// Errors during spreadsheet parsing.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Empty file.
    #[error("Spreadsheet is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in spreadsheet")]
    NoHeaders,

    /// A required column is absent from the header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A cell could not be read as the expected type.
    #[error("Line {line}, column '{column}' (value '{value}'): {message}")]
    InvalidCell {
        line: usize,
        column: String,
        value: String,
        message: String,
    },
}

impl SheetError {
    /// Build a [`SheetError::InvalidCell`] with full context.
    pub fn invalid_cell(
        line: usize,
        column: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidCell {
            line,
            column: column.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors during row-to-trade transformation.
///
/// Both variants are fatal: the run aborts and no documents are produced.
/// An unrecognized trade type is deliberately NOT an error (the row is
/// skipped instead).
#[derive(Debug, Error)]
pub enum TransformError {
    /// Trade level is not one of the five known values.
    #[error("Invalid trade level: '{value}' (expected 1-5)")]
    InvalidLevel { value: String },

    /// A price/amount cell cannot be parsed as an integer.
    #[error("Cannot coerce column '{column}' value '{value}' to an integer")]
    TypeCoercion { column: String, value: String },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors during profession-document validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Schema validation failed.
    #[error("Validation failed: {errors:?}")]
    SchemaError { errors: Vec<String> },

    /// Invalid item identifier.
    #[error("Invalid item identifier '{id}': {message}")]
    InvalidItemId { id: String, message: String },
}

// =============================================================================
// Sink Errors
// =============================================================================

/// Errors while writing profession JSON files.
#[derive(Debug, Error)]
pub enum SinkError {
    /// IO error.
    #[error("Failed to write output file: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by
/// [`crate::transform::pipeline::transform_sheet`]. It wraps all lower-level
/// errors and adds pipeline-specific variants.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Spreadsheet parsing error.
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Transformation error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Sink error.
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// No rows to transform.
    #[error("No rows to transform")]
    EmptyInput,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for sheet operations.
pub type SheetResult<T> = Result<T, SheetError>;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // SheetError -> PipelineError
        let sheet_err = SheetError::EmptyFile;
        let pipeline_err: PipelineError = sheet_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // TransformError -> PipelineError
        let transform_err = TransformError::InvalidLevel { value: "9".into() };
        let pipeline_err: PipelineError = transform_err.into();
        assert!(pipeline_err.to_string().contains("9"));
    }

    #[test]
    fn test_coercion_error_format() {
        let err = TransformError::TypeCoercion {
            column: "Buy Price".into(),
            value: "abc".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Buy Price"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_invalid_cell_format() {
        let err = SheetError::invalid_cell(5, "Max", "lots", "expected an integer");
        let msg = err.to_string();
        assert!(msg.contains("Line 5"));
        assert!(msg.contains("column 'Max'"));
        assert!(msg.contains("value 'lots'"));
    }
}
