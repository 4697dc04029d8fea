//! Error types for the imbalreg crate

use thiserror::Error;

/// Result type alias for imbalreg operations
pub type Result<T> = std::result::Result<T, ImbalanceError>;

/// Main error type for the imbalreg crate
#[derive(Error, Debug)]
pub enum ImbalanceError {
    /// Input does not have the shape of a tabular dataset, or a value has
    /// the wrong kind for the operation (non-numeric target, mixed column).
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// A column label was not found in the dataset schema.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A row identifier was not found in the dataset index.
    #[error("Row not found: {0}")]
    RowNotFound(String),

    /// A configuration scalar is outside its valid range.
    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidConfig {
        name: String,
        value: String,
        reason: String,
    },

    /// The data itself makes the requested operation undefined: missing
    /// cells, relevance values outside [0, 1], under-populated histogram
    /// buckets, all-zero sampling weights.
    #[error("Data quality error: {0}")]
    DataQuality(String),
}

impl ImbalanceError {
    /// Shorthand for an `InvalidConfig` with a displayable value.
    pub(crate) fn invalid_config(
        name: &str,
        value: impl std::fmt::Display,
        reason: &str,
    ) -> Self {
        ImbalanceError::InvalidConfig {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
