use std::result::Result as StdResult;

use thiserror::Error;

/// Structural failures when editing a draft's item list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("Item index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Invalid permutation: {0}")]
    InvalidPermutation(String),
}

/// Raised by a [`Normalizer`](crate::core::services::Normalizer) when an
/// incoming item cannot be flattened.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Cannot normalize {reference}: {reason}")]
pub struct NormalizationError {
    pub reference: String,
    pub reason: String,
}

/// Raised by an [`Aggregator`](crate::core::services::Aggregator).
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Nutrition aggregation failed: {0}")]
pub struct AggregationError(pub String);

/// Failures while driving an intake session.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntakeError {
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
    #[error("Intake is waiting for a decision on item {0}")]
    DecisionPending(usize),
    #[error("Intake has no pending prompt")]
    NoPendingDecision,
}

/// Failures at the persistence boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Failures when saving a draft. The draft itself is never modified.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
    #[error("Persistence error: {0}")]
    Persist(#[from] StorageError),
}

/// Failures of the configuration layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}

/// Unified error type for the editor flow and the CLI.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Editing is disabled for this recipe")]
    EditingDisabled,
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, EditorError>;
