//! Error types for the medcalc_core library.

use crate::limits;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for medcalc_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Calculator input rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Request named a calculator type that does not exist
    #[error("Invalid calculator type: '{0}'")]
    UnknownCalculator(String),

    /// Output mode requires an email address before results are released
    #[error("Email is required to view results.")]
    EmailRequired,
}

/// Input validation failures, one per rejected field.
///
/// Messages are meant to be shown to the person filling in the calculator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select your gender.")]
    InvalidGender,

    #[error(
        "Age must be between {} and {} years.",
        limits::MIN_AGE,
        limits::MAX_AGE
    )]
    InvalidAge,

    #[error(
        "Weight must be between {} and {} kg.",
        limits::MIN_WEIGHT_KG,
        limits::MAX_WEIGHT_KG
    )]
    InvalidWeight,

    #[error(
        "Height must be between {} and {} cm.",
        limits::MIN_HEIGHT_CM,
        limits::MAX_HEIGHT_CM
    )]
    InvalidHeight,

    #[error("Please select your activity level.")]
    InvalidActivityLevel,

    #[error("Please enter the first day of your last period.")]
    MissingDate,

    #[error("Please enter a valid date.")]
    InvalidDate,

    #[error(
        "Cycle length must be between {} and {} days.",
        limits::MIN_CYCLE_LENGTH,
        limits::MAX_CYCLE_LENGTH
    )]
    InvalidCycleLength,

    #[error("The date cannot be in the future.")]
    DateInFuture,

    #[error("The date is too far in the past for an active pregnancy.")]
    DateTooOld,
}

impl ValidationError {
    /// Stable machine-readable code for this failure
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidGender => "invalid_gender",
            ValidationError::InvalidAge => "invalid_age",
            ValidationError::InvalidWeight => "invalid_weight",
            ValidationError::InvalidHeight => "invalid_height",
            ValidationError::InvalidActivityLevel => "invalid_activity",
            ValidationError::MissingDate => "missing_lmp",
            ValidationError::InvalidDate => "invalid_date",
            ValidationError::InvalidCycleLength => "invalid_cycle",
            ValidationError::DateInFuture => "future_date",
            ValidationError::DateTooOld => "date_too_old",
        }
    }
}
