// Validation-class errors raised by the domain layer
use super::duration::DurationField;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("invalid duration token \"{token}\"")]
    InvalidToken { token: String },

    #[error("duration \"{token}\" is missing a unit (ms, s, m, h, d, w, y)")]
    MissingUnit { token: String },

    #[error("unknown duration unit \"{unit}\"")]
    UnknownUnit { unit: String },

    #[error("duration \"{token}\" is too large")]
    Overflow { token: String },
}

impl DurationError {
    /// The part of the input the error points at.
    pub fn token(&self) -> &str {
        match self {
            DurationError::InvalidToken { token }
            | DurationError::MissingUnit { token }
            | DurationError::Overflow { token } => token,
            DurationError::UnknownUnit { unit } => unit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupingError {
    #[error("series at position {index} has no group key")]
    MissingGroupKey { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("receiver: Required.")]
    MissingReceiver,

    #[error("{field}: {message}")]
    InvalidDuration {
        field: DurationField,
        token: String,
        message: String,
    },
}

impl ValidationError {
    pub fn invalid_duration(field: DurationField, err: &DurationError) -> Self {
        ValidationError::InvalidDuration {
            field,
            token: err.token().to_string(),
            message: err.to_string(),
        }
    }

    /// Name of the form field the error belongs to.
    pub fn field_name(&self) -> &'static str {
        match self {
            ValidationError::MissingReceiver => "receiver_id",
            ValidationError::InvalidDuration { field, .. } => field.name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("time range start {from} is after its end {to}")]
pub struct ReversedRangeError {
    pub from: i64,
    pub to: i64,
}
