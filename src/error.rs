// Errors — input validation and configuration failures.

use thiserror::Error;

use crate::types::InputField;

/// Why a set of calculator inputs could not produce a result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The field is zero, negative, NaN or infinite, or it drives a derived
    /// quantity non-finite or to zero (overflow or underflow).
    #[error("{field} must be a finite number greater than zero that keeps every derived value finite and non-zero, got {value}")]
    NonPositiveInput { field: InputField, value: f64 },

    #[error("unsupported syringe capacity {capacity_ml} mL (expected 0.3, 0.5 or 1.0)")]
    UnsupportedSyringeSize { capacity_ml: f64 },

    #[error("unsupported dose unit {unit:?} (expected mcg or mg)")]
    UnsupportedDoseUnit { unit: String },
}

impl ValidationError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::NonPositiveInput { .. } => "NonPositiveInput",
            ValidationError::UnsupportedSyringeSize { .. } => "UnsupportedSyringeSize",
            ValidationError::UnsupportedDoseUnit { .. } => "UnsupportedDoseUnit",
        }
    }

    /// The input field at fault, where one can be named.
    pub fn field(&self) -> Option<InputField> {
        match self {
            ValidationError::NonPositiveInput { field, .. } => Some(*field),
            ValidationError::UnsupportedSyringeSize { .. } => Some(InputField::SyringeCapacityMl),
            ValidationError::UnsupportedDoseUnit { .. } => None,
        }
    }
}

/// A malformed environment setting.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}
