//! Error types for the planner crate.
//!
//! This module provides structured error types for path planning and
//! planner parameter validation.

use palletkit_core::ConfigurationError;
use thiserror::Error;

/// Errors that can occur while planning a palletizing job.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// The job violates a precondition of the planner.
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Planner parameters failed validation.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),
}

/// Errors related to planner parameter validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },
}

impl ParameterError {
    /// Check that `value` is finite and within `min..=max`
    pub(crate) fn check_range(name: &str, value: f64, min: f64, max: f64) -> ParameterResult<()> {
        if value.is_finite() && value >= min && value <= max {
            Ok(())
        } else {
            Err(ParameterError::OutOfRange {
                name: name.to_string(),
                value,
                min,
                max,
            })
        }
    }
}

/// Result type alias for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Result type alias for parameter validation.
pub type ParameterResult<T> = Result<T, ParameterError>;
