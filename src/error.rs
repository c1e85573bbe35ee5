// src/error.rs
use std::fmt;

/// Custom error types for the gcc-mc library
#[derive(Debug, Clone)]
pub enum GccError {
    /// Invalid parameter values
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration
    InvalidConfiguration { field: String, reason: String },

    /// Dimension mismatch between the matrices handed to the solver
    ShapeMismatch {
        context: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Numerical instability or a failed linear solve
    NumericalInstability { method: String, reason: String },

    /// Monte Carlo simulation error
    MonteCarloError { paths: usize, reason: String },
}

impl fmt::Display for GccError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GccError::InvalidParameters {
                parameter,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}' = {}: {}",
                    parameter, value, constraint
                )
            }
            GccError::InvalidConfiguration { field, reason } => {
                write!(f, "Invalid configuration for '{}': {}", field, reason)
            }
            GccError::ShapeMismatch {
                context,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Shape mismatch in {}: expected {}x{}, found {}x{}",
                    context, expected.0, expected.1, found.0, found.1
                )
            }
            GccError::NumericalInstability { method, reason } => {
                write!(f, "Numerical instability in {}: {}", method, reason)
            }
            GccError::MonteCarloError { paths, reason } => {
                write!(
                    f,
                    "Monte Carlo simulation error with {} paths: {}",
                    paths, reason
                )
            }
        }
    }
}

impl std::error::Error for GccError {}

/// Result type alias for gcc-mc operations
pub type GccResult<T> = Result<T, GccError>;

/// Validation utilities
pub mod validation {
    use super::{GccError, GccResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> GccResult<()> {
        if value <= 0.0 {
            Err(GccError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> GccResult<()> {
        if value < 0.0 {
            Err(GccError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> GccResult<()> {
        if !value.is_finite() {
            Err(GccError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate the path count: positive and even (antithetic pairing)
    pub fn validate_paths(paths: usize) -> GccResult<()> {
        if paths == 0 {
            Err(GccError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if paths % 2 != 0 {
            Err(GccError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "must be even (paths come in antithetic pairs)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate the time-step count
    pub fn validate_steps(steps: usize) -> GccResult<()> {
        if steps == 0 {
            Err(GccError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate the jump-size parameter theta: theta > 1 keeps the mean
    /// jump size finite in the drift compensator eta/(1 - theta).
    pub fn validate_theta(theta: f64) -> GccResult<()> {
        if theta <= 1.0 {
            Err(GccError::InvalidParameters {
                parameter: "theta".to_string(),
                value: theta,
                constraint: "must be greater than 1".to_string(),
            })
        } else {
            Ok(())
        }
    }
}
