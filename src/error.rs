// src/error.rs
use std::fmt;

/// Custom error types for the portfolio-mc library
#[derive(Debug, Clone)]
pub enum SimError {
    /// Invalid parameter values
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration
    InvalidConfiguration { field: String, reason: String },

    /// Numerical failure (Cholesky breakdown, non-finite statistics)
    NumericalInstability { method: String, reason: String },

    /// A requested batch tensor would exceed the memory ceiling
    ResourceExhausted {
        requested_bytes: usize,
        limit_bytes: usize,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidParameters {
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
            SimError::InvalidConfiguration { field, reason } => {
                write!(f, "Invalid configuration for '{}': {}", field, reason)
            }
            SimError::NumericalInstability { method, reason } => {
                write!(f, "Numerical instability in {}: {}", method, reason)
            }
            SimError::ResourceExhausted {
                requested_bytes,
                limit_bytes,
            } => {
                write!(
                    f,
                    "Batch tensor of {} bytes exceeds the {} byte ceiling; reduce batch_size",
                    requested_bytes, limit_bytes
                )
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Result type alias for portfolio-mc operations
pub type SimResult<T> = Result<T, SimError>;

/// Validation utilities
pub mod validation {
    use super::{SimError, SimResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> SimResult<()> {
        if value <= 0.0 {
            Err(SimError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> SimResult<()> {
        if value < 0.0 {
            Err(SimError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> SimResult<()> {
        if !value.is_finite() {
            Err(SimError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a correlation coefficient lies in [-1, 1]
    pub fn validate_correlation(name: &str, rho: f64) -> SimResult<()> {
        if !(-1.0..=1.0).contains(&rho) {
            Err(SimError::InvalidParameters {
                parameter: name.to_string(),
                value: rho,
                constraint: "must be in range [-1, 1]".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate total simulation count
    pub fn validate_simulations(n_simulations: usize) -> SimResult<()> {
        if n_simulations == 0 {
            Err(SimError::InvalidConfiguration {
                field: "n_simulations".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if n_simulations > 1_000_000_000 {
            Err(SimError::InvalidConfiguration {
                field: "n_simulations".to_string(),
                reason: "exceeds maximum allowed (1 billion)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that weights form a unit-sum allocation
    pub fn validate_weights(weights: &[f64]) -> SimResult<()> {
        for (i, &w) in weights.iter().enumerate() {
            validate_non_negative(&format!("weights[{}]", i), w)?;
        }
        let total: f64 = weights.iter().sum();
        if (total - 1.0).abs() > 1e-9 {
            return Err(SimError::InvalidParameters {
                parameter: "weights".to_string(),
                value: total,
                constraint: "must sum to 1 (tolerance 1e-9)".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("initial_prices[0]", 100.0).is_ok());
        assert!(validate_positive("initial_prices[0]", 0.0).is_err());
        assert!(validate_positive("initial_prices[0]", -0.1).is_err());
    }

    #[test]
    fn test_validate_correlation() {
        assert!(validate_correlation("rho", 0.5).is_ok());
        assert!(validate_correlation("rho", -0.8).is_ok());
        assert!(validate_correlation("rho", 1.0).is_ok());
        assert!(validate_correlation("rho", -1.0).is_ok());
        assert!(validate_correlation("rho", 1.1).is_err());
        assert!(validate_correlation("rho", -1.1).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("value", 1.0).is_ok());
        assert!(validate_finite("value", f64::NAN).is_err());
        assert!(validate_finite("value", f64::INFINITY).is_err());
        assert!(validate_finite("value", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_validate_weights() {
        assert!(validate_weights(&[0.25, 0.25, 0.20, 0.15, 0.15]).is_ok());
        assert!(validate_weights(&[0.5, 0.4]).is_err());
        assert!(validate_weights(&[1.2, -0.2]).is_err());
    }

    #[test]
    fn test_error_display() {
        let error = SimError::InvalidParameters {
            parameter: "volatilities[2]".to_string(),
            value: -0.1,
            constraint: "must be non-negative".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("volatilities[2]"));
        assert!(display.contains("-0.1"));
        assert!(display.contains("non-negative"));
    }

    #[test]
    fn test_resource_exhausted_display() {
        let error = SimError::ResourceExhausted {
            requested_bytes: 10_000_000_000,
            limit_bytes: 4_294_967_296,
        };

        let display = format!("{}", error);
        assert!(display.contains("10000000000"));
        assert!(display.contains("reduce batch_size"));
    }
}
