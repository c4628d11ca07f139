// src/portfolio.rs
//! Portfolio Configuration
//!
//! The immutable input record for a simulation run: asset identifiers,
//! holding weights, spot prices, annualized GBM parameters, and the target
//! correlation matrix. All preconditions are checked at construction, before
//! any simulation work is allowed to start, so a malformed portfolio fails
//! with a clear message naming the offending field rather than producing
//! garbage statistics millions of paths later.
//!
//! # Weighting Convention
//!
//! Weights multiply *prices*, at t=0 and at the horizon alike:
//! ```text
//! V_0 = Σ wᵢ · P0ᵢ        V_T = Σ wᵢ · P_Tᵢ        return = (V_T - V_0) / V_0
//! ```
//! Applying the same weight vector on both ends keeps returns well-defined:
//! with μ = σ = 0 every path's return is exactly 0.

use crate::error::{validation::*, SimError, SimResult};
use nalgebra::DMatrix;

/// Immutable multi-asset portfolio description
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    tickers: Vec<String>,
    weights: Vec<f64>,
    initial_prices: Vec<f64>,
    expected_returns: Vec<f64>,
    volatilities: Vec<f64>,
    correlation: DMatrix<f64>,
}

impl PortfolioConfig {
    /// Build a validated portfolio configuration
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameters` / `InvalidConfiguration` if any
    /// precondition fails: mismatched vector lengths, weights that do not
    /// sum to 1 (±1e-9) or are negative, non-positive prices, negative or
    /// non-finite volatilities, or a correlation matrix that is not square,
    /// symmetric and unit-diagonal with entries in [-1, 1].
    ///
    /// Positive definiteness is not checked here; the Cholesky factorization
    /// in the correlation sampler surfaces that as a `NumericalInstability`
    /// before any path is drawn.
    pub fn new(
        tickers: Vec<String>,
        weights: Vec<f64>,
        initial_prices: Vec<f64>,
        expected_returns: Vec<f64>,
        volatilities: Vec<f64>,
        correlation: DMatrix<f64>,
    ) -> SimResult<Self> {
        let n = tickers.len();
        if n == 0 {
            return Err(SimError::InvalidConfiguration {
                field: "tickers".to_string(),
                reason: "portfolio must contain at least one asset".to_string(),
            });
        }

        for (field, len) in [
            ("weights", weights.len()),
            ("initial_prices", initial_prices.len()),
            ("expected_returns", expected_returns.len()),
            ("volatilities", volatilities.len()),
        ] {
            if len != n {
                return Err(SimError::InvalidConfiguration {
                    field: field.to_string(),
                    reason: format!("length {} does not match {} assets", len, n),
                });
            }
        }

        validate_weights(&weights)?;

        for i in 0..n {
            validate_positive(&format!("initial_prices[{}]", i), initial_prices[i])?;
            validate_finite(&format!("expected_returns[{}]", i), expected_returns[i])?;
            validate_finite(&format!("volatilities[{}]", i), volatilities[i])?;
            validate_non_negative(&format!("volatilities[{}]", i), volatilities[i])?;
        }

        Self::validate_correlation_matrix(&correlation, n)?;

        Ok(Self {
            tickers,
            weights,
            initial_prices,
            expected_returns,
            volatilities,
            correlation,
        })
    }

    fn validate_correlation_matrix(correlation: &DMatrix<f64>, n: usize) -> SimResult<()> {
        if correlation.nrows() != n || correlation.ncols() != n {
            return Err(SimError::InvalidConfiguration {
                field: "correlation_matrix".to_string(),
                reason: format!(
                    "shape {}x{} does not match {} assets",
                    correlation.nrows(),
                    correlation.ncols(),
                    n
                ),
            });
        }

        for i in 0..n {
            if (correlation[(i, i)] - 1.0).abs() > 1e-12 {
                return Err(SimError::InvalidConfiguration {
                    field: "correlation_matrix".to_string(),
                    reason: format!("diagonal entry ({}, {}) is not 1", i, i),
                });
            }
            for j in 0..i {
                validate_correlation(&format!("correlation_matrix[{}][{}]", i, j), correlation[(i, j)])?;
                if (correlation[(i, j)] - correlation[(j, i)]).abs() > 1e-12 {
                    return Err(SimError::InvalidConfiguration {
                        field: "correlation_matrix".to_string(),
                        reason: format!("entries ({}, {}) and ({}, {}) are not symmetric", i, j, j, i),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn n_assets(&self) -> usize {
        self.tickers.len()
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn initial_prices(&self) -> &[f64] {
        &self.initial_prices
    }

    pub fn expected_returns(&self) -> &[f64] {
        &self.expected_returns
    }

    pub fn volatilities(&self) -> &[f64] {
        &self.volatilities
    }

    pub fn correlation(&self) -> &DMatrix<f64> {
        &self.correlation
    }

    /// Initial portfolio value V_0 = Σ wᵢ · P0ᵢ
    pub fn initial_value(&self) -> f64 {
        self.weights
            .iter()
            .zip(self.initial_prices.iter())
            .map(|(w, p)| w * p)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_asset(weights: Vec<f64>, vols: Vec<f64>, corr: DMatrix<f64>) -> SimResult<PortfolioConfig> {
        PortfolioConfig::new(
            vec!["AAA".to_string(), "BBB".to_string()],
            weights,
            vec![100.0, 50.0],
            vec![0.08, 0.12],
            vols,
            corr,
        )
    }

    fn identity2() -> DMatrix<f64> {
        DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0])
    }

    #[test]
    fn test_valid_portfolio() {
        let p = two_asset(vec![0.5, 0.5], vec![0.2, 0.3], identity2()).unwrap();
        assert_eq!(p.n_assets(), 2);
        assert!((p.initial_value() - 75.0).abs() < 1e-12);
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        assert!(two_asset(vec![0.5, 0.4], vec![0.2, 0.3], identity2()).is_err());
    }

    #[test]
    fn test_negative_volatility_rejected() {
        assert!(two_asset(vec![0.5, 0.5], vec![0.2, -0.3], identity2()).is_err());
    }

    #[test]
    fn test_zero_volatility_allowed() {
        assert!(two_asset(vec![0.5, 0.5], vec![0.0, 0.0], identity2()).is_ok());
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = PortfolioConfig::new(
            vec!["AAA".to_string(), "BBB".to_string()],
            vec![0.5, 0.5],
            vec![100.0],
            vec![0.08, 0.12],
            vec![0.2, 0.3],
            identity2(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_asymmetric_correlation_rejected() {
        let corr = DMatrix::from_row_slice(2, 2, &[1.0, 0.4, 0.3, 1.0]);
        assert!(two_asset(vec![0.5, 0.5], vec![0.2, 0.3], corr).is_err());
    }

    #[test]
    fn test_non_unit_diagonal_rejected() {
        let corr = DMatrix::from_row_slice(2, 2, &[1.0, 0.4, 0.4, 0.9]);
        assert!(two_asset(vec![0.5, 0.5], vec![0.2, 0.3], corr).is_err());
    }

    #[test]
    fn test_out_of_range_correlation_rejected() {
        let corr = DMatrix::from_row_slice(2, 2, &[1.0, 1.4, 1.4, 1.0]);
        assert!(two_asset(vec![0.5, 0.5], vec![0.2, 0.3], corr).is_err());
    }
}
