// src/mc/paths.rs
//! Path-to-Terminal-Value Transform and Portfolio Aggregation
//!
//! # Mathematical Framework
//!
//! Each asset follows Geometric Brownian Motion with exact per-step solution:
//! ```text
//! log-return per step = (μ - σ²/2)·dt + σ·√dt·Z
//! ```
//! Summing the per-step log-returns over T steps and exponentiating once
//! gives the terminal price:
//! ```text
//! S_T = S_0 · exp(T·(μ - σ²/2)·dt + σ·√dt·ΣZ_t)
//! ```
//! The -σ²/2 drift adjustment is what makes the discretized sum match the
//! lognormal terminal distribution; dropping it biases the mean upward.
//!
//! Only the cumulative shock sum and the final exponentiation are kept, so
//! memory after this stage is O(paths × assets), not O(paths × steps ×
//! assets). With σ = 0 the shock term vanishes and every path lands exactly
//! on the deterministic price S_0·exp(μ·dt·T).

use crate::portfolio::PortfolioConfig;
use ndarray::{s, Array1, Array2, Array3, Axis};

/// Reduce a correlated shock tensor (B, T, N) to terminal prices (B, N)
pub fn terminal_prices(shocks: &Array3<f64>, portfolio: &PortfolioConfig, dt: f64) -> Array2<f64> {
    let (n_paths, n_steps, n_assets) = shocks.dim();
    let sqrt_dt = dt.sqrt();
    let mut prices = Array2::<f64>::zeros((n_paths, n_assets));

    for i in 0..n_assets {
        let mu = portfolio.expected_returns()[i];
        let sigma = portfolio.volatilities()[i];
        let p0 = portfolio.initial_prices()[i];

        let drift = (mu - 0.5 * sigma * sigma) * dt * n_steps as f64;
        let vol_step = sigma * sqrt_dt;

        // ΣZ_t per path, then one exp per (path, asset)
        let shock_sums = shocks.slice(s![.., .., i]).sum_axis(Axis(1));
        let mut column = prices.slice_mut(s![.., i]);
        column.assign(&shock_sums.mapv(|z_sum| p0 * (drift + vol_step * z_sum).exp()));
    }

    prices
}

/// Weighted terminal portfolio value per path: V_T[p] = Σᵢ wᵢ · S_T[p, i]
pub fn aggregate_portfolio(prices: &Array2<f64>, weights: &[f64]) -> Array1<f64> {
    let w = Array1::from_vec(weights.to_vec());
    prices.dot(&w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;
    use ndarray::Array3;

    fn flat_portfolio(mu: f64, sigma: f64) -> PortfolioConfig {
        PortfolioConfig::new(
            vec!["AAA".to_string(), "BBB".to_string()],
            vec![0.5, 0.5],
            vec![100.0, 200.0],
            vec![mu, mu],
            vec![sigma, sigma],
            DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0]),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_everything_returns_initial_prices() {
        let portfolio = flat_portfolio(0.0, 0.0);
        let shocks = Array3::<f64>::zeros((4, 252, 2));
        let prices = terminal_prices(&shocks, &portfolio, 1.0 / 252.0);

        for p in 0..4 {
            assert_eq!(prices[[p, 0]], 100.0);
            assert_eq!(prices[[p, 1]], 200.0);
        }
    }

    #[test]
    fn test_zero_volatility_is_deterministic_drift() {
        let portfolio = flat_portfolio(0.10, 0.0);
        let dt = 1.0 / 252.0;
        let steps = 252;
        // Non-zero shocks must not matter when sigma = 0
        let shocks = Array3::<f64>::from_elem((3, steps, 2), 1.7);
        let prices = terminal_prices(&shocks, &portfolio, dt);

        let expected0 = 100.0 * (0.10 * dt * steps as f64).exp();
        for p in 0..3 {
            assert!((prices[[p, 0]] - expected0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_drift_adjustment_applied() {
        // With sigma > 0 and zero shocks, the drift must be (μ - σ²/2)·T
        let portfolio = flat_portfolio(0.10, 0.20);
        let dt = 1.0 / 252.0;
        let steps = 252;
        let shocks = Array3::<f64>::zeros((1, steps, 2));
        let prices = terminal_prices(&shocks, &portfolio, dt);

        let expected = 100.0 * ((0.10 - 0.5 * 0.04) * dt * steps as f64).exp();
        assert!((prices[[0, 0]] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_weighted_sum() {
        let prices = Array2::from_shape_vec((2, 2), vec![100.0, 200.0, 110.0, 180.0]).unwrap();
        let values = aggregate_portfolio(&prices, &[0.5, 0.5]);

        assert!((values[0] - 150.0).abs() < 1e-12);
        assert!((values[1] - 145.0).abs() < 1e-12);
    }
}
