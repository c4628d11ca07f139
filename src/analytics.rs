// src/analytics.rs
//! Closed-Form Lognormal Moments
//!
//! # Mathematical Foundation
//!
//! Under GBM the terminal price is lognormal:
//! ```text
//! S_T = S_0 · exp((μ - σ²/2)T + σ√T · Z),  Z ~ N(0,1)
//! ```
//! which gives exact moments:
//! ```text
//! E[S_T]   = S_0 · e^(μT)
//! sd[S_T]  = S_0 · e^(μT) · √(e^(σ²T) - 1)
//! ```
//!
//! These closed forms are the validation collaborator for the Monte Carlo
//! engine: for a single-asset portfolio the simulated mean, standard
//! deviation and threshold probabilities must converge to them.

use crate::math_utils::norm_cdf;

/// Exact mean of the GBM terminal price
pub fn gbm_terminal_mean(s0: f64, mu: f64, t: f64) -> f64 {
    s0 * (mu * t).exp()
}

/// Exact standard deviation of the GBM terminal price
pub fn gbm_terminal_std(s0: f64, mu: f64, sigma: f64, t: f64) -> f64 {
    s0 * (mu * t).exp() * ((sigma * sigma * t).exp() - 1.0).sqrt()
}

/// Exact P[(S_T - S_0)/S_0 < threshold] for a single GBM asset
///
/// Degenerates to a step function when σ = 0.
pub fn gbm_prob_return_below(mu: f64, sigma: f64, t: f64, threshold: f64) -> f64 {
    let deterministic = ((mu - 0.5 * sigma * sigma) * t).exp() - 1.0;
    if sigma <= 0.0 || t <= 0.0 {
        return if deterministic < threshold { 1.0 } else { 0.0 };
    }
    let gross = 1.0 + threshold;
    if gross <= 0.0 {
        return 0.0;
    }
    let d = (gross.ln() - (mu - 0.5 * sigma * sigma) * t) / (sigma * t.sqrt());
    norm_cdf(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_mean_zero_drift() {
        assert!((gbm_terminal_mean(100.0, 0.0, 1.0) - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_terminal_std_zero_vol() {
        assert_eq!(gbm_terminal_std(100.0, 0.1, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_prob_below_median() {
        // The lognormal median return is exp((μ - σ²/2)T) - 1, so exactly
        // half the mass sits below it
        let mu: f64 = 0.10;
        let sigma: f64 = 0.20;
        let t: f64 = 1.0;
        let median_return = ((mu - 0.5 * sigma * sigma) * t).exp() - 1.0;
        let p = gbm_prob_return_below(mu, sigma, t, median_return);
        assert!((p - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_prob_below_total_loss_is_zero() {
        assert_eq!(gbm_prob_return_below(0.1, 0.2, 1.0, -1.0), 0.0);
    }

    #[test]
    fn test_zero_vol_step_function() {
        // Deterministic return is exp(0.1) - 1 ≈ 0.105
        assert_eq!(gbm_prob_return_below(0.1, 0.0, 1.0, 0.2), 1.0);
        assert_eq!(gbm_prob_return_below(0.1, 0.0, 1.0, 0.05), 0.0);
    }
}
