// src/metrics.rs
//! Risk Metrics over the Simulated Return Distribution
//!
//! # Conventions
//!
//! All order statistics share one sorted copy of the returns and one
//! percentile rule — nearest-rank, `sorted[floor(n·p)]` — so the exported
//! percentile table, the VaR figures and the median can never disagree.
//! Moments are population moments (divide by n).
//!
//! Definitions:
//! - `VaR(p) = percentile(p)` for p ∈ {0.05, 0.01, 0.001}; signed, negative
//!   means loss
//! - `CVaR(p)` = mean of the worst p-fraction, `sorted[0..floor(n·p)]`;
//!   when that slice is empty the single worst outcome stands in, keeping
//!   CVaR(p) ≤ VaR(p)
//! - skewness = E[((r-μ)/σ)³], excess kurtosis = E[((r-μ)/σ)⁴] - 3, both 0
//!   when σ = 0
//! - probability metrics use strict inequalities against the fixed
//!   thresholds 0, ±0.10, ±0.20, ±0.50
//! - Sharpe = μ/σ at zero risk-free rate, 0 when σ = 0

use crate::error::{SimError, SimResult};

/// Percentile labels of the exported percentile table
pub const PERCENTILE_LABELS: [u32; 9] = [1, 5, 10, 25, 50, 75, 90, 95, 99];

/// One row of the percentile table: label (in percent) and nearest-rank return
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentileRow {
    pub percentile: u32,
    pub value: f64,
}

/// Immutable record of all distributional risk statistics
#[derive(Debug, Clone)]
pub struct RiskMetrics {
    pub mean_return: f64,
    pub median_return: f64,
    pub std_return: f64,

    pub percentile_1: f64,
    pub percentile_5: f64,
    pub percentile_25: f64,
    pub percentile_75: f64,
    pub percentile_95: f64,
    pub percentile_99: f64,

    pub var_95: f64,
    pub var_99: f64,
    pub var_999: f64,

    pub cvar_95: f64,
    pub cvar_99: f64,
    pub cvar_999: f64,

    pub prob_loss: f64,
    pub prob_loss_10: f64,
    pub prob_loss_20: f64,
    pub prob_loss_50: f64,
    pub prob_profit: f64,
    pub prob_profit_10: f64,
    pub prob_profit_20: f64,
    pub prob_profit_50: f64,

    pub skewness: f64,
    pub kurtosis: f64,
    pub sharpe_ratio: f64,

    sorted_returns: Vec<f64>,
}

/// Nearest-rank percentile: `sorted[floor(n·p)]`, p ∈ (0, 1)
pub fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    let idx = ((sorted.len() as f64 * p) as usize).min(sorted.len() - 1);
    sorted[idx]
}

/// Mean of the worst p-fraction of outcomes
pub fn tail_mean(sorted: &[f64], p: f64) -> f64 {
    let cutoff = (sorted.len() as f64 * p) as usize;
    if cutoff == 0 {
        return sorted[0];
    }
    sorted[..cutoff].iter().sum::<f64>() / cutoff as f64
}

impl RiskMetrics {
    /// Compute all metrics from the finalized returns vector
    ///
    /// Sorts one copy and reuses it for every order statistic.
    pub fn from_returns(returns: &[f64]) -> SimResult<Self> {
        if returns.is_empty() {
            return Err(SimError::InvalidConfiguration {
                field: "returns".to_string(),
                reason: "cannot compute metrics over an empty result vector".to_string(),
            });
        }

        let n = returns.len() as f64;

        let mut sorted = returns.to_vec();
        sorted.sort_unstable_by(f64::total_cmp);

        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / n;
        let std = variance.sqrt();

        let (skewness, kurtosis) = if std == 0.0 {
            (0.0, 0.0)
        } else {
            let mut m3 = 0.0;
            let mut m4 = 0.0;
            for r in returns {
                let z = (r - mean) / std;
                let z3 = z * z * z;
                m3 += z3;
                m4 += z3 * z;
            }
            (m3 / n, m4 / n - 3.0)
        };

        let sharpe_ratio = if std > 0.0 { mean / std } else { 0.0 };

        let frac_below = |threshold: f64| returns.iter().filter(|&&r| r < threshold).count() as f64 / n;
        let frac_above = |threshold: f64| returns.iter().filter(|&&r| r > threshold).count() as f64 / n;

        Ok(Self {
            mean_return: mean,
            median_return: nearest_rank(&sorted, 0.50),
            std_return: std,

            percentile_1: nearest_rank(&sorted, 0.01),
            percentile_5: nearest_rank(&sorted, 0.05),
            percentile_25: nearest_rank(&sorted, 0.25),
            percentile_75: nearest_rank(&sorted, 0.75),
            percentile_95: nearest_rank(&sorted, 0.95),
            percentile_99: nearest_rank(&sorted, 0.99),

            var_95: nearest_rank(&sorted, 0.05),
            var_99: nearest_rank(&sorted, 0.01),
            var_999: nearest_rank(&sorted, 0.001),

            cvar_95: tail_mean(&sorted, 0.05),
            cvar_99: tail_mean(&sorted, 0.01),
            cvar_999: tail_mean(&sorted, 0.001),

            prob_loss: frac_below(0.0),
            prob_loss_10: frac_below(-0.10),
            prob_loss_20: frac_below(-0.20),
            prob_loss_50: frac_below(-0.50),
            prob_profit: frac_above(0.0),
            prob_profit_10: frac_above(0.10),
            prob_profit_20: frac_above(0.20),
            prob_profit_50: frac_above(0.50),

            skewness,
            kurtosis,
            sharpe_ratio,

            sorted_returns: sorted,
        })
    }

    /// Nearest-rank percentile of the underlying return distribution
    pub fn percentile(&self, p: f64) -> f64 {
        nearest_rank(&self.sorted_returns, p)
    }

    /// The explicit percentile table consumed by the report layer
    ///
    /// Uses the same sorted array and the same nearest-rank rule as every
    /// other metric; downstream consumers read these values rather than
    /// recomputing with a different interpolation rule.
    pub fn percentile_table(&self) -> Vec<PercentileRow> {
        PERCENTILE_LABELS
            .iter()
            .map(|&pct| PercentileRow {
                percentile: pct,
                value: nearest_rank(&self.sorted_returns, pct as f64 / 100.0),
            })
            .collect()
    }

    /// Stable (name, value) listing of every metric, in export order
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("mean_return", self.mean_return),
            ("median_return", self.median_return),
            ("std_return", self.std_return),
            ("percentile_1", self.percentile_1),
            ("percentile_5", self.percentile_5),
            ("percentile_25", self.percentile_25),
            ("percentile_75", self.percentile_75),
            ("percentile_95", self.percentile_95),
            ("percentile_99", self.percentile_99),
            ("VaR_95", self.var_95),
            ("VaR_99", self.var_99),
            ("VaR_999", self.var_999),
            ("CVaR_95", self.cvar_95),
            ("CVaR_99", self.cvar_99),
            ("CVaR_999", self.cvar_999),
            ("prob_loss", self.prob_loss),
            ("prob_loss_10", self.prob_loss_10),
            ("prob_loss_20", self.prob_loss_20),
            ("prob_loss_50", self.prob_loss_50),
            ("prob_profit", self.prob_profit),
            ("prob_profit_10", self.prob_profit_10),
            ("prob_profit_20", self.prob_profit_20),
            ("prob_profit_50", self.prob_profit_50),
            ("skewness", self.skewness),
            ("kurtosis", self.kurtosis),
            ("sharpe_ratio", self.sharpe_ratio),
        ]
    }
}
