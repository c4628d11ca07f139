// src/mc/engine.rs
//! Batched Monte Carlo Engine
//!
//! # Memory-Bounded Batch Processing
//!
//! Simulating S paths over T daily steps for N assets would need
//! S × T × N × 8 bytes if materialized at once — hundreds of gigabytes at
//! S = 5,000,000. The scheduler instead partitions [0, S) into contiguous
//! ranges of at most `batch_size` paths and drives the pipeline per range:
//!
//! ```text
//! sample correlated shocks (B, T, N)
//!   → terminal prices (B, N)
//!   → portfolio values (B,)
//!   → write into the range's slice of the pre-allocated result vector
//! ```
//!
//! Each batch tensor is dropped before the next one is sampled. Peak memory
//! is one batch tensor plus the S-length result vector; `batch_size` is a
//! throughput/memory tuning knob, never a correctness parameter.
//!
//! # Determinism
//!
//! Random sub-streams are keyed by global path index (see [`crate::rng`]),
//! so the result vector is identical element-for-element under any batch
//! partition. Batches are data-independent and write disjoint slices — the
//! natural seam for fan-out across threads; here batches run sequentially
//! (the memory bound wants one live tensor) and rayon parallelizes the
//! paths inside each batch.

use crate::correlate::CorrelatedSampler;
use crate::error::{validation::*, SimError, SimResult};
use crate::math_utils::Timer;
use crate::mc::paths::{aggregate_portfolio, terminal_prices};
use crate::metrics::RiskMetrics;
use crate::portfolio::PortfolioConfig;
use crate::rng::RngFactory;

/// Trading days per year; one timestep per trading day
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Ceiling on a single batch shock tensor (paths × steps × assets × 8 bytes)
pub const MAX_BATCH_TENSOR_BYTES: usize = 4 << 30;

/// Engine tuning and reproducibility parameters
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Total number of simulated paths
    pub n_simulations: usize,
    /// Paths processed per batch; values above `n_simulations` clamp to a
    /// single batch
    pub batch_size: usize,
    /// Simulation horizon in years; timesteps = round(horizon × 252)
    pub horizon_years: f64,
    /// Base seed for the per-path random sub-streams
    pub seed: u64,
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> SimResult<()> {
        validate_simulations(self.n_simulations)?;
        if self.batch_size == 0 {
            return Err(SimError::InvalidConfiguration {
                field: "batch_size".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        validate_positive("horizon_years", self.horizon_years)?;
        validate_finite("horizon_years", self.horizon_years)?;
        self.n_steps()?;
        Ok(())
    }

    /// Timestep count for the configured horizon
    pub fn n_steps(&self) -> SimResult<usize> {
        let steps = (self.horizon_years * TRADING_DAYS_PER_YEAR).round() as usize;
        if steps == 0 {
            return Err(SimError::InvalidConfiguration {
                field: "horizon_years".to_string(),
                reason: format!(
                    "horizon {} years yields zero timesteps at {} steps/year",
                    self.horizon_years, TRADING_DAYS_PER_YEAR
                ),
            });
        }
        Ok(steps)
    }

    fn effective_batch_size(&self) -> usize {
        self.batch_size.min(self.n_simulations)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            n_simulations: 1_000_000,
            batch_size: 100_000,
            horizon_years: 1.0,
            seed: 42,
        }
    }
}

/// Complete output of one simulation run, handed to the report/export layer
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Terminal portfolio value per path, length = n_simulations
    pub final_values: Vec<f64>,
    /// (final - initial) / initial per path, same order as `final_values`
    pub returns: Vec<f64>,
    /// Σ wᵢ · P0ᵢ at t = 0
    pub initial_value: f64,
    /// Distributional risk statistics over `returns`
    pub metrics: RiskMetrics,
    /// Wall-clock simulation time in seconds
    pub elapsed_secs: f64,
    /// Simulated paths per second
    pub paths_per_sec: f64,
}

/// Batched Monte Carlo simulation engine
pub struct McEngine {
    config: EngineConfig,
}

impl McEngine {
    /// Create an engine with a validated configuration
    pub fn new(config: EngineConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of batches the run will be partitioned into
    pub fn n_batches(&self) -> usize {
        let batch = self.config.effective_batch_size();
        (self.config.n_simulations + batch - 1) / batch
    }

    /// Run the full simulation and derive risk metrics
    ///
    /// All validation — portfolio preconditions (done at portfolio
    /// construction), memory ceiling, Cholesky factorization — happens
    /// before the first shock is drawn. Any batch failure aborts the whole
    /// run; partial results are never returned.
    ///
    /// # Errors
    ///
    /// - `NumericalInstability` if the correlation matrix is not positive
    ///   definite
    /// - `ResourceExhausted` if one batch tensor would exceed
    ///   [`MAX_BATCH_TENSOR_BYTES`]
    /// - `InvalidConfiguration` for a horizon yielding zero timesteps
    pub fn run(&self, portfolio: &PortfolioConfig) -> SimResult<SimulationResult> {
        let n_simulations = self.config.n_simulations;
        let batch_size = self.config.effective_batch_size();
        let n_steps = self.config.n_steps()?;
        let n_assets = portfolio.n_assets();
        let dt = 1.0 / TRADING_DAYS_PER_YEAR;

        let tensor_bytes = batch_size
            .saturating_mul(n_steps)
            .saturating_mul(n_assets)
            .saturating_mul(std::mem::size_of::<f64>());
        if tensor_bytes > MAX_BATCH_TENSOR_BYTES {
            return Err(SimError::ResourceExhausted {
                requested_bytes: tensor_bytes,
                limit_bytes: MAX_BATCH_TENSOR_BYTES,
            });
        }

        // Fails fast on an inconsistent correlation matrix, before any
        // shock memory is allocated
        let sampler = CorrelatedSampler::new(portfolio.correlation())?;
        let factory = RngFactory::new(self.config.seed);

        let initial_value = portfolio.initial_value();

        let timer = Timer::new();
        let mut final_values = vec![0.0_f64; n_simulations];

        for (batch_idx, chunk) in final_values.chunks_mut(batch_size).enumerate() {
            let first_path = (batch_idx * batch_size) as u64;
            let n_paths = chunk.len();

            let shocks = sampler.sample_batch(&factory, first_path, n_paths, n_steps);
            let prices = terminal_prices(&shocks, portfolio, dt);
            let values = aggregate_portfolio(&prices, portfolio.weights());

            chunk.copy_from_slice(
                values
                    .as_slice()
                    .ok_or_else(|| SimError::NumericalInstability {
                        method: "portfolio aggregation".to_string(),
                        reason: "batch value vector is not contiguous".to_string(),
                    })?,
            );
            // shock tensor and price matrix drop here; only the result
            // vector persists across batches
        }

        let elapsed_secs = timer.elapsed_ms() / 1000.0;
        let paths_per_sec = if elapsed_secs > 0.0 {
            n_simulations as f64 / elapsed_secs
        } else {
            f64::INFINITY
        };

        let returns: Vec<f64> = final_values
            .iter()
            .map(|v| (v - initial_value) / initial_value)
            .collect();

        let metrics = RiskMetrics::from_returns(&returns)?;

        Ok(SimulationResult {
            final_values,
            returns,
            initial_value,
            metrics,
            elapsed_secs,
            paths_per_sec,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_validation() {
        assert!(McEngine::new(EngineConfig::default()).is_ok());

        assert!(McEngine::new(EngineConfig {
            n_simulations: 0,
            ..Default::default()
        })
        .is_err());

        assert!(McEngine::new(EngineConfig {
            batch_size: 0,
            ..Default::default()
        })
        .is_err());

        assert!(McEngine::new(EngineConfig {
            horizon_years: -1.0,
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn test_short_horizon_yields_zero_steps() {
        // Under half a trading day rounds to zero steps
        let cfg = EngineConfig {
            horizon_years: 0.001,
            ..Default::default()
        };
        assert!(cfg.n_steps().is_err());
    }

    #[test]
    fn test_one_year_is_252_steps() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.n_steps().unwrap(), 252);
    }

    #[test]
    fn test_oversized_batch_clamps_to_single_batch() {
        let engine = McEngine::new(EngineConfig {
            n_simulations: 1_000,
            batch_size: 50_000,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(engine.n_batches(), 1);
    }

    #[test]
    fn test_partial_last_batch() {
        let engine = McEngine::new(EngineConfig {
            n_simulations: 2_500,
            batch_size: 1_000,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(engine.n_batches(), 3);
    }

    #[test]
    fn test_memory_ceiling_enforced() {
        let engine = McEngine::new(EngineConfig {
            n_simulations: 1_000_000_000,
            batch_size: 1_000_000_000,
            horizon_years: 1.0,
            seed: 42,
        })
        .unwrap();

        let portfolio = crate::portfolio::PortfolioConfig::new(
            vec!["AAA".to_string()],
            vec![1.0],
            vec![100.0],
            vec![0.1],
            vec![0.2],
            nalgebra::DMatrix::identity(1, 1),
        )
        .unwrap();

        let result = engine.run(&portfolio);
        assert!(matches!(result, Err(SimError::ResourceExhausted { .. })));
    }
}
