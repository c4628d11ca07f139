// src/correlate.rs
//! Correlated Shock Generation
//!
//! # Mathematical Framework
//!
//! Given a target correlation matrix C (N×N, symmetric, unit diagonal), the
//! lower-triangular Cholesky factor L satisfies:
//! ```text
//! L · Lᵀ = C
//! ```
//! For an independent standard-normal vector z ~ N(0, I), the transformed
//! vector L·z has covariance L·I·Lᵀ = C. Applying L to every
//! (path, timestep) N-vector therefore produces shocks whose empirical
//! cross-asset correlation converges to C as the number of rows grows.
//!
//! The transform is applied per row — never across a wrongly flattened
//! array — so the (path, timestep) → N-vector grouping is preserved.
//!
//! # Failure Mode
//!
//! Cholesky factorization fails when C is not positive definite, e.g. a set
//! of pairwise correlations no joint distribution can realize (0.9, 0.9,
//! -0.9 among three assets). This is a static property of the input, so it
//! is surfaced as a `NumericalInstability` at sampler construction, before
//! a single random number is consumed. Retrying cannot help.

use crate::error::{SimError, SimResult};
use crate::rng::{get_normal_draw, RngFactory};
use nalgebra::DMatrix;
use ndarray::parallel::prelude::*;
use ndarray::{Array3, Axis};

/// Produces batches of correlated standard-normal shocks
pub struct CorrelatedSampler {
    /// Lower-triangular Cholesky factor of the correlation matrix
    factor: DMatrix<f64>,
    n_assets: usize,
}

impl CorrelatedSampler {
    /// Factorize the correlation matrix
    ///
    /// # Errors
    ///
    /// `SimError::NumericalInstability` if the matrix is not positive
    /// definite.
    pub fn new(correlation: &DMatrix<f64>) -> SimResult<Self> {
        let n_assets = correlation.nrows();
        let cholesky = correlation
            .clone()
            .cholesky()
            .ok_or_else(|| SimError::NumericalInstability {
                method: "Cholesky decomposition".to_string(),
                reason: "correlation matrix is not positive definite \
                         (inconsistent pairwise correlations)"
                    .to_string(),
            })?;

        Ok(Self {
            factor: cholesky.l(),
            n_assets,
        })
    }

    pub fn n_assets(&self) -> usize {
        self.n_assets
    }

    /// Generate one batch of correlated shocks, shape (n_paths, n_steps, n_assets)
    ///
    /// Paths fill in parallel. Path `p` of this batch consumes the
    /// sub-stream keyed by the global index `first_path + p`, so the same
    /// path draws the same numbers regardless of batch layout.
    pub fn sample_batch(
        &self,
        factory: &RngFactory,
        first_path: u64,
        n_paths: usize,
        n_steps: usize,
    ) -> Array3<f64> {
        let n = self.n_assets;
        let mut shocks = Array3::<f64>::zeros((n_paths, n_steps, n));

        shocks
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(p, mut path)| {
                let mut rng = factory.path_rng(first_path + p as u64);
                let mut z = vec![0.0_f64; n];
                for t in 0..n_steps {
                    for zi in z.iter_mut() {
                        *zi = get_normal_draw(&mut rng);
                    }
                    // Row-wise correlation: shock_i = Σ_{j≤i} L[i][j] · z_j
                    for i in 0..n {
                        let mut acc = 0.0;
                        for (j, &zj) in z.iter().enumerate().take(i + 1) {
                            acc += self.factor[(i, j)] * zj;
                        }
                        path[[t, i]] = acc;
                    }
                }
            });

        shocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_factor_is_identity() {
        let corr = DMatrix::<f64>::identity(3, 3);
        let sampler = CorrelatedSampler::new(&corr).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((sampler.factor[(i, j)] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_non_positive_definite_fails() {
        // Pairwise correlations 0.9, 0.9, -0.9 are jointly impossible
        let corr = DMatrix::from_row_slice(
            3,
            3,
            &[1.0, 0.9, 0.9, 0.9, 1.0, -0.9, 0.9, -0.9, 1.0],
        );
        let result = CorrelatedSampler::new(&corr);
        assert!(matches!(
            result,
            Err(SimError::NumericalInstability { .. })
        ));
    }

    #[test]
    fn test_empirical_correlation_converges() {
        let rho = 0.7;
        let corr = DMatrix::from_row_slice(2, 2, &[1.0, rho, rho, 1.0]);
        let sampler = CorrelatedSampler::new(&corr).unwrap();
        let factory = RngFactory::new(1234);

        let shocks = sampler.sample_batch(&factory, 0, 2000, 10);

        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xx = 0.0;
        let mut sum_yy = 0.0;
        let mut sum_xy = 0.0;
        let rows = (2000 * 10) as f64;
        for p in 0..2000 {
            for t in 0..10 {
                let x = shocks[[p, t, 0]];
                let y = shocks[[p, t, 1]];
                sum_x += x;
                sum_y += y;
                sum_xx += x * x;
                sum_yy += y * y;
                sum_xy += x * y;
            }
        }
        let mean_x = sum_x / rows;
        let mean_y = sum_y / rows;
        let var_x = sum_xx / rows - mean_x * mean_x;
        let var_y = sum_yy / rows - mean_y * mean_y;
        let cov = sum_xy / rows - mean_x * mean_y;
        let empirical_rho = cov / (var_x * var_y).sqrt();

        assert!(
            (empirical_rho - rho).abs() < 0.03,
            "empirical correlation {} too far from target {}",
            empirical_rho,
            rho
        );
    }

    #[test]
    fn test_batch_layout_does_not_change_draws() {
        let corr = DMatrix::<f64>::identity(2, 2);
        let sampler = CorrelatedSampler::new(&corr).unwrap();
        let factory = RngFactory::new(99);

        let whole = sampler.sample_batch(&factory, 0, 8, 4);
        let first = sampler.sample_batch(&factory, 0, 5, 4);
        let rest = sampler.sample_batch(&factory, 5, 3, 4);

        for p in 0..5 {
            for t in 0..4 {
                for a in 0..2 {
                    assert_eq!(whole[[p, t, a]], first[[p, t, a]]);
                }
            }
        }
        for p in 0..3 {
            for t in 0..4 {
                for a in 0..2 {
                    assert_eq!(whole[[5 + p, t, a]], rest[[p, t, a]]);
                }
            }
        }
    }
}
