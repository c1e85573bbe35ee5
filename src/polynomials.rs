// src/polynomials.rs
//! Polynomial regression basis for continuation-value estimation
//!
//! Both families are generated by their three-term recurrences, seeded by
//! the first two members:
//!
//! - Hermite (physicists'): `B_0 = 1`, `B_1 = x`,
//!   `B_i = x B_{i-1} - (i-1) B_{i-2}`
//! - Laguerre: `B_0 = 1`, `B_1 = 1 - x`,
//!   `B_i = (1/i) [(2i - 1 - x) B_{i-1} - (i-1) B_{i-2}]`
//!
//! The least-squares fit solves `target ≈ basis(x, m) · a` with an SVD. The
//! order `m` must stay small relative to the sample count; an ill-conditioned
//! fit is a known limitation here, not a guarded failure — only an outright
//! failed solve surfaces as an error.

use crate::error::{GccError, GccResult};
use nalgebra::{DMatrix, DVector};
use ndarray::Array1;

/// The polynomial family spanning the projection subspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisFamily {
    Hermite,
    Laguerre,
}

impl BasisFamily {
    pub fn name(&self) -> &'static str {
        match self {
            BasisFamily::Hermite => "hermite",
            BasisFamily::Laguerre => "laguerre",
        }
    }
}

/// Evaluate basis functions `0..m` at every point of `x`, as an `n x m`
/// design matrix.
pub fn eval_basis(x: &Array1<f64>, m: usize, family: BasisFamily) -> GccResult<DMatrix<f64>> {
    if m == 0 {
        return Err(GccError::InvalidConfiguration {
            field: "m".to_string(),
            reason: "basis order must be at least 1".to_string(),
        });
    }

    let n = x.len();
    let mut basis = DMatrix::<f64>::zeros(n, m);
    for (row, &xi) in x.iter().enumerate() {
        basis[(row, 0)] = 1.0;
        if m > 1 {
            basis[(row, 1)] = match family {
                BasisFamily::Hermite => xi,
                BasisFamily::Laguerre => 1.0 - xi,
            };
        }
    }

    for col in 2..m {
        let i = col as f64;
        for row in 0..n {
            let xi = x[row];
            basis[(row, col)] = match family {
                BasisFamily::Hermite => {
                    xi * basis[(row, col - 1)] - (i - 1.0) * basis[(row, col - 2)]
                }
                BasisFamily::Laguerre => {
                    ((2.0 * i - 1.0 - xi) * basis[(row, col - 1)]
                        - (i - 1.0) * basis[(row, col - 2)])
                        / i
                }
            };
        }
    }

    Ok(basis)
}

/// Result of a least-squares continuation fit.
pub struct LseFit {
    /// The `m` regression coefficients.
    pub coefficients: DVector<f64>,
    /// Fitted (projected) value at each input point.
    pub fitted: Array1<f64>,
}

/// Least-squares fit of `target` against the first `m` basis functions
/// evaluated at `x`.
pub fn lse(
    x: &Array1<f64>,
    target: &Array1<f64>,
    m: usize,
    family: BasisFamily,
) -> GccResult<LseFit> {
    if x.len() != target.len() {
        return Err(GccError::ShapeMismatch {
            context: "least-squares fit".to_string(),
            expected: (x.len(), 1),
            found: (target.len(), 1),
        });
    }

    let basis = eval_basis(x, m, family)?;
    let rhs = DVector::from_iterator(target.len(), target.iter().cloned());

    let svd = basis.clone().svd(true, true);
    let coefficients =
        svd.solve(&rhs, 1.0e-12)
            .map_err(|reason| GccError::NumericalInstability {
                method: "least-squares fit".to_string(),
                reason: reason.to_string(),
            })?;

    let projected = &basis * &coefficients;
    let fitted = Array1::from_iter(projected.iter().cloned());

    Ok(LseFit {
        coefficients,
        fitted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_hermite_recurrence_values() {
        let x = array![2.0];
        let basis = eval_basis(&x, 4, BasisFamily::Hermite).unwrap();
        // B0..B3 at x = 2: 1, 2, 3, 2
        assert!((basis[(0, 0)] - 1.0).abs() < 1e-12);
        assert!((basis[(0, 1)] - 2.0).abs() < 1e-12);
        assert!((basis[(0, 2)] - 3.0).abs() < 1e-12);
        assert!((basis[(0, 3)] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_laguerre_recurrence_values() {
        let x = array![1.0];
        let basis = eval_basis(&x, 3, BasisFamily::Laguerre).unwrap();
        // L0(1) = 1, L1(1) = 0, L2(1) = (1 - 4 + 2)/2 = -1/2
        assert!((basis[(0, 0)] - 1.0).abs() < 1e-12);
        assert!(basis[(0, 1)].abs() < 1e-12);
        assert!((basis[(0, 2)] + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_order_zero_rejected() {
        let x = array![1.0, 2.0];
        assert!(eval_basis(&x, 0, BasisFamily::Hermite).is_err());
    }

    #[test]
    fn test_constant_basis_fits_sample_mean() {
        // With m = 1 the design matrix is a column of ones, so the fitted
        // value at every point is the arithmetic mean of the targets.
        let x = array![80.0, 95.0, 110.0, 130.0];
        let target = array![3.0, 7.0, 1.0, 5.0];
        let fit = lse(&x, &target, 1, BasisFamily::Laguerre).unwrap();

        let mean = 4.0;
        for &v in fit.fitted.iter() {
            assert!((v - mean).abs() < 1e-10, "fitted {} != mean {}", v, mean);
        }
    }

    #[test]
    fn test_linear_target_recovered_exactly() {
        let x = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let target = x.mapv(|v| 3.0 - 2.0 * v);
        let fit = lse(&x, &target, 2, BasisFamily::Hermite).unwrap();

        for (f, t) in fit.fitted.iter().zip(target.iter()) {
            assert!((f - t).abs() < 1e-9);
        }
        assert_eq!(fit.coefficients.len(), 2);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let x = array![1.0, 2.0];
        let target = array![1.0, 2.0, 3.0];
        assert!(lse(&x, &target, 1, BasisFamily::Hermite).is_err());
    }
}
