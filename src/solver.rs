// src/solver.rs
//! Two-sided optimal-stopping solver
//!
//! # The Dynamic Program
//!
//! For writer-stop time `s` and holder-stop time `t` the game payoff is
//!
//! ```text
//! R(s, t) = X[s]  if s < t
//!           Y[t]  otherwise
//! ```
//!
//! Backward in time the solver builds the strategy pair `(sigma, tau)`
//! approximating the equilibrium of the stopping game. Row `j` of each
//! strategy matrix holds the optimal stopping time restricted to
//! `{j+1, ..., L}`; row `L-1` is identically `L` (forced terminal stop).
//!
//! The continuation estimate at step `j` is either the pathwise realized
//! future payoff under the step-`j+1` strategy ([`Continuation::Exact`]) or
//! its least-squares projection onto a polynomial basis of the current asset
//! price ([`Continuation::LeastSquares`]). In regression mode, paths whose
//! holder payoff is zero are masked to covariate 0 / target 0 so they do not
//! pollute the fit; those paths are not decision points and propagate their
//! strategies unchanged.
//!
//! The decision tie-breaks are asymmetric and load-bearing: the holder
//! exercises on `Y >= c`, the writer terminates only on `X < c`. Choosing
//! `m` too close to the in-the-money sample size degrades the fit; that is a
//! numerical-quality issue the caller owns, not a solver error.

use crate::error::{GccError, GccResult};
use crate::models::PathMatrix;
use crate::polynomials::{lse, BasisFamily};
use ndarray::{Array1, Array2};

/// How the continuation value is estimated at each backward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Pathwise realized future payoff; no cross-path information.
    Exact,
    /// Least-squares projection onto `m` basis functions of the asset price.
    LeastSquares { m: usize, family: BasisFamily },
}

impl Continuation {
    /// Tag used in result records.
    pub fn describe(&self) -> String {
        match self {
            Continuation::Exact => "exact".to_string(),
            Continuation::LeastSquares { m, family } => {
                format!("lse(m={}, {})", m, family.name())
            }
        }
    }
}

pub(crate) fn check_shapes(
    s: &PathMatrix,
    x: &Array2<f64>,
    y: &Array2<f64>,
) -> GccResult<()> {
    if x.dim() != s.dim() {
        return Err(GccError::ShapeMismatch {
            context: "writer payoff matrix X".to_string(),
            expected: s.dim(),
            found: x.dim(),
        });
    }
    if y.dim() != s.dim() {
        return Err(GccError::ShapeMismatch {
            context: "holder payoff matrix Y".to_string(),
            expected: s.dim(),
            found: y.dim(),
        });
    }
    if s.nrows() < 2 {
        return Err(GccError::InvalidConfiguration {
            field: "steps".to_string(),
            reason: "need at least one time step past the valuation date".to_string(),
        });
    }
    Ok(())
}

/// Pathwise payoff `R(sigma_j, tau_j)` under the strategies stored in row
/// `j` of `sigma` and `tau`.
pub fn realized_payoff(
    x: &Array2<f64>,
    y: &Array2<f64>,
    sigma: &Array2<usize>,
    tau: &Array2<usize>,
    j: usize,
) -> Array1<f64> {
    Array1::from_shape_fn(x.ncols(), |n| {
        let writer_stop = sigma[[j, n]];
        let holder_stop = tau[[j, n]];
        if writer_stop < holder_stop {
            x[[writer_stop, n]]
        } else {
            y[[holder_stop, n]]
        }
    })
}

/// Compute the optimal stopping strategy pair `(sigma, tau)` for the game
/// payoff `R`, backward from maturity.
///
/// `sigma` and `tau` are `L x N`; row `j` holds stopping times in
/// `{j+1, ..., L}`.
pub fn optimal_stopping(
    s: &PathMatrix,
    x: &Array2<f64>,
    y: &Array2<f64>,
    continuation: Continuation,
) -> GccResult<(Array2<usize>, Array2<usize>)> {
    check_shapes(s, x, y)?;

    let l = s.nrows() - 1;
    let n = s.ncols();

    // Base case: both parties are forced to stop at maturity.
    let mut sigma = Array2::<usize>::from_elem((l, n), l);
    let mut tau = Array2::<usize>::from_elem((l, n), l);

    if l < 2 {
        return Ok((sigma, tau));
    }

    for j in (0..l - 1).rev() {
        let cont = match continuation {
            Continuation::Exact => realized_payoff(x, y, &sigma, &tau, j + 1),
            Continuation::LeastSquares { m, family } => {
                let mut covariate = s.row(j).to_owned();
                let mut target = realized_payoff(x, y, &sigma, &tau, j + 1);
                // Mask out-of-the-money paths; the rows stay in the sample.
                for p in 0..n {
                    if y[[j, p]] == 0.0 {
                        covariate[p] = 0.0;
                        target[p] = 0.0;
                    }
                }
                lse(&covariate, &target, m, family)?.fitted
            }
        };

        for p in 0..n {
            // Out-of-the-money: step j is not a decision point.
            if y[[j, p]] == 0.0 {
                tau[[j, p]] = tau[[j + 1, p]];
                sigma[[j, p]] = sigma[[j + 1, p]];
                continue;
            }

            // Holder exercises when immediate value meets the estimate.
            tau[[j, p]] = if y[[j, p]] >= cont[p] {
                j + 1
            } else {
                tau[[j + 1, p]]
            };

            // Writer terminates only when strictly cheaper than continuing.
            sigma[[j, p]] = if x[[j, p]] < cont[p] {
                j + 1
            } else {
                sigma[[j + 1, p]]
            };
        }
    }

    Ok((sigma, tau))
}
