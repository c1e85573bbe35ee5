// src/claims.rs
//! Claim payoff mappers
//!
//! # Payoff Conventions
//!
//! Every claim maps a simulated [`PathMatrix`] into the payoff pair `(X, Y)`:
//!
//! - `Y[j, n]` — payoff to the holder if the *holder* exercises at step `j`
//!   on path `n`,
//! - `X[j, n]` — payoff to the holder if the *writer* terminates at step `j`
//!   on path `n`.
//!
//! At maturity the distinction disappears, so every mapper overwrites the
//! terminal row with `X[L, :] = Y[L, :]` rather than relying on the general
//! formula to produce the equality.

use crate::error::{validation::*, GccError, GccResult};
use crate::models::PathMatrix;
use ndarray::Array2;

/// Termination penalty paid by the writer on top of the exercise value.
///
/// A `Varying` schedule carries one penalty per time step and path and must
/// match the path-matrix shape.
#[derive(Debug, Clone)]
pub enum Penalty {
    Flat(f64),
    Varying(Array2<f64>),
}

impl Penalty {
    fn validate(&self, shape: (usize, usize)) -> GccResult<()> {
        match self {
            Penalty::Flat(delta) => validate_non_negative("penalty", *delta),
            Penalty::Varying(schedule) => {
                if schedule.dim() != shape {
                    return Err(GccError::ShapeMismatch {
                        context: "penalty schedule".to_string(),
                        expected: shape,
                        found: schedule.dim(),
                    });
                }
                Ok(())
            }
        }
    }

    fn add_to(&self, y: &Array2<f64>) -> Array2<f64> {
        match self {
            Penalty::Flat(delta) => y.mapv(|v| v + delta),
            Penalty::Varying(schedule) => y + schedule,
        }
    }
}

/// The four supported game contingent claims.
///
/// Each variant implements the same `(PathMatrix, parameters) -> (X, Y)`
/// contract via [`Claim::payoffs`].
#[derive(Debug, Clone)]
pub enum Claim {
    /// Put the writer may call back early against a penalty:
    /// `Y = max(K - S, 0)`, `X = Y + δ`.
    CallablePut { strike: f64, penalty: f64 },

    /// Bond convertible into `ratio` units of stock, recallable at `recall`:
    /// `Y = γ·S` (floored at the face value 1 at maturity), `X = max(γ·S, K)`.
    ConvertibleBond { recall: f64, ratio: f64 },

    /// Game put: put intrinsic for the holder, penalised termination for the
    /// writer; the penalty may vary per time step and path.
    GamePut { strike: f64, penalty: Penalty },

    /// Game call: call intrinsic for the holder, penalised termination for
    /// the writer.
    GameCall { strike: f64, penalty: Penalty },
}

impl Claim {
    /// Short tag used in result records.
    pub fn kind(&self) -> &'static str {
        match self {
            Claim::CallablePut { .. } => "callable_put",
            Claim::ConvertibleBond { .. } => "convertible_bond",
            Claim::GamePut { .. } => "game_put",
            Claim::GameCall { .. } => "game_call",
        }
    }

    pub fn validate(&self, path_shape: (usize, usize)) -> GccResult<()> {
        match self {
            Claim::CallablePut { strike, penalty } => {
                validate_positive("strike", *strike)?;
                validate_non_negative("penalty", *penalty)
            }
            Claim::ConvertibleBond { recall, ratio } => {
                validate_positive("recall", *recall)?;
                validate_positive("ratio", *ratio)
            }
            Claim::GamePut { strike, penalty } | Claim::GameCall { strike, penalty } => {
                validate_positive("strike", *strike)?;
                penalty.validate(path_shape)
            }
        }
    }

    /// Map a path matrix into the payoff pair `(X, Y)`.
    pub fn payoffs(&self, s: &PathMatrix) -> GccResult<(Array2<f64>, Array2<f64>)> {
        self.validate(s.dim())?;
        let l = s.nrows() - 1;

        let (mut x, y) = match self {
            Claim::CallablePut { strike, penalty } => {
                let y = s.mapv(|v| (strike - v).max(0.0));
                let x = y.mapv(|v| v + penalty);
                (x, y)
            }
            Claim::ConvertibleBond { recall, ratio } => {
                let mut y = s.mapv(|v| ratio * v);
                let x = s.mapv(|v| (ratio * v).max(*recall));
                // Face value 1 floors the conversion value at maturity.
                for v in y.row_mut(l).iter_mut() {
                    *v = v.max(1.0);
                }
                (x, y)
            }
            Claim::GamePut { strike, penalty } => {
                let y = s.mapv(|v| (strike - v).max(0.0));
                let x = penalty.add_to(&y);
                (x, y)
            }
            Claim::GameCall { strike, penalty } => {
                let y = s.mapv(|v| (v - strike).max(0.0));
                let x = penalty.add_to(&y);
                (x, y)
            }
        };

        // No writer/holder distinction at maturity.
        x.row_mut(l).assign(&y.row(l));

        Ok((x, y))
    }

    /// Parameters echoed into the flat result record; large schedules are
    /// summarised, never embedded.
    pub fn flat_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Claim::CallablePut { strike, penalty } => vec![
                ("claim", self.kind().to_string()),
                ("strike", strike.to_string()),
                ("penalty", penalty.to_string()),
            ],
            Claim::ConvertibleBond { recall, ratio } => vec![
                ("claim", self.kind().to_string()),
                ("recall", recall.to_string()),
                ("ratio", ratio.to_string()),
            ],
            Claim::GamePut { strike, penalty } | Claim::GameCall { strike, penalty } => {
                let penalty_str = match penalty {
                    Penalty::Flat(delta) => delta.to_string(),
                    Penalty::Varying(_) => "varying".to_string(),
                };
                vec![
                    ("claim", self.kind().to_string()),
                    ("strike", strike.to_string()),
                    ("penalty", penalty_str),
                ]
            }
        }
    }
}
