// src/models/mod.rs
//! Path simulators for the underlying asset
//!
//! Both simulators share the [`PathModel`] contract: given a maturity, a step
//! count and an (even) path count they produce a `(L+1) x N` [`PathMatrix`]
//! together with the [`GenState`](crate::rng::GenState) token that replays it.
//!
//! Columns `N/2..N` are the antithetic mirror of columns `0..N/2` (built from
//! negated normal draws). Downstream code must not reorder columns
//! independently, or the built-in variance-reduction pairing is lost.

pub mod black_scholes;
pub mod jump_diffusion;

pub use black_scholes::BlackScholes;
pub use jump_diffusion::JumpDiffusion;

use crate::error::GccResult;
use crate::rng::{self, GenState};
use ndarray::Array2;
use rand::Rng;

/// `(L+1) x N` matrix of simulated asset values; row = time step `0..=L`
/// (row 0 is the valuation date), column = path.
pub type PathMatrix = Array2<f64>;

/// Shared contract of the path simulators.
pub trait PathModel {
    /// Simulate `paths` trajectories over `steps` time steps up to maturity
    /// `t` (in years). Passing back the returned [`GenState`] reproduces the
    /// identical matrix.
    fn simulate(
        &self,
        t: f64,
        steps: usize,
        paths: usize,
        state: Option<GenState>,
    ) -> GccResult<(PathMatrix, GenState)>;
}

/// Draw a `steps x paths` block of standard normals where the right half is
/// the negation of the left half. Draw order is row-major over the left
/// half, so a fixed seed yields a fixed block.
pub(crate) fn antithetic_normals<R: Rng + ?Sized>(
    rng: &mut R,
    steps: usize,
    paths: usize,
) -> Array2<f64> {
    let half = paths / 2;
    let mut eps = Array2::<f64>::zeros((steps, paths));
    for j in 0..steps {
        for n in 0..half {
            let z = rng::get_normal_draw(rng);
            eps[[j, n]] = z;
            eps[[j, half + n]] = -z;
        }
    }
    eps
}
