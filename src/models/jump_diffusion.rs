// src/models/jump_diffusion.rs
use super::{antithetic_normals, PathMatrix, PathModel};
use crate::error::{validation::*, GccError, GccResult};
use crate::rng::{GenState, RngFactory};
use ndarray::parallel::prelude::*;
use ndarray::{s, Array2, Axis};
use rand_distr::{Distribution, Exp};

/// Risk-neutral jump-diffusion with non-negative, exponentially distributed
/// jumps and a continuous dividend payment:
///
/// ```text
/// S_t = S_0 exp(σ W_t + μ t + J_t)
/// ```
///
/// where `J` is a compound Poisson process with jump intensity `η > 0` and
/// `Exp(θ)` increments (`θ > 1`), and the compensated drift is
/// `μ = r - d - σ²/2 + η/(1-θ)`.
pub struct JumpDiffusion {
    pub s0: f64,
    pub r: f64,
    pub volatility: f64,
    /// Continuous dividend rate of the underlying.
    pub d: f64,
    /// Jump intensity.
    pub eta: f64,
    /// Exponential parameter of the jump sizes; must exceed 1.
    pub theta: f64,
}

impl JumpDiffusion {
    pub fn new(s0: f64, r: f64, volatility: f64, d: f64, eta: f64, theta: f64) -> Self {
        JumpDiffusion {
            s0,
            r,
            volatility,
            d,
            eta,
            theta,
        }
    }

    pub fn validate(&self) -> GccResult<()> {
        validate_positive("s0", self.s0)?;
        validate_finite("r", self.r)?;
        validate_positive("volatility", self.volatility)?;
        validate_non_negative("d", self.d)?;
        validate_positive("eta", self.eta)?;
        validate_theta(self.theta)?;
        Ok(())
    }
}

impl PathModel for JumpDiffusion {
    fn simulate(
        &self,
        t: f64,
        steps: usize,
        paths: usize,
        state: Option<GenState>,
    ) -> GccResult<(PathMatrix, GenState)> {
        self.validate()?;
        validate_positive("t", t)?;
        validate_steps(steps)?;
        validate_paths(paths)?;

        let state = state.unwrap_or_else(GenState::from_entropy);
        let factory = RngFactory::new(state);
        let mut rng = factory.create_rng(0);

        let dt = t / steps as f64;
        let drift = (self.r - self.d - 0.5 * self.volatility * self.volatility
            + self.eta / (1.0 - self.theta))
            * dt;
        let vol_sqrt_dt = self.volatility * dt.sqrt();

        // Diffusion and compensated drift, cumulatively summed in time.
        let eps = antithetic_normals(&mut rng, steps, paths);
        let mut exponent = eps.mapv(|z| drift + vol_sqrt_dt * z);
        exponent.accumulate_axis_inplace(Axis(0), |&prev, curr| *curr += prev);

        // Exp::new only fails for a non-positive rate, which validate() has
        // already ruled out.
        let arrival_dist = Exp::new(self.eta).map_err(|_| GccError::InvalidParameters {
            parameter: "eta".to_string(),
            value: self.eta,
            constraint: "must be a valid exponential rate".to_string(),
        })?;
        let size_dist = Exp::new(self.theta).map_err(|_| GccError::InvalidParameters {
            parameter: "theta".to_string(),
            value: self.theta,
            constraint: "must be a valid exponential rate".to_string(),
        })?;

        // Compound Poisson totals, one independent clock per path. Stream
        // n+1 of the factory drives path n, so the result is identical for
        // any rayon thread count.
        let mut jumps = Array2::<f64>::zeros((steps, paths));
        jumps
            .axis_iter_mut(Axis(1))
            .into_par_iter()
            .enumerate()
            .for_each(|(n, mut col)| {
                let mut path_rng = factory.create_rng(n as u64 + 1);
                let mut total = 0.0;
                let mut next_arrival = arrival_dist.sample(&mut path_rng);
                for j in 0..steps {
                    let cell_end = (j as f64 + 1.0) * dt;
                    // Advance the simulated clock past every jump that lands
                    // in this grid cell.
                    while cell_end > next_arrival {
                        total += size_dist.sample(&mut path_rng);
                        next_arrival += arrival_dist.sample(&mut path_rng);
                    }
                    col[j] = total;
                }
            });

        exponent += &jumps;

        let mut prices = Array2::<f64>::zeros((steps + 1, paths));
        prices.row_mut(0).fill(self.s0);
        prices
            .slice_mut(s![1.., ..])
            .assign(&exponent.mapv(|x| self.s0 * x.exp()));

        Ok((prices, state))
    }
}
