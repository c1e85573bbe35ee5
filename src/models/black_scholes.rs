// src/models/black_scholes.rs
use super::{antithetic_normals, PathMatrix, PathModel};
use crate::error::{validation::*, GccResult};
use crate::rng::{GenState, RngFactory};
use ndarray::{s, Array2, Axis};

/// Risk-neutral Black-Scholes diffusion:
///
/// ```text
/// dS_t = r S_t dt + σ S_t dW_t
/// ```
///
/// Paths use the exact solution of the SDE, so each step applies the
/// log-return `(r - σ²/2) dt + σ √dt Z` with `Z ~ N(0,1)`.
pub struct BlackScholes {
    pub s0: f64,
    pub r: f64,
    pub volatility: f64,
}

impl BlackScholes {
    pub fn new(s0: f64, r: f64, volatility: f64) -> Self {
        BlackScholes { s0, r, volatility }
    }

    pub fn validate(&self) -> GccResult<()> {
        validate_positive("s0", self.s0)?;
        validate_finite("r", self.r)?;
        validate_positive("volatility", self.volatility)?;
        Ok(())
    }
}

impl PathModel for BlackScholes {
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
        let drift = (self.r - 0.5 * self.volatility * self.volatility) * dt;
        let vol_sqrt_dt = self.volatility * dt.sqrt();

        // Per-cell log-returns, cumulatively summed down the time axis.
        let eps = antithetic_normals(&mut rng, steps, paths);
        let mut log_returns = eps.mapv(|z| drift + vol_sqrt_dt * z);
        log_returns.accumulate_axis_inplace(Axis(0), |&prev, curr| *curr += prev);

        let mut prices = Array2::<f64>::zeros((steps + 1, paths));
        prices.row_mut(0).fill(self.s0);
        prices
            .slice_mut(s![1.., ..])
            .assign(&log_returns.mapv(|x| self.s0 * x.exp()));

        Ok((prices, state))
    }
}
