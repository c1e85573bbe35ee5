// src/valuation.rs
//! Valuation of a game contingent claim from simulated paths
//!
//! # Discounting Convention
//!
//! The payoff matrices are discounted once, before the solver runs, by
//! `exp(-r j dt)` for the interior rows `j = 1..L-1`. Row 0 is "now" and the
//! terminal row is reached only through the stopping logic, which already
//! operates on discounted values from step 1 onward.
//!
//! # Aggregation
//!
//! With per-path realized payoffs `R_n = R(sigma_0, tau_0)` the price is
//!
//! ```text
//! V = min(X[0,0], max(Y[0,0], mean_n R_n))
//! ```
//!
//! (the time-0 payoffs are scalars because S0 is deterministic; a random
//! initial price would need a generalised formula). The sample variance is
//! the unbiased variance of the clamped per-path payoffs
//! `V_n = min(X[0,0], max(Y[0,0], R_n))` around `V`.

use crate::claims::Claim;
use crate::error::{validation::*, GccError, GccResult};
use crate::math_utils::Timer;
use crate::models::PathMatrix;
use crate::rng::GenState;
use crate::solver::{optimal_stopping, realized_payoff, Continuation};
use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use std::time::Duration;

/// Valuation run configuration.
#[derive(Debug, Clone)]
pub struct ValuationConfig {
    /// Risk-free interest rate.
    pub rate: f64,
    /// Maturity in years.
    pub maturity: f64,
    /// Continuation-value estimator; `Exact` when no regression order is set.
    pub continuation: Continuation,
    /// Generator-state token echoed into the result for replayability.
    pub gen_state: Option<GenState>,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        ValuationConfig {
            rate: 0.01,
            maturity: 1.0,
            continuation: Continuation::Exact,
            gen_state: None,
        }
    }
}

impl ValuationConfig {
    pub fn validate(&self) -> GccResult<()> {
        validate_finite("rate", self.rate)?;
        validate_positive("maturity", self.maturity)?;
        Ok(())
    }
}

/// Immutable valuation output: the price statistics plus the echoed inputs.
/// The large path/payoff matrices are consumed by the run and never stored
/// here.
#[derive(Debug, Clone)]
pub struct ValuationResult {
    pub price: f64,
    /// Unbiased Monte-Carlo sample variance of the per-path payoffs.
    pub variance: f64,
    /// Square root of the variance.
    pub deviation: f64,
    /// Wall-clock time of the valuation.
    pub duration: Duration,
    pub valued_at: DateTime<Utc>,
    pub rate: f64,
    pub maturity: f64,
    /// Number of time steps L (rows 0..=L).
    pub steps: usize,
    pub paths: usize,
    pub dt: f64,
    pub continuation: Continuation,
    pub claim: Claim,
    pub gen_state: Option<GenState>,
}

impl ValuationResult {
    /// Flat key-value view for the persistence collaborator, sorted by key
    /// so batched records line up column-for-column.
    pub fn flat_record(&self) -> Vec<(String, String)> {
        let mut record: Vec<(String, String)> = vec![
            ("V".to_string(), self.price.to_string()),
            ("var".to_string(), self.variance.to_string()),
            ("dev".to_string(), self.deviation.to_string()),
            ("r".to_string(), self.rate.to_string()),
            ("T".to_string(), self.maturity.to_string()),
            ("L".to_string(), self.steps.to_string()),
            ("N".to_string(), self.paths.to_string()),
            ("dt".to_string(), self.dt.to_string()),
            ("method".to_string(), self.continuation.describe()),
            (
                "time".to_string(),
                format!("{:.6}", self.duration.as_secs_f64()),
            ),
            ("valued_at".to_string(), self.valued_at.to_rfc3339()),
        ];
        for (key, value) in self.claim.flat_params() {
            record.push((key.to_string(), value));
        }
        if let Some(state) = self.gen_state {
            record.push(("seed".to_string(), state.seed().to_string()));
        }
        record.sort_by(|a, b| a.0.cmp(&b.0));
        record
    }
}

fn discount_payoffs(x: &mut Array2<f64>, y: &mut Array2<f64>, rate: f64, dt: f64) {
    let l = x.nrows() - 1;
    for j in 1..l {
        let factor = (-rate * j as f64 * dt).exp();
        x.row_mut(j).mapv_inplace(|v| factor * v);
        y.row_mut(j).mapv_inplace(|v| factor * v);
    }
}

fn aggregate(x0: f64, y0: f64, realized: &Array1<f64>) -> (f64, f64) {
    let n = realized.len() as f64;
    let mean = realized.sum() / n;
    let price = x0.min(y0.max(mean));
    let variance = realized
        .iter()
        .map(|&r| {
            let clamped = x0.min(y0.max(r));
            (clamped - price) * (clamped - price)
        })
        .sum::<f64>()
        / (n - 1.0);
    (price, variance)
}

fn check_result_finite(price: f64, variance: f64) -> GccResult<()> {
    if !price.is_finite() {
        return Err(GccError::NumericalInstability {
            method: "GCC valuation".to_string(),
            reason: format!("price estimate is not finite: {}", price),
        });
    }
    if !variance.is_finite() {
        return Err(GccError::NumericalInstability {
            method: "GCC valuation".to_string(),
            reason: format!("variance estimate is not finite: {}", variance),
        });
    }
    Ok(())
}

fn check_paths(s: &PathMatrix) -> GccResult<()> {
    if s.ncols() < 2 {
        return Err(GccError::MonteCarloError {
            paths: s.ncols(),
            reason: "need at least two paths for a variance estimate".to_string(),
        });
    }
    Ok(())
}

/// Value a game contingent claim on the given path matrix.
pub fn value(claim: &Claim, s: &PathMatrix, cfg: &ValuationConfig) -> GccResult<ValuationResult> {
    let timer = Timer::new();
    cfg.validate()?;
    check_paths(s)?;

    let l = s.nrows() - 1;
    let n = s.ncols();
    let dt = cfg.maturity / l as f64;

    let (mut x, mut y) = claim.payoffs(s)?;
    discount_payoffs(&mut x, &mut y, cfg.rate, dt);

    let (sigma, tau) = optimal_stopping(s, &x, &y, cfg.continuation)?;
    let realized = realized_payoff(&x, &y, &sigma, &tau, 0);

    let (price, variance) = aggregate(x[[0, 0]], y[[0, 0]], &realized);
    check_result_finite(price, variance)?;

    Ok(ValuationResult {
        price,
        variance,
        deviation: variance.sqrt(),
        duration: timer.elapsed(),
        valued_at: Utc::now(),
        rate: cfg.rate,
        maturity: cfg.maturity,
        steps: l,
        paths: n,
        dt,
        continuation: cfg.continuation,
        claim: claim.clone(),
        gen_state: cfg.gen_state,
    })
}

#[derive(Default, Clone, Copy)]
struct ShardStats {
    sum_realized: f64,
    sum_clamped: f64,
    sum_clamped_sq: f64,
    count: usize,
}

impl ShardStats {
    fn merge(self, other: ShardStats) -> ShardStats {
        ShardStats {
            sum_realized: self.sum_realized + other.sum_realized,
            sum_clamped: self.sum_clamped + other.sum_clamped,
            sum_clamped_sq: self.sum_clamped_sq + other.sum_clamped_sq,
            count: self.count + other.count,
        }
    }
}

/// Scalar backward recursion for a single path; equivalent to the exact-mode
/// solver restricted to that path's column.
fn path_realized_payoff(x_col: ndarray::ArrayView1<f64>, y_col: ndarray::ArrayView1<f64>) -> f64 {
    let l = x_col.len() - 1;
    let mut holding = y_col[l];
    if l < 2 {
        return holding;
    }
    for j in (0..l - 1).rev() {
        if y_col[j] == 0.0 {
            continue;
        }
        if y_col[j] >= holding {
            holding = y_col[j + 1];
        } else if x_col[j] < holding {
            holding = x_col[j + 1];
        }
    }
    holding
}

/// Value a claim in parallel over disjoint path shards.
///
/// Always uses the exact continuation estimator, which has no cross-path
/// coupling: each worker owns a contiguous block of columns, reads the
/// shared payoff matrices immutably, and returns partial sums that merge by
/// plain arithmetic into the same price and variance as the single-threaded
/// exact run. A panicking shard aborts the whole run.
pub fn value_parallel(
    claim: &Claim,
    s: &PathMatrix,
    cfg: &ValuationConfig,
    workers: Option<usize>,
) -> GccResult<ValuationResult> {
    let timer = Timer::new();
    cfg.validate()?;
    check_paths(s)?;

    let l = s.nrows() - 1;
    let n = s.ncols();
    let dt = cfg.maturity / l as f64;

    let (mut x, mut y) = claim.payoffs(s)?;
    discount_payoffs(&mut x, &mut y, cfg.rate, dt);

    let x0 = x[[0, 0]];
    let y0 = y[[0, 0]];

    let workers = workers.unwrap_or_else(num_cpus::get).max(1);
    let shard_size = (n + workers - 1) / workers;

    let totals = (0..workers)
        .into_par_iter()
        .map(|w| {
            let lo = w * shard_size;
            let hi = ((w + 1) * shard_size).min(n);
            let mut stats = ShardStats::default();
            for p in lo..hi {
                let realized = path_realized_payoff(x.column(p), y.column(p));
                let clamped = x0.min(y0.max(realized));
                stats.sum_realized += realized;
                stats.sum_clamped += clamped;
                stats.sum_clamped_sq += clamped * clamped;
                stats.count += 1;
            }
            stats
        })
        .reduce(ShardStats::default, ShardStats::merge);

    debug_assert_eq!(totals.count, n);

    let n_f = n as f64;
    let price = x0.min(y0.max(totals.sum_realized / n_f));
    let mut variance = (totals.sum_clamped_sq - 2.0 * price * totals.sum_clamped
        + n_f * price * price)
        / (n_f - 1.0);
    // Floating-point cancellation can push an all-equal sample a hair below
    // zero.
    if variance < 0.0 && variance > -1e-10 {
        variance = 0.0;
    }
    check_result_finite(price, variance)?;

    Ok(ValuationResult {
        price,
        variance,
        deviation: variance.sqrt(),
        duration: timer.elapsed(),
        valued_at: Utc::now(),
        rate: cfg.rate,
        maturity: cfg.maturity,
        steps: l,
        paths: n,
        dt,
        continuation: Continuation::Exact,
        claim: claim.clone(),
        gen_state: cfg.gen_state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlackScholes, PathModel};
    use crate::polynomials::BasisFamily;
    use ndarray::array;

    fn callable_put() -> Claim {
        Claim::CallablePut {
            strike: 100.0,
            penalty: 5.0,
        }
    }

    #[test]
    fn test_hand_computed_aggregation() {
        // Start at the strike: Y[0,0] = 0, X[0,0] = 5, and step 0 is out of
        // the money on every path, so strategies propagate to maturity.
        let s = array![
            [100.0, 100.0, 100.0, 100.0],
            [90.0, 110.0, 95.0, 105.0],
            [80.0, 120.0, 100.0, 100.0],
        ];
        let cfg = ValuationConfig {
            rate: 0.0,
            maturity: 1.0,
            ..Default::default()
        };
        let result = value(&callable_put(), &s, &cfg).unwrap();

        // Realized payoffs are Y[2,:] = [20, 0, 0, 0]; the mean 5 gets
        // clamped into [Y00, X00] = [0, 5].
        assert_eq!(result.price, 5.0);
        assert!((result.variance - 25.0).abs() < 1e-12);
        assert!((result.deviation - 5.0).abs() < 1e-12);
        assert_eq!(result.steps, 2);
        assert_eq!(result.paths, 4);
    }

    #[test]
    fn test_price_sandwich() {
        let model = BlackScholes::new(90.0, 0.06, 0.4);
        let (s, state) = model.simulate(0.5, 20, 128, Some(GenState::from_seed(5))).unwrap();
        let modes = [
            Continuation::Exact,
            Continuation::LeastSquares {
                m: 4,
                family: BasisFamily::Laguerre,
            },
        ];

        for mode in modes {
            let cfg = ValuationConfig {
                rate: 0.06,
                maturity: 0.5,
                continuation: mode,
                gen_state: Some(state),
            };
            let result = value(&callable_put(), &s, &cfg).unwrap();
            let (x, y) = callable_put().payoffs(&s).unwrap();
            let lo = x[[0, 0]].min(y[[0, 0]]);
            let hi = x[[0, 0]].max(y[[0, 0]]);
            assert!(
                result.price >= lo && result.price <= hi,
                "price {} outside [{}, {}]",
                result.price,
                lo,
                hi
            );
        }
    }

    #[test]
    fn test_parallel_matches_single_threaded_exact() {
        let model = BlackScholes::new(95.0, 0.04, 0.3);
        let (s, state) = model.simulate(1.0, 30, 200, Some(GenState::from_seed(17))).unwrap();
        let cfg = ValuationConfig {
            rate: 0.04,
            maturity: 1.0,
            continuation: Continuation::Exact,
            gen_state: Some(state),
        };

        let single = value(&callable_put(), &s, &cfg).unwrap();
        for workers in [1, 2, 3, 7] {
            let parallel = value_parallel(&callable_put(), &s, &cfg, Some(workers)).unwrap();
            assert!(
                (single.price - parallel.price).abs() < 1e-10,
                "price mismatch with {} workers: {} vs {}",
                workers,
                single.price,
                parallel.price
            );
            assert!(
                (single.variance - parallel.variance).abs() < 1e-8,
                "variance mismatch with {} workers: {} vs {}",
                workers,
                single.variance,
                parallel.variance
            );
        }
    }

    #[test]
    fn test_flat_record_sorted_and_stripped() {
        let s = array![[100.0, 100.0], [95.0, 105.0], [90.0, 110.0]];
        let cfg = ValuationConfig {
            rate: 0.02,
            maturity: 0.5,
            gen_state: Some(GenState::from_seed(99)),
            ..Default::default()
        };
        let result = value(&callable_put(), &s, &cfg).unwrap();
        let record = result.flat_record();

        let keys: Vec<&str> = record.iter().map(|(k, _)| k.as_str()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert!(keys.contains(&"V"));
        assert!(keys.contains(&"seed"));
        assert!(keys.contains(&"strike"));
        // No matrix payload sneaks into the record.
        assert!(record.iter().all(|(_, v)| v.len() < 64));
    }

    #[test]
    fn test_bad_config_rejected() {
        let s = array![[100.0, 100.0], [95.0, 105.0]];
        let cfg = ValuationConfig {
            maturity: 0.0,
            ..Default::default()
        };
        assert!(value(&callable_put(), &s, &cfg).is_err());

        let cfg = ValuationConfig {
            rate: f64::NAN,
            ..Default::default()
        };
        assert!(value(&callable_put(), &s, &cfg).is_err());
    }
}
