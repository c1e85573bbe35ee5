//! # gcc-mc: Monte Carlo Valuation of Game Contingent Claims
//!
//! A Rust library for pricing game contingent claims (GCCs) — derivative
//! securities in which *both* the writer and the holder hold
//! early-termination rights, such as callable puts, convertible bonds and
//! game options — by Monte Carlo simulation combined with least-squares
//! estimation of continuation values, in the style of Longstaff-Schwartz
//! extended to two-sided optimal stopping.
//!
//! ## Key Features
//!
//! - **Two-sided stopping**: backward-induction solver for the writer/holder
//!   stopping game with exact or regression-based continuation values
//! - **Variance Reduction**: antithetic path pairing built into the
//!   simulators
//! - **Two Path Models**: Black-Scholes diffusion and exponential-jump
//!   jump-diffusion
//! - **Reproducibility**: explicit, serializable generator-state tokens
//! - **Parallel exact mode**: embarrassingly-parallel path shards with
//!   arithmetic result merging via Rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use gcc_mc::claims::Claim;
//! use gcc_mc::models::{BlackScholes, PathModel};
//! use gcc_mc::polynomials::BasisFamily;
//! use gcc_mc::solver::Continuation;
//! use gcc_mc::valuation::{value, ValuationConfig};
//!
//! // Simulate the underlying
//! let model = BlackScholes::new(100.0, 0.06, 0.4);
//! let (paths, state) = model.simulate(0.5, 100, 1000, None).expect("valid parameters");
//!
//! // Value a callable put with the LSE continuation estimator
//! let claim = Claim::CallablePut { strike: 100.0, penalty: 5.0 };
//! let cfg = ValuationConfig {
//!     rate: 0.06,
//!     maturity: 0.5,
//!     continuation: Continuation::LeastSquares { m: 8, family: BasisFamily::Laguerre },
//!     gen_state: Some(state),
//! };
//! let result = value(&claim, &paths, &cfg).expect("valid configuration");
//! println!("V = {:.4} ± {:.4}", result.price, result.deviation);
//! ```
//!
//! ## Mathematical Foundation
//!
//! With writer-stop time `σ` and holder-stop time `τ`, the game payoff is
//! `R(σ, τ) = X_σ·1(σ < τ) + Y_τ·1(τ ≤ σ)`. The solver computes the
//! equilibrium strategy pair path-by-path, backward from maturity, and the
//! price is the clamped Monte-Carlo average
//! `V = min(X₀, max(Y₀, mean R(σ₁, τ₁)))`.

// Module declarations
pub mod error;
pub mod rng;
pub mod math_utils;
pub mod models;
pub mod claims;
pub mod polynomials;
pub mod solver;
pub mod valuation;
pub mod analytics;
pub mod output;

// Re-export commonly used types for convenience
pub use error::{GccError, GccResult};
