// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes formulas for European options
//!
//! # Role
//!
//! Benchmark values for the Monte-Carlo engine. A game option whose
//! termination penalty is prohibitively large degenerates to an American
//! option, and at zero interest rate the American put (and, without
//! dividends, the American call) coincides with its European counterpart —
//! which is where these closed forms pin the Monte-Carlo price.

use crate::math_utils::norm_cdf;

/// Black-Scholes European call option price
///
/// ```text
/// C(S,K,r,σ,T) = S·Φ(d₁) - K·e^(-rT)·Φ(d₂)
/// d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T),  d₂ = d₁ - σ√T
/// ```
pub fn bs_call_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt());
    let d2 = d1 - sigma * t.sqrt();
    s * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2)
}

/// Black-Scholes European put option price
///
/// ```text
/// P(S,K,r,σ,T) = K·e^(-rT)·Φ(-d₂) - S·Φ(-d₁)
/// ```
pub fn bs_put_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt());
    let d2 = d1 - sigma * t.sqrt();
    k * (-r * t).exp() * norm_cdf(-d2) - s * norm_cdf(-d1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_call_parity() {
        let (s, k, r, sigma, t) = (100.0, 95.0, 0.03, 0.25, 0.75);
        let call = bs_call_price(s, k, r, sigma, t);
        let put = bs_put_price(s, k, r, sigma, t);
        let parity = call - put - (s - k * (-r * t).exp());
        assert!(parity.abs() < 1e-10, "parity residual {}", parity);
    }

    #[test]
    fn test_atm_put_zero_rate() {
        // ATM with r = 0: both legs symmetric, P = C.
        let call = bs_call_price(100.0, 100.0, 0.0, 0.4, 0.5);
        let put = bs_put_price(100.0, 100.0, 0.0, 0.4, 0.5);
        assert!((call - put).abs() < 1e-10);
        assert!(put > 0.0);
    }
}
