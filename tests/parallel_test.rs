// tests/parallel_test.rs
use ndarray::s;

use gcc_mc::claims::{Claim, Penalty};
use gcc_mc::models::{BlackScholes, PathModel};
use gcc_mc::rng::GenState;
use gcc_mc::solver::Continuation;
use gcc_mc::valuation::{value, value_parallel, ValuationConfig};

fn exact_config(rate: f64, maturity: f64, state: Option<GenState>) -> ValuationConfig {
    ValuationConfig {
        rate,
        maturity,
        continuation: Continuation::Exact,
        gen_state: state,
    }
}

/// The parallel valuer shards the path matrix by column block; any worker
/// count must reproduce the single-threaded exact price and variance to the
/// last bit of floating-point rounding.
#[test]
fn test_parallel_matches_single_threaded_at_scale() {
    let model = BlackScholes::new(100.0, 0.05, 0.35);
    let (paths, state) = model
        .simulate(1.0, 60, 16_000, Some(GenState::from_seed(7)))
        .expect("valid parameters");

    let claim = Claim::GamePut {
        strike: 105.0,
        penalty: Penalty::Flat(4.0),
    };
    let cfg = exact_config(0.05, 1.0, Some(state));

    let single = value(&claim, &paths, &cfg).expect("valid configuration");

    for workers in [Some(1), Some(2), Some(5), Some(16), None] {
        let parallel =
            value_parallel(&claim, &paths, &cfg, workers).expect("valid configuration");
        assert!(
            (parallel.price - single.price).abs() < 1e-10,
            "workers {:?}: price {} vs {}",
            workers,
            parallel.price,
            single.price
        );
        assert!(
            (parallel.variance - single.variance).abs() < 1e-8,
            "workers {:?}: variance {} vs {}",
            workers,
            parallel.variance,
            single.variance
        );
    }
}

/// Two disjoint column batches valued separately recombine into the full
/// price by a path-count-weighted mean, as long as no batch mean hits the
/// time-zero clamp.
#[test]
fn test_disjoint_batches_recombine_by_weighted_mean() {
    let model = BlackScholes::new(90.0, 0.03, 0.3);
    let (paths, _) = model
        .simulate(0.5, 40, 8_000, Some(GenState::from_seed(8)))
        .expect("valid parameters");

    // In-the-money put with a wide penalty band: batch means land strictly
    // inside [Y[0,0], X[0,0]] so the clamp is inactive.
    let claim = Claim::CallablePut {
        strike: 100.0,
        penalty: 15.0,
    };
    let cfg = exact_config(0.03, 0.5, None);

    let full = value(&claim, &paths, &cfg).expect("valid configuration");
    let left = value(&claim, &paths.slice(s![.., ..4_000]).to_owned(), &cfg)
        .expect("valid configuration");
    let right = value(&claim, &paths.slice(s![.., 4_000..]).to_owned(), &cfg)
        .expect("valid configuration");

    for batch in [&full, &left, &right] {
        assert!(
            batch.price > 10.0 + 1e-6 && batch.price < 25.0 - 1e-6,
            "clamp became active, batch price {}",
            batch.price
        );
    }

    let recombined = (left.price * left.paths as f64 + right.price * right.paths as f64)
        / full.paths as f64;
    println!("full {} recombined {}", full.price, recombined);
    assert!((full.price - recombined).abs() < 1e-9);
}

/// Replaying a stored generator state reproduces the valuation exactly.
#[test]
fn test_gen_state_replay_is_bitwise_reproducible() {
    let model = BlackScholes::new(100.0, 0.04, 0.25);
    let claim = Claim::GamePut {
        strike: 100.0,
        penalty: Penalty::Flat(2.0),
    };

    let (paths_a, state_a) = model
        .simulate(0.5, 30, 2_000, Some(GenState::from_seed(99)))
        .expect("valid parameters");
    let (paths_b, state_b) = model
        .simulate(0.5, 30, 2_000, Some(state_a))
        .expect("valid parameters");

    assert_eq!(state_a.seed(), state_b.seed());
    assert_eq!(paths_a, paths_b);

    let cfg = exact_config(0.04, 0.5, Some(state_a));
    let a = value(&claim, &paths_a, &cfg).expect("valid configuration");
    let b = value(&claim, &paths_b, &cfg).expect("valid configuration");
    assert_eq!(a.price, b.price);
    assert_eq!(a.variance, b.variance);
}

#[test]
fn test_parallel_rejects_single_path() {
    let model = BlackScholes::new(100.0, 0.04, 0.25);
    let (paths, _) = model
        .simulate(0.5, 10, 2, Some(GenState::from_seed(1)))
        .expect("valid parameters");
    let one = paths.slice(s![.., ..1]).to_owned();

    let claim = Claim::GamePut {
        strike: 100.0,
        penalty: Penalty::Flat(2.0),
    };
    let cfg = exact_config(0.04, 0.5, None);
    assert!(value_parallel(&claim, &one, &cfg, Some(2)).is_err());
}
