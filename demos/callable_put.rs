// demos/callable_put.rs
//
// Price a callable (game) put under Black-Scholes with the least-squares
// continuation estimator, compare a prohibitive-penalty variant against the
// European closed form, and dump the result records to JSON.
use gcc_mc::analytics::bs_analytic;
use gcc_mc::claims::{Claim, Penalty};
use gcc_mc::models::{BlackScholes, PathModel};
use gcc_mc::polynomials::BasisFamily;
use gcc_mc::rng::GenState;
use gcc_mc::solver::Continuation;
use gcc_mc::valuation::{value, ValuationConfig};
use gcc_mc::output;

fn main() {
    println!("Running gcc-mc callable put demo\n");

    let s0 = 100.0;
    let k = 100.0;
    let r = 0.06;
    let sigma = 0.4;
    let t = 0.5;
    let steps = 50;
    let paths = 100_000;

    let model = BlackScholes::new(s0, r, sigma);
    let (s, state) = model
        .simulate(t, steps, paths, Some(GenState::from_seed(12345)))
        .expect("Valid parameters");

    let continuation = Continuation::LeastSquares {
        m: 8,
        family: BasisFamily::Laguerre,
    };
    let cfg = ValuationConfig {
        rate: r,
        maturity: t,
        continuation,
        gen_state: Some(state),
    };

    // --- Callable Put ---
    println!("--- Callable Put (delta = 5) ---");
    let callable = Claim::CallablePut {
        strike: k,
        penalty: 5.0,
    };
    let result = value(&callable, &s, &cfg).expect("Valid configuration");
    println!("Price: {}", result.price);
    println!("Std deviation: {}", result.deviation);
    println!("Elapsed: {} ms\n", result.duration.as_millis());

    std::fs::create_dir_all("results").expect("Could not create results directory");
    match output::write_record_json("results/callable_put.json", &result) {
        Ok(_) => println!("Record written to results/callable_put.json\n"),
        Err(e) => eprintln!("Error writing record: {}\n", e),
    }

    // --- Prohibitive penalty: the game collapses to an American put ---
    println!("--- Game Put (prohibitive penalty, r = 0) ---");
    let model_r0 = BlackScholes::new(s0, 0.0, sigma);
    let (s_r0, state_r0) = model_r0
        .simulate(t, steps, paths, Some(GenState::from_seed(12345)))
        .expect("Valid parameters");
    let american = Claim::GamePut {
        strike: k,
        penalty: Penalty::Flat(1000.0),
    };
    let cfg_r0 = ValuationConfig {
        rate: 0.0,
        maturity: t,
        continuation,
        gen_state: Some(state_r0),
    };
    let result_r0 = value(&american, &s_r0, &cfg_r0).expect("Valid configuration");

    let analytic = bs_analytic::bs_put_price(s0, k, 0.0, sigma, t);
    let abs_error = (result_r0.price - analytic).abs();
    println!("MC Price: {}", result_r0.price);
    println!("Analytic European Put (r = 0): {}", analytic);
    println!("Absolute Error: {}", abs_error);
    println!("Relative Error: {}\n", abs_error / analytic);

    // --- Varying penalty schedule ---
    println!("--- Game Put (linearly decaying penalty) ---");
    let mut schedule = ndarray::Array2::<f64>::zeros((steps + 1, paths));
    for (j, mut row) in schedule.rows_mut().into_iter().enumerate() {
        let decay = 5.0 * (1.0 - j as f64 / steps as f64);
        row.fill(decay);
    }
    let decaying = Claim::GamePut {
        strike: k,
        penalty: Penalty::Varying(schedule),
    };
    let result_decay = value(&decaying, &s, &cfg).expect("Valid configuration");
    println!("Price: {}", result_decay.price);
    println!("Std deviation: {}", result_decay.deviation);
}
