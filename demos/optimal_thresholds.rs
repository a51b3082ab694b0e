// demos/optimal_thresholds.rs
use ou_threshold::analytics::sweep::linspace;
use ou_threshold::mc::trade_cycle::{simulate_trade_cycles, McConfig};
use ou_threshold::{BertramModel, Metrics, OuError, ThresholdPair};

fn main() {
    println!("Optimal Thresholds for an Ornstein-Uhlenbeck Spread");
    println!("===================================================\n");

    let model = BertramModel::from_parts(1.0, 0.0, 1.0).expect("Valid parameters");
    let c = 0.1;
    let rf = 0.02;

    println!("1. Statistics of the band (-1, 1), c = {}, rf = {}", c, rf);
    let stats = model
        .evaluate(-1.0, 1.0, c, rf, Metrics::all())
        .expect("Valid thresholds");
    println!("   E[T]          = {:.6}", stats.trade_length.unwrap_or(f64::NAN));
    println!("   V[T]          = {:.6}", stats.trade_length_variance.unwrap_or(f64::NAN));
    println!("   mu(a, m, c)   = {:.6}", stats.expected_return.unwrap_or(f64::NAN));
    println!("   sigma^2       = {:.6}", stats.return_variance.unwrap_or(f64::NAN));
    println!("   Sharpe        = {:.6}", stats.sharpe_ratio.unwrap_or(f64::NAN));

    println!("\n2. Maximum expected return");
    let best = model.optimize_for_expected_return(c).expect("Root found");
    let value = model.expected_return(best.a, best.m, c).expect("Valid thresholds");
    println!("   a = {:.6}, m = {:.6}, return = {:.6}", best.a, best.m, value);

    println!("\n3. Maximum Sharpe ratio");
    let best = model.optimize_for_sharpe_ratio(c, rf).expect("Simplex converged");
    let value = model.sharpe_ratio(best.a, best.m, c, rf).expect("Valid thresholds");
    println!("   a = {:.6}, m = {:.6}, Sharpe = {:.6}", best.a, best.m, value);

    println!("\n4. Entry level against transaction cost");
    let costs = linspace(0.05, 0.5, 10);
    for point in model.max_expected_return_vs_cost(&costs).expect("Sweep succeeded") {
        println!("   c = {:.2}  a = {:+.6}  return = {:.6}", point.input, point.a, point.value);
    }

    println!("\n5. Monte Carlo check of the trade-cycle moments");
    let pair = ThresholdPair::new(-0.5, 0.5).expect("a < m");
    let cfg = McConfig {
        paths: 4_000,
        ..McConfig::default()
    };
    let simulated = simulate_trade_cycles(model.params(), &pair, &cfg).expect("Simulation completed");
    let length = model.expected_trade_length(pair.a, pair.m).expect("Valid thresholds");
    let variance = model.trade_length_variance(pair.a, pair.m).expect("Valid thresholds");
    println!("   E[T]: analytic {:.4}, simulated {:.4} ± {:.4}", length, simulated.mean, simulated.std_error);
    println!("   V[T]: analytic {:.4}, simulated {:.4}", variance, simulated.variance);

    println!("\n6. Error handling");
    match model.expected_trade_length(0.5, 0.5) {
        Err(e @ OuError::Domain { .. }) => println!("   ✓ Caught error: {}", e),
        other => println!("   Unexpected: {:?}", other),
    }
    match BertramModel::from_parts(-1.0, 0.0, 1.0) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }
}
