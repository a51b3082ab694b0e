use ou_threshold::analytics::bertram::BertramModel;
use ou_threshold::analytics::thresholds::ThresholdPair;
use ou_threshold::mc::trade_cycle::{simulate_trade_cycles, McConfig};

#[test]
fn test_simulated_cycle_moments_match_analytic() {
    let model = BertramModel::from_parts(1.0, 0.0, 1.0).unwrap();
    let pair = ThresholdPair::new(-0.5, 0.5).unwrap();

    let cfg = McConfig {
        paths: 4_000,
        dt: 1e-3,
        seed: 42,
        ..McConfig::default()
    };
    let stats = simulate_trade_cycles(model.params(), &pair, &cfg).expect("Valid configuration");

    let analytic_mean = model.expected_trade_length(pair.a, pair.m).unwrap();
    let analytic_variance = model.trade_length_variance(pair.a, pair.m).unwrap();

    let mean_error = (stats.mean - analytic_mean).abs() / analytic_mean;
    let variance_error = (stats.variance - analytic_variance).abs() / analytic_variance;

    println!("\nMC mean: {} ± {}", stats.mean, stats.std_error);
    println!("Analytic mean: {}", analytic_mean);
    println!("MC variance: {}", stats.variance);
    println!("Analytic variance: {}", analytic_variance);

    assert_eq!(stats.paths, 4_000);
    assert!(mean_error < 0.05, "Relative error of E[T] exceeds 5%: {}", mean_error);
    assert!(variance_error < 0.2, "Relative error of V[T] exceeds 20%: {}", variance_error);
}

#[test]
fn test_continuity_correction_reduces_bias() {
    let model = BertramModel::from_parts(1.0, 0.0, 1.0).unwrap();
    let pair = ThresholdPair::new(-0.5, 0.5).unwrap();
    let analytic_mean = model.expected_trade_length(pair.a, pair.m).unwrap();

    let base = McConfig {
        paths: 2_000,
        dt: 1e-2,
        seed: 7,
        ..McConfig::default()
    };
    let corrected = simulate_trade_cycles(model.params(), &pair, &base).unwrap();
    let raw = simulate_trade_cycles(
        model.params(),
        &pair,
        &McConfig {
            continuity_correction: false,
            ..base
        },
    )
    .unwrap();

    println!("\nRaw: {}  Corrected: {}  Analytic: {}", raw.mean, corrected.mean, analytic_mean);

    // discrete monitoring can only delay the crossings
    assert!(raw.mean > corrected.mean);
    assert!((corrected.mean - analytic_mean).abs() < (raw.mean - analytic_mean).abs());
}
