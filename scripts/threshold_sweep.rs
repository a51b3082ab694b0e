// scripts/threshold_sweep.rs
use clap::{Parser, ValueEnum};
use ou_threshold::analytics::sweep::linspace;
use ou_threshold::math_utils::Timer;
use ou_threshold::output::{write_summary_to_csv, write_sweep_to_csv};
use ou_threshold::{BertramModel, Metrics, OuParams, OuResult, SolverConfig, SweepPoint};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Objective {
    /// Maximize expected return per unit time, sweeping the transaction cost
    Return,
    /// Maximize the Sharpe ratio, sweeping the risk-free rate
    Sharpe,
}

/// Optimal entry/exit thresholds for an Ornstein-Uhlenbeck spread
#[derive(Debug, Parser)]
#[command(name = "threshold-sweep", version, about)]
struct Args {
    /// Mean-reversion speed
    #[arg(long)]
    mu: f64,

    /// Long-run mean
    #[arg(long, default_value_t = 0.0)]
    theta: f64,

    /// Volatility
    #[arg(long)]
    sigma: f64,

    #[arg(long, value_enum, default_value_t = Objective::Return)]
    objective: Objective,

    /// Transaction costs to sweep (return objective)
    #[arg(long, value_delimiter = ',')]
    costs: Vec<f64>,

    /// Fixed transaction cost (sharpe objective)
    #[arg(long, default_value_t = 0.0)]
    cost: f64,

    /// Risk-free rates to sweep (sharpe objective)
    #[arg(long, value_delimiter = ',')]
    rates: Vec<f64>,

    /// TOML file with solver settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// CSV file for the sweep; a `<stem>_summary.csv` is written next to it
    #[arg(long)]
    output: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}

fn summary_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sweep".to_string());
    output.with_file_name(format!("{}_summary.csv", stem))
}

fn report(model: &BertramModel, objective: Objective, cost: f64, points: &[SweepPoint]) -> OuResult<()> {
    let metrics = match objective {
        Objective::Return => Metrics::TRADE_LENGTH | Metrics::EXPECTED_RETURN,
        Objective::Sharpe => Metrics::TRADE_LENGTH | Metrics::EXPECTED_RETURN | Metrics::SHARPE_RATIO,
    };

    println!("{:>10} {:>12} {:>12} {:>12} {:>12}", "input", "a", "m", "E[T]", "value");
    for p in points {
        if p.thresholds().width() <= 0.0 {
            warn!(input = p.input, a = p.a, limit = p.value, "zero cost, band collapses to theta");
            println!("{:>10.4} {:>12.6} {:>12.6} {:>12} {:>12.6}", p.input, p.a, p.m, "-", p.value);
            continue;
        }
        let (c, rf) = match objective {
            Objective::Return => (p.input, 0.0),
            Objective::Sharpe => (cost, p.input),
        };
        let stats = model.evaluate(p.a, p.m, c, rf, metrics)?;
        info!(
            input = p.input,
            a = p.a,
            m = p.m,
            trade_length = ?stats.trade_length,
            expected_return = ?stats.expected_return,
            sharpe_ratio = ?stats.sharpe_ratio,
            "optimal thresholds"
        );
        println!(
            "{:>10.4} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
            p.input,
            p.a,
            p.m,
            stats.trade_length.unwrap_or(f64::NAN),
            p.value
        );
    }
    Ok(())
}

fn main() -> OuResult<()> {
    init_logging();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SolverConfig::load(path)?,
        None => SolverConfig::default(),
    };
    let params = OuParams::new(args.mu, args.theta, args.sigma)?;
    let model = BertramModel::with_config(params, config)?;
    info!(mu = params.mu, theta = params.theta, sigma = params.sigma, "model ready");

    let timer = Timer::new();

    let (input_name, value_name, points) = match args.objective {
        Objective::Return => {
            let costs = if args.costs.is_empty() {
                linspace(0.05, 0.5, 10)
            } else {
                args.costs.clone()
            };
            info!(points = costs.len(), "sweeping transaction cost");
            ("c", "expected_return", model.max_expected_return_vs_cost(&costs)?)
        }
        Objective::Sharpe => {
            let rates = if args.rates.is_empty() {
                linspace(0.01, 0.1, 10)
            } else {
                args.rates.clone()
            };
            info!(points = rates.len(), c = args.cost, "sweeping risk-free rate");
            ("rf", "sharpe_ratio", model.max_sharpe_vs_rate(args.cost, &rates)?)
        }
    };

    let elapsed = timer.elapsed_ms();
    info!(elapsed_ms = elapsed, "sweep finished");

    report(&model, args.objective, args.cost, &points)?;

    if let Some(output) = &args.output {
        write_sweep_to_csv(output, input_name, value_name, &points)?;

        let summary = [
            ("mu", params.mu.to_string()),
            ("theta", params.theta.to_string()),
            ("sigma", params.sigma.to_string()),
            ("objective", value_name.to_string()),
            ("points", points.len().to_string()),
            ("elapsed_ms", format!("{:.3}", elapsed)),
            (
                "generated",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            ),
        ];
        let summary_file = summary_path(output);
        write_summary_to_csv(&summary_file, &summary)?;
        info!(sweep = %output.display(), summary = %summary_file.display(), "results written");
    }

    Ok(())
}
