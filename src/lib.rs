//! # ou-threshold: Optimal Trading Thresholds for Mean-Reverting Spreads
//!
//! Analytic trade statistics and optimal entry/exit levels for a pairs-trading
//! strategy on an Ornstein-Uhlenbeck spread, following
//! Bertram, W. K. (2010), *Analytic solutions for optimal statistical
//! arbitrage trading*, Physica A 389(11), 2234–2243.
//!
//! ## Key Features
//!
//! - **Closed-form statistics**: expected trade length, trade-length variance,
//!   expected return, return variance and Sharpe ratio for any `a < m`
//! - **Convergent series**: erfi and the variance series summed with explicit
//!   tolerances and term caps
//! - **Optimal thresholds**: Brent root finding for maximum expected return,
//!   Nelder-Mead for maximum Sharpe ratio
//! - **Sweeps**: parallel threshold/performance curves over costs or rates
//! - **Monte Carlo check**: simulated trade cycles to validate the moments
//!
//! ## Quick Start
//!
//! ```rust
//! use ou_threshold::analytics::bertram::BertramModel;
//!
//! // mu (reversion speed), theta (long-run mean), sigma (volatility)
//! let model = BertramModel::from_parts(1.0, 0.0, 1.0).expect("Valid parameters");
//!
//! let length = model.expected_trade_length(-1.0, 1.0).expect("a < m");
//! assert!((length - 10.3699).abs() < 1e-3);
//!
//! let best = model.optimize_for_expected_return(0.1).expect("Converges");
//! assert!((best.a + best.m).abs() < 1e-9);
//! println!("enter at {:.4}, exit at {:.4}", best.a, best.m);
//! ```
//!
//! ## Model
//!
//! The spread follows `dX_t = μ(θ - X_t) dt + σ dW_t`. A trade is opened
//! when `X_t = a`, closed at `X_t = m`, and the cycle completes once the
//! spread returns to `a`. OU parameters are taken as given; estimating them
//! is outside the scope of this crate.

// Module declarations
pub mod analytics;
pub mod config;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod output;
pub mod rng;
pub mod solvers;

// Re-export commonly used types for convenience
pub use analytics::bertram::{BertramModel, Evaluation, Metrics};
pub use analytics::sweep::SweepPoint;
pub use analytics::thresholds::ThresholdPair;
pub use config::SolverConfig;
pub use error::{OuError, OuResult};
pub use models::ou_process::OuParams;
