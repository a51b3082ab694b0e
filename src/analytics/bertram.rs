// src/analytics/bertram.rs
//! Analytic trade statistics for an OU spread (Bertram, 2010)
//!
//! # Trading Rule
//!
//! The spread `X_t` follows `dX_t = μ(θ - X_t) dt + σ dW_t`. A trade is
//! entered when `X_t = a`, closed when `X_t = m`, and the cycle completes
//! once the spread is back at `a`. The model assumes `a < m`.
//!
//! # Formulas
//!
//! With `erfi_s(z) = erfi((z - θ)√μ/σ)`:
//! ```text
//! E[T]    = π/μ · (erfi_s(m) - erfi_s(a))
//! V[T]    = (w1(x_m) - w1(x_a) - w2(x_m) + w2(x_a)) / μ²,   x_z = (z - θ)√(2μ)/σ
//! μ(a,m,c) = (m - a - c) / E[T]
//! σ²(a,m,c) = (m - a - c)² V[T] / E[T]³
//! S(a,m,c,rf) = (μ(a,m,c) - rf/E[T]) / σ(a,m,c)
//! ```
//!
//! Every method is a pure function of the stored parameters and its
//! arguments, so a model can be shared freely between threads.

use crate::analytics::series::{w1, w2};
use crate::config::SolverConfig;
use crate::error::{validation::*, OuError, OuResult};
use crate::math_utils::erfi;
use crate::models::ou_process::OuParams;
use bitflags::bitflags;
use std::f64::consts::PI;

bitflags! {
    /// Statistics requested from [`BertramModel::evaluate`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Metrics: u32 {
        const NONE                  = 0;
        const TRADE_LENGTH          = 1 << 0;
        const TRADE_LENGTH_VARIANCE = 1 << 1;
        const EXPECTED_RETURN       = 1 << 2;
        const RETURN_VARIANCE       = 1 << 3;
        const SHARPE_RATIO          = 1 << 4;
    }
}

/// Statistics of one threshold pair; fields not requested are `None`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Evaluation {
    pub trade_length: Option<f64>,
    pub trade_length_variance: Option<f64>,
    pub expected_return: Option<f64>,
    pub return_variance: Option<f64>,
    pub sharpe_ratio: Option<f64>,
}

/// Bertram threshold model: OU parameters plus numerical settings
///
/// Both are validated at construction and read-only afterwards:
///
/// ```compile_fail
/// let mut model = ou_threshold::BertramModel::from_parts(1.0, 0.0, 1.0).unwrap();
/// model.params.mu = 0.0;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BertramModel {
    pub(crate) params: OuParams,
    pub(crate) config: SolverConfig,
}

impl BertramModel {
    pub fn new(params: OuParams) -> OuResult<Self> {
        Self::with_config(params, SolverConfig::default())
    }

    pub fn with_config(params: OuParams, config: SolverConfig) -> OuResult<Self> {
        params.validate()?;
        config.validate()?;
        Ok(BertramModel { params, config })
    }

    /// Convenience constructor from raw parameters
    pub fn from_parts(mu: f64, theta: f64, sigma: f64) -> OuResult<Self> {
        Self::new(OuParams::new(mu, theta, sigma)?)
    }

    pub fn params(&self) -> &OuParams {
        &self.params
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// `erfi((z - θ)·√μ/σ)`
    pub fn scaled_erfi(&self, z: f64) -> OuResult<f64> {
        let OuParams { mu, theta, sigma } = self.params;
        erfi((z - theta) * mu.sqrt() / sigma, &self.config.series)
    }

    /// Expected length of one a → m → a trade cycle
    ///
    /// # Errors
    /// - `Domain` unless `a < m` with both finite
    /// - `Numerical` if erfi overflows for extreme thresholds
    pub fn expected_trade_length(&self, a: f64, m: f64) -> OuResult<f64> {
        validate_thresholds(a, m)?;

        let length = (PI / self.params.mu) * (self.scaled_erfi(m)? - self.scaled_erfi(a)?);
        if !length.is_finite() {
            return Err(OuError::numerical(
                "expected_trade_length",
                format!("non-finite trade length for a = {}, m = {}", a, m),
            ));
        }
        Ok(length)
    }

    /// Variance of the trade cycle length
    pub fn trade_length_variance(&self, a: f64, m: f64) -> OuResult<f64> {
        validate_thresholds(a, m)?;

        let OuParams { mu, theta, sigma } = self.params;
        let scale = (2.0 * mu).sqrt() / sigma;
        let x_m = (m - theta) * scale;
        let x_a = (a - theta) * scale;

        let series = &self.config.series;
        let numerator = w1(x_m, series)? - w1(x_a, series)? - w2(x_m, series)? + w2(x_a, series)?;
        let variance = numerator / (mu * mu);

        if !variance.is_finite() {
            return Err(OuError::numerical(
                "trade_length_variance",
                format!("non-finite variance for a = {}, m = {}", a, m),
            ));
        }
        Ok(variance)
    }

    /// Expected return per unit time, net of the round-trip cost `c`
    pub fn expected_return(&self, a: f64, m: f64, c: f64) -> OuResult<f64> {
        validate_non_negative("c", c)?;
        Ok((m - a - c) / self.expected_trade_length(a, m)?)
    }

    /// Zero-cost expected return as the band shrinks to `θ`, `σ√μ / (2√π)`
    ///
    /// At `c = 0` the expected return increases as `a` and `m` approach `θ`,
    /// so this limit is its supremum and no finite band attains it.
    pub fn zero_band_return(&self) -> f64 {
        self.params.sigma * self.params.mu.sqrt() / (2.0 * PI.sqrt())
    }

    /// Variance of the return per unit time
    pub fn return_variance(&self, a: f64, m: f64, c: f64) -> OuResult<f64> {
        validate_non_negative("c", c)?;
        let length = self.expected_trade_length(a, m)?;
        let variance = self.trade_length_variance(a, m)?;
        Ok((m - a - c).powi(2) * variance / length.powi(3))
    }

    /// Sharpe ratio with risk-free rate `rf`
    ///
    /// # Errors
    /// `Domain` if the return variance is not strictly positive, which
    /// happens when `m - a == c`.
    pub fn sharpe_ratio(&self, a: f64, m: f64, c: f64, rf: f64) -> OuResult<f64> {
        validate_finite("rf", rf)?;
        let length = self.expected_trade_length(a, m)?;
        let expected = self.expected_return(a, m, c)?;
        let variance = self.return_variance(a, m, c)?;

        if variance <= 0.0 {
            return Err(OuError::domain(
                "return_variance",
                variance,
                "must be positive to compute a Sharpe ratio",
            ));
        }

        Ok((expected - rf / length) / variance.sqrt())
    }

    /// Compute the statistics selected by `metrics` for one threshold pair
    pub fn evaluate(&self, a: f64, m: f64, c: f64, rf: f64, metrics: Metrics) -> OuResult<Evaluation> {
        let mut out = Evaluation::default();

        if metrics.contains(Metrics::TRADE_LENGTH) {
            out.trade_length = Some(self.expected_trade_length(a, m)?);
        }
        if metrics.contains(Metrics::TRADE_LENGTH_VARIANCE) {
            out.trade_length_variance = Some(self.trade_length_variance(a, m)?);
        }
        if metrics.contains(Metrics::EXPECTED_RETURN) {
            out.expected_return = Some(self.expected_return(a, m, c)?);
        }
        if metrics.contains(Metrics::RETURN_VARIANCE) {
            out.return_variance = Some(self.return_variance(a, m, c)?);
        }
        if metrics.contains(Metrics::SHARPE_RATIO) {
            out.sharpe_ratio = Some(self.sharpe_ratio(a, m, c, rf)?);
        }

        Ok(out)
    }
}
