// src/analytics/thresholds.rs
//! Optimal entry/exit thresholds
//!
//! Neither objective has a closed-form optimum, so both are solved
//! numerically on the entry level `a`, with the exit level tied to it by the
//! symmetric rule `m = 2θ - a`.
//!
//! # Maximum expected return
//!
//! The first-order condition of `μ(a, 2θ - a, c)` reduces to
//! ```text
//! exp(μ(a - θ)²/σ²) · (2(a - θ) + c) - σ √(π/μ) · erfi((a - θ)√μ/σ) = 0
//! ```
//! which is solved by bracketing + Brent from `θ - c - initial_offset`.
//!
//! # Maximum Sharpe ratio
//!
//! `-S(a, 2θ - a, c, rf)` is minimized with Nelder-Mead from `θ - rf - c`.
//! Trial points where the Sharpe ratio is undefined (`a ≥ m`, zero return
//! variance) count as infeasible rather than aborting the search.

use crate::analytics::bertram::BertramModel;
use crate::error::{validation::*, OuError, OuResult};
use crate::solvers::{brent, nelder_mead};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// Entry (`a`) and exit (`m`) levels of the spread
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub a: f64,
    pub m: f64,
}

impl ThresholdPair {
    /// Validated pair with `a < m`
    pub fn new(a: f64, m: f64) -> OuResult<Self> {
        validate_thresholds(a, m)?;
        Ok(ThresholdPair { a, m })
    }

    /// Pair mirrored around the long-run mean: `m = 2θ - a`
    pub fn symmetric(theta: f64, a: f64) -> Self {
        ThresholdPair {
            a,
            m: 2.0 * theta - a,
        }
    }

    /// Distance between exit and entry, the gross profit per trade
    pub fn width(&self) -> f64 {
        self.m - self.a
    }
}

impl BertramModel {
    /// Left-hand side of the first-order condition for maximum expected return
    pub fn expected_return_condition(&self, a: f64, c: f64) -> OuResult<f64> {
        let mu = self.params.mu;
        let theta = self.params.theta;
        let sigma = self.params.sigma;

        let growth = (mu * (a - theta).powi(2) / (sigma * sigma)).exp();
        Ok(growth * (2.0 * (a - theta) + c) - sigma * (PI / mu).sqrt() * self.scaled_erfi(a)?)
    }

    /// Thresholds maximizing the expected return for round-trip cost `c`
    ///
    /// With `c = 0` the band collapses onto the long-run mean and the
    /// degenerate pair `a = m = θ` is returned; its expected return is the
    /// limit [`BertramModel::zero_band_return`].
    ///
    /// # Errors
    /// - `Domain` if `c` is negative or not finite
    /// - `Convergence` if the root finder fails to bracket or converge
    pub fn optimize_for_expected_return(&self, c: f64) -> OuResult<ThresholdPair> {
        validate_non_negative("c", c)?;
        if c == 0.0 {
            debug!("zero cost, band collapses to theta");
            return Ok(ThresholdPair::symmetric(self.params.theta, self.params.theta));
        }

        let start = self.params.theta - c - self.config.root.initial_offset;
        let root = brent::find_root(
            |a| self.expected_return_condition(a, c),
            start,
            &self.config.root,
        )?;

        debug!(c, a = root.x, evaluations = root.evaluations, "expected-return thresholds");
        Ok(ThresholdPair::symmetric(self.params.theta, root.x))
    }

    /// Thresholds maximizing the Sharpe ratio for cost `c` and risk-free rate `rf`
    ///
    /// # Errors
    /// - `Domain` if `c` or `rf` is invalid, or the Sharpe ratio is undefined
    ///   at the start point `θ - rf - c`
    /// - `Convergence` if the simplex does not converge within its budget
    /// - `Numerical` if a series fails at a trial point
    pub fn optimize_for_sharpe_ratio(&self, c: f64, rf: f64) -> OuResult<ThresholdPair> {
        validate_non_negative("c", c)?;
        validate_finite("rf", rf)?;

        let theta = self.params.theta;
        let start = theta - rf - c;
        // an undefined start point is the caller's problem, not an infeasible vertex
        self.sharpe_ratio(start, 2.0 * theta - start, c, rf)?;

        let objective = |x: &DVector<f64>| -> OuResult<f64> {
            let a = x[0];
            match self.sharpe_ratio(a, 2.0 * theta - a, c, rf) {
                Ok(sharpe) => Ok(-sharpe),
                Err(OuError::Domain { .. }) => Ok(f64::INFINITY),
                Err(e) => Err(e),
            }
        };

        let minimum = nelder_mead::minimize(
            objective,
            DVector::from_vec(vec![start]),
            &self.config.simplex,
        )?;

        debug!(
            c,
            rf,
            a = minimum.x[0],
            sharpe = -minimum.value,
            iterations = minimum.iterations,
            "Sharpe-ratio thresholds"
        );
        Ok(ThresholdPair::symmetric(theta, minimum.x[0]))
    }
}
