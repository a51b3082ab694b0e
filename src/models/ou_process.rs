// src/models/ou_process.rs
//! Ornstein-Uhlenbeck spread model
//!
//! ```text
//! dX_t = μ(θ - X_t) dt + σ dW_t
//! ```
//!
//! - μ: mean reversion speed
//! - θ: long-run mean
//! - σ: volatility
//!
//! The parameters are estimated elsewhere; this module only validates and
//! holds them.

use super::model::SDEModel;
use crate::error::{validation::*, OuResult};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OuParams {
    pub mu: f64,    // Mean reversion speed
    pub theta: f64, // Long-run mean
    pub sigma: f64, // Volatility
}

impl OuParams {
    /// Validated constructor: `mu > 0`, `sigma > 0`, all finite
    pub fn new(mu: f64, theta: f64, sigma: f64) -> OuResult<Self> {
        let params = OuParams { mu, theta, sigma };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> OuResult<()> {
        validate_positive("mu", self.mu)?;
        validate_finite("theta", self.theta)?;
        validate_positive("sigma", self.sigma)?;
        Ok(())
    }

    /// Stationary standard deviation `σ/√(2μ)`
    pub fn stationary_std(&self) -> f64 {
        self.sigma / (2.0 * self.mu).sqrt()
    }

    /// Half-life of a deviation from the mean, `ln 2 / μ`
    pub fn half_life(&self) -> f64 {
        std::f64::consts::LN_2 / self.mu
    }
}

/// OU dynamics for the Euler-Maruyama stepper
pub struct OuProcess {
    pub params: OuParams,
}

impl OuProcess {
    pub fn new(params: OuParams) -> OuResult<Self> {
        params.validate()?;
        Ok(OuProcess { params })
    }
}

impl SDEModel for OuProcess {
    fn drift(&self, x: f64, _t: f64) -> f64 {
        self.params.mu * (self.params.theta - x)
    }

    fn diffusion(&self, _x: f64, _t: f64) -> f64 {
        self.params.sigma
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(OuParams::new(1.0, 0.0, 1.0).is_ok());
        assert!(OuParams::new(0.0, 0.0, 1.0).unwrap_err().is_domain());
        assert!(OuParams::new(-1.0, 0.0, 1.0).unwrap_err().is_domain());
        assert!(OuParams::new(1.0, 0.0, 0.0).unwrap_err().is_domain());
        assert!(OuParams::new(1.0, f64::NAN, 1.0).unwrap_err().is_domain());
    }

    #[test]
    fn test_derived_quantities() {
        let params = OuParams::new(2.0, 0.5, 0.4).unwrap();
        assert!((params.stationary_std() - 0.2).abs() < 1e-15);
        assert!((params.half_life() - std::f64::consts::LN_2 / 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_drift_pulls_towards_mean() {
        let process = OuProcess::new(OuParams::new(1.5, 1.0, 0.3).unwrap()).unwrap();
        assert!(process.drift(2.0, 0.0) < 0.0);
        assert!(process.drift(0.0, 0.0) > 0.0);
        assert_eq!(process.drift(1.0, 0.0), 0.0);
        assert_eq!(process.diffusion(5.0, 0.0), 0.3);
    }
}
