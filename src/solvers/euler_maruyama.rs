// src/solvers/euler_maruyama.rs
//! Euler-Maruyama Scheme for SDE Integration
//!
//! For a scalar SDE:
//! ```text
//! dX_t = a(X_t, t) dt + b(X_t, t) dW_t
//! ```
//!
//! the scheme advances the state by
//! ```text
//! X_{n+1} = X_n + a(X_n, t_n) Δt + b(X_n, t_n) ΔW_n,    ΔW_n ~ N(0, Δt)
//! ```
//!
//! Strong order 0.5, weak order 1.0. For the OU spread the diffusion is
//! constant, so the scheme coincides with Milstein.

use crate::models::model::SDEModel;
use crate::rng;
use rand::Rng;

/// Euler-Maruyama numerical scheme for SDE integration
pub struct EulerMaruyama;

impl EulerMaruyama {
    /// Single Euler-Maruyama step
    ///
    /// # Parameters
    /// - `model`: SDE model providing drift and diffusion functions
    /// - `x`: Current state (modified in-place)
    /// - `t`: Current time
    /// - `dt`: Time step size
    /// - `rng`: Random number generator
    pub fn step<M: SDEModel, R: Rng + ?Sized>(model: &M, x: &mut f64, t: f64, dt: f64, rng: &mut R) {
        let normal_draw = rng::get_normal_draw(rng);
        Self::step_with_draw(model, x, t, dt, normal_draw);
    }

    /// Step with a caller-supplied standard normal draw
    pub fn step_with_draw<M: SDEModel>(model: &M, x: &mut f64, t: f64, dt: f64, normal_draw: f64) {
        let drift_term = model.drift(*x, t) * dt;
        let diffusion_term = model.diffusion(*x, t) * dt.sqrt() * normal_draw;
        *x += drift_term + diffusion_term;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ou_process::{OuParams, OuProcess};

    #[test]
    fn test_deterministic_step() {
        let process = OuProcess::new(OuParams::new(2.0, 1.0, 0.5).unwrap()).unwrap();
        let mut x = 0.0;
        EulerMaruyama::step_with_draw(&process, &mut x, 0.0, 0.01, 1.0);
        // 0 + 2·(1 - 0)·0.01 + 0.5·0.1·1
        assert!((x - 0.07).abs() < 1e-15);
    }

    #[test]
    fn test_zero_noise_decays_towards_mean() {
        let process = OuProcess::new(OuParams::new(1.0, 0.0, 0.3).unwrap()).unwrap();
        let mut x = 1.0;
        for i in 0..1000 {
            EulerMaruyama::step_with_draw(&process, &mut x, i as f64 * 0.001, 0.001, 0.0);
        }
        // (1 - 0.001)^1000 ≈ e^-1
        assert!((x - (-1.0f64).exp()).abs() < 1e-3);
    }
}
