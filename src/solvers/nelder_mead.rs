// src/solvers/nelder_mead.rs
//! Nelder-Mead downhill simplex minimization
//!
//! # Algorithm
//!
//! Keeps `n + 1` vertices sorted by objective value. Each iteration replaces
//! the worst vertex `x_w` using the centroid `x̄` of the others:
//! ```text
//! reflection:          x_r  = x̄ + ρ(x̄ - x_w)            ρ = 1
//! expansion:           x_e  = x̄ + ρχ(x̄ - x_w)           χ = 2
//! outside contraction: x_c  = x̄ + ψρ(x̄ - x_w)           ψ = ½
//! inside contraction:  x_cc = x̄ - ψ(x̄ - x_w)
//! shrink:              x_i  = x_0 + σ(x_i - x_0)          σ = ½
//! ```
//!
//! The initial simplex perturbs each coordinate of the start point by
//! `initial_step` (relative) or, for zero coordinates, `zero_step`
//! (absolute). Convergence requires both the simplex diameter (`x_tol`) and
//! the spread of function values (`f_tol`) to be small.
//!
//! Objectives may return `f64::INFINITY` to mark infeasible points; such
//! vertices simply sort last.

use crate::config::SimplexConfig;
use crate::error::{OuError, OuResult};
use nalgebra::DVector;
use tracing::{debug, warn};

const RHO: f64 = 1.0;
const CHI: f64 = 2.0;
const PSI: f64 = 0.5;
const SIGMA: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub x: DVector<f64>,
    pub value: f64,
    pub iterations: usize,
    pub evaluations: usize,
}

struct Simplex<F> {
    f: F,
    vertices: Vec<DVector<f64>>,
    values: Vec<f64>,
    evaluations: usize,
}

impl<F: FnMut(&DVector<f64>) -> OuResult<f64>> Simplex<F> {
    fn eval(&mut self, x: &DVector<f64>) -> OuResult<f64> {
        self.evaluations += 1;
        let y = (self.f)(x)?;
        if y.is_nan() {
            return Err(OuError::numerical(
                "Nelder-Mead",
                format!("objective returned NaN at {:?}", x.as_slice()),
            ));
        }
        Ok(y)
    }

    fn sort(&mut self) {
        let mut order: Vec<usize> = (0..self.values.len()).collect();
        order.sort_by(|&i, &j| self.values[i].total_cmp(&self.values[j]));
        self.vertices = order.iter().map(|&i| self.vertices[i].clone()).collect();
        self.values = order.iter().map(|&i| self.values[i]).collect();
    }

    fn converged(&self, cfg: &SimplexConfig) -> bool {
        let best = &self.vertices[0];
        let x_spread = self.vertices[1..]
            .iter()
            .map(|v| (v - best).amax())
            .fold(0.0, f64::max);
        let f_spread = self.values[1..]
            .iter()
            .map(|&y| (y - self.values[0]).abs())
            .fold(0.0, f64::max);
        x_spread <= cfg.x_tol && f_spread <= cfg.f_tol
    }

    fn centroid(&self) -> DVector<f64> {
        let n = self.vertices.len() - 1;
        let mut sum = DVector::<f64>::zeros(self.vertices[0].len());
        for v in &self.vertices[..n] {
            sum += v;
        }
        sum / n as f64
    }
}

/// Minimize `f` starting from `x0`
///
/// # Errors
/// - `Convergence` if `cfg.max_iter` iterations pass without convergence
/// - `Numerical` if the objective returns NaN
/// - any error returned by `f`
pub fn minimize<F>(f: F, x0: DVector<f64>, cfg: &SimplexConfig) -> OuResult<Minimum>
where
    F: FnMut(&DVector<f64>) -> OuResult<f64>,
{
    let n = x0.len();
    if n == 0 {
        return Err(OuError::InvalidConfiguration {
            field: "x0".to_string(),
            reason: "start point must have at least one coordinate".to_string(),
        });
    }

    let mut simplex = Simplex {
        f,
        vertices: Vec::with_capacity(n + 1),
        values: Vec::with_capacity(n + 1),
        evaluations: 0,
    };

    simplex.vertices.push(x0.clone());
    for k in 0..n {
        let mut y = x0.clone();
        if y[k] != 0.0 {
            y[k] *= 1.0 + cfg.initial_step;
        } else {
            y[k] = cfg.zero_step;
        }
        simplex.vertices.push(y);
    }
    for i in 0..=n {
        let vertex = simplex.vertices[i].clone();
        let value = simplex.eval(&vertex)?;
        simplex.values.push(value);
    }
    simplex.sort();

    let mut iterations = 0;
    while iterations < cfg.max_iter {
        if simplex.converged(cfg) {
            debug!(
                iterations,
                evaluations = simplex.evaluations,
                value = simplex.values[0],
                "Nelder-Mead converged"
            );
            return Ok(Minimum {
                x: simplex.vertices[0].clone(),
                value: simplex.values[0],
                iterations,
                evaluations: simplex.evaluations,
            });
        }

        let xbar = simplex.centroid();
        let worst = simplex.vertices[n].clone();
        let f_best = simplex.values[0];
        let f_second_worst = simplex.values[n - 1];
        let f_worst = simplex.values[n];

        let xr = &xbar * (1.0 + RHO) - &worst * RHO;
        let fxr = simplex.eval(&xr)?;

        let mut shrink = false;
        if fxr < f_best {
            let xe = &xbar * (1.0 + RHO * CHI) - &worst * (RHO * CHI);
            let fxe = simplex.eval(&xe)?;
            if fxe < fxr {
                simplex.vertices[n] = xe;
                simplex.values[n] = fxe;
            } else {
                simplex.vertices[n] = xr;
                simplex.values[n] = fxr;
            }
        } else if fxr < f_second_worst {
            simplex.vertices[n] = xr;
            simplex.values[n] = fxr;
        } else if fxr < f_worst {
            let xc = &xbar * (1.0 + PSI * RHO) - &worst * (PSI * RHO);
            let fxc = simplex.eval(&xc)?;
            if fxc <= fxr {
                simplex.vertices[n] = xc;
                simplex.values[n] = fxc;
            } else {
                shrink = true;
            }
        } else {
            let xcc = &xbar * (1.0 - PSI) + &worst * PSI;
            let fxcc = simplex.eval(&xcc)?;
            if fxcc < f_worst {
                simplex.vertices[n] = xcc;
                simplex.values[n] = fxcc;
            } else {
                shrink = true;
            }
        }

        if shrink {
            let best = simplex.vertices[0].clone();
            for j in 1..=n {
                let vertex = &best + (&simplex.vertices[j] - &best) * SIGMA;
                let value = simplex.eval(&vertex)?;
                simplex.vertices[j] = vertex;
                simplex.values[j] = value;
            }
        }

        iterations += 1;
        simplex.sort();
    }

    warn!(
        max_iter = cfg.max_iter,
        best = simplex.values[0],
        "Nelder-Mead exhausted its iteration budget"
    );
    Err(OuError::convergence(
        "Nelder-Mead",
        cfg.max_iter,
        format!(
            "best value {} at {:?} did not meet x_tol = {}, f_tol = {}",
            simplex.values[0],
            simplex.vertices[0].as_slice(),
            cfg.x_tol,
            cfg.f_tol
        ),
    ))
}
