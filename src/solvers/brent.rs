// src/solvers/brent.rs
//! Derivative-free root finding
//!
//! # Algorithm
//!
//! 1. **Bracketing**: starting from `x0`, evaluate `x0 - h` and `x0 + h` with
//!    `h` doubling each round until `f` changes sign. A side whose evaluation
//!    fails with a numerical error is not expanded further.
//! 2. **Brent's method**: inside the bracket, take inverse quadratic or
//!    secant steps when they stay well inside the interval and fall back to
//!    bisection otherwise.
//!
//! The bracket is never lost, so convergence is guaranteed once a sign change
//! has been found; the iteration cap only bounds the work.

use crate::config::RootConfig;
use crate::error::{OuError, OuResult};
use tracing::{debug, warn};

/// Located root and the work spent finding it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    pub x: f64,
    pub value: f64,
    pub evaluations: usize,
}

struct Counted<F> {
    f: F,
    evaluations: usize,
}

impl<F: FnMut(f64) -> OuResult<f64>> Counted<F> {
    fn eval(&mut self, x: f64) -> OuResult<f64> {
        self.evaluations += 1;
        let y = (self.f)(x)?;
        if y.is_nan() {
            return Err(OuError::numerical(
                "root finder",
                format!("objective returned NaN at x = {}", x),
            ));
        }
        Ok(y)
    }
}

#[inline]
fn opposite_signs(a: f64, b: f64) -> bool {
    (a < 0.0 && b > 0.0) || (a > 0.0 && b < 0.0)
}

/// Find a root of `f` near `x0`
///
/// # Errors
/// - `Convergence` if no sign change is found within
///   `cfg.max_bracket_expansions` rounds, or Brent's method exceeds
///   `cfg.max_iter` iterations
/// - `Numerical` if both sides of the bracket search fail numerically
/// - any error returned by `f` at `x0` or inside the bracket, and any
///   non-numerical error while bracketing
pub fn find_root<F>(f: F, x0: f64, cfg: &RootConfig) -> OuResult<Root>
where
    F: FnMut(f64) -> OuResult<f64>,
{
    let mut f = Counted { f, evaluations: 0 };

    let f0 = f.eval(x0)?;
    if f0 == 0.0 {
        return Ok(Root {
            x: x0,
            value: f0,
            evaluations: f.evaluations,
        });
    }

    let mut step = cfg.bracket_step;
    let mut lower_open = true;
    let mut upper_open = true;
    let mut last_failure = None;
    for _ in 0..cfg.max_bracket_expansions {
        for (x, open) in [(x0 - step, &mut lower_open), (x0 + step, &mut upper_open)] {
            if !*open {
                continue;
            }
            let fx = match f.eval(x) {
                Ok(fx) => fx,
                Err(e @ OuError::Numerical { .. }) => {
                    debug!(x0, x, error = %e, "evaluation failed, closing this side of the bracket");
                    *open = false;
                    last_failure = Some(e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            if fx == 0.0 {
                return Ok(Root {
                    x,
                    value: fx,
                    evaluations: f.evaluations,
                });
            }
            if opposite_signs(f0, fx) {
                debug!(x0, x, f0, fx, "bracketed root");
                return brent(&mut f, x0, x, f0, fx, cfg);
            }
        }
        if !lower_open && !upper_open {
            if let Some(e) = last_failure {
                return Err(e);
            }
        }
        step *= 2.0;
    }

    warn!(x0, f0, step, "bracket search exhausted without a sign change");
    Err(OuError::convergence(
        "bracket search",
        cfg.max_bracket_expansions,
        format!("no sign change found around x0 = {} (f(x0) = {})", x0, f0),
    ))
}

fn brent<F>(f: &mut Counted<F>, x_a: f64, x_b: f64, f_a: f64, f_b: f64, cfg: &RootConfig) -> OuResult<Root>
where
    F: FnMut(f64) -> OuResult<f64>,
{
    let (mut a, mut b, mut fa, mut fb) = (x_a, x_b, f_a, f_b);
    let (mut c, mut fc) = (b, fb);
    let mut d = b - a;
    let mut e = d;

    for iteration in 0..cfg.max_iter {
        if !opposite_signs(fb, fc) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * cfg.x_tol;
        let half = 0.5 * (c - b);
        if half.abs() <= tol || fb == 0.0 {
            debug!(root = b, iterations = iteration, evaluations = f.evaluations, "Brent converged");
            return Ok(Root {
                x: b,
                value: fb,
                evaluations: f.evaluations,
            });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                // secant
                (2.0 * half * s, 1.0 - s)
            } else {
                // inverse quadratic interpolation
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * half * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }

            let bound = (3.0 * half * q - (tol * q).abs()).min((e * q).abs());
            if p.is_finite() && q.is_finite() && 2.0 * p < bound {
                e = d;
                d = p / q;
            } else {
                d = half;
                e = d;
            }
        } else {
            d = half;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(half) };
        fb = f.eval(b)?;
    }

    Err(OuError::convergence(
        "Brent root finder",
        cfg.max_iter,
        format!("bracket [{}, {}] still wider than tolerance {}", b, c, cfg.x_tol),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_polynomial_root() {
        let cfg = RootConfig::default();
        let root = find_root(|x| Ok(x * x * x - 2.0 * x - 5.0), 2.0, &cfg).unwrap();
        assert_abs_diff_eq!(root.x, 2.094_551_481_542_326_5, epsilon = 1e-11);
        assert!(root.evaluations < 60);
    }

    #[test]
    fn test_far_start_expands_bracket() {
        let cfg = RootConfig::default();
        let root = find_root(|x| Ok(x - 7.25), 0.0, &cfg).unwrap();
        assert_abs_diff_eq!(root.x, 7.25, epsilon = 1e-11);
    }

    #[test]
    fn test_steep_function() {
        let cfg = RootConfig::default();
        let root = find_root(|x: f64| Ok(x.exp() - 1e3), 0.0, &cfg).unwrap();
        assert_abs_diff_eq!(root.x, 1e3f64.ln(), epsilon = 1e-10);
    }

    #[test]
    fn test_no_sign_change() {
        let cfg = RootConfig {
            max_bracket_expansions: 10,
            ..RootConfig::default()
        };
        let err = find_root(|x| Ok(x * x + 1.0), 0.0, &cfg).unwrap_err();
        assert!(err.is_convergence());
    }

    #[test]
    fn test_iteration_budget() {
        let cfg = RootConfig {
            max_iter: 2,
            x_tol: 1e-15,
            ..RootConfig::default()
        };
        let err = find_root(|x: f64| Ok(x.cos() - x), 0.0, &cfg).unwrap_err();
        assert!(err.is_convergence());
    }

    #[test]
    fn test_objective_errors_propagate() {
        let cfg = RootConfig::default();
        let err = find_root(|_| Err(OuError::numerical("test", "boom")), 0.0, &cfg).unwrap_err();
        assert!(err.is_numerical());

        let err = find_root(|_| Ok(f64::NAN), 0.0, &cfg).unwrap_err();
        assert!(err.is_numerical());
    }

    #[test]
    fn test_numerical_failure_closes_one_side() {
        let cfg = RootConfig::default();
        // overflows below -0.5, root at 1.3
        let f = |x: f64| {
            if x < -0.5 {
                Err(OuError::numerical("test", "overflow"))
            } else {
                Ok(x - 1.3)
            }
        };
        let root = find_root(f, 0.0, &cfg).unwrap();
        assert_abs_diff_eq!(root.x, 1.3, epsilon = 1e-11);
    }

    #[test]
    fn test_numerical_failure_on_both_sides() {
        let cfg = RootConfig::default();
        let f = |x: f64| {
            if x.abs() > 0.1 {
                Err(OuError::numerical("test", "overflow"))
            } else {
                Ok(1.0 + x * x)
            }
        };
        let err = find_root(f, 0.0, &cfg).unwrap_err();
        assert!(err.is_numerical());

        let domain = find_root(
            |x: f64| if x == 0.0 { Ok(1.0) } else { Err(OuError::domain("x", x, "rejected")) },
            0.0,
            &cfg,
        )
        .unwrap_err();
        assert!(domain.is_domain());
    }

    #[test]
    fn test_deterministic() {
        let cfg = RootConfig::default();
        let f = |x: f64| Ok(x.sin() - 0.3 * x);
        let first = find_root(f, 2.0, &cfg).unwrap();
        let second = find_root(f, 2.0, &cfg).unwrap();
        assert_eq!(first.x.to_bits(), second.x.to_bits());
    }
}
