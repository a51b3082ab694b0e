// src/analytics/series.rs
//! Convergent series behind the trade-length variance
//!
//! Bertram's variance formula needs two auxiliary functions of the
//! normalized threshold `x = (z - θ)·√(2μ)/σ`:
//!
//! ```text
//! w1(x) = (½ Σ_{k≥1} Γ(k/2) (1.414x)^k / k!)² - (½ Σ_{k≥1} (-1)^k Γ(k/2) (1.414x)^k / k!)²
//! w2(x) = Σ_{k≥1} (ψ((2k-1)/2) - ψ(1)) Γ((2k-1)/2) (1.414x)^(2k-1) / (2k-1)!
//! ```
//!
//! The constant 1.414 is the published truncation of √2 and is kept as is.
//!
//! Splitting the first sum into its even part `E` and odd part `O`, the two
//! bracketed sums are `E + O` and `E - O`, so `w1 = E·O` exactly.
//!
//! Terms are built in log space (`ln Γ`, `ln k!`), so `k!` never overflows;
//! the factorial decay guarantees convergence for every finite `x`.

use crate::config::SeriesConfig;
use crate::error::{OuError, OuResult};
use statrs::function::factorial::ln_factorial;
use statrs::function::gamma::{digamma, ln_gamma};

/// Truncated √2 used by the published formulas
pub const SQRT_2_TRUNCATED: f64 = 1.414;

/// Sum `term(first) + term(first + 1) + ...` until it converges
///
/// Stops once two consecutive terms satisfy `|t_k| <= rel_tol * |S_k|`.
///
/// # Errors
/// `OuError::Numerical` if a term or the partial sum stops being finite, or
/// if `cfg.max_terms` terms were added without meeting the criterion.
pub fn sum_series<F>(method: &str, first: usize, cfg: &SeriesConfig, mut term: F) -> OuResult<f64>
where
    F: FnMut(usize) -> f64,
{
    let mut sum = 0.0;
    let mut small_terms = 0;

    for k in first..first + cfg.max_terms {
        let t = term(k);
        sum += t;

        if !t.is_finite() || !sum.is_finite() {
            return Err(OuError::numerical(
                method,
                format!("series diverged at term {} (term = {}, sum = {})", k, t, sum),
            ));
        }

        if t.abs() <= cfg.rel_tol * sum.abs() {
            small_terms += 1;
            if small_terms == 2 {
                return Ok(sum);
            }
        } else {
            small_terms = 0;
        }
    }

    Err(OuError::numerical(
        method,
        format!(
            "series did not converge within {} terms (partial sum = {})",
            cfg.max_terms, sum
        ),
    ))
}

/// `sign · exp(ln_magnitude)` for `y^k` with a possibly negative base
#[inline]
fn signed_power_term(y: f64, k: u64, ln_coefficient: f64) -> f64 {
    let magnitude = (ln_coefficient + k as f64 * y.abs().ln()).exp();
    if y < 0.0 && k % 2 == 1 {
        -magnitude
    } else {
        magnitude
    }
}

/// `Γ(k/2) y^k / k!`
#[inline]
fn w1_term(y: f64, k: u64) -> f64 {
    signed_power_term(y, k, ln_gamma(k as f64 / 2.0) - ln_factorial(k))
}

/// First auxiliary function of the variance formula
pub fn w1(x: f64, cfg: &SeriesConfig) -> OuResult<f64> {
    let y = SQRT_2_TRUNCATED * x;
    if y == 0.0 {
        return Ok(0.0);
    }

    let even = sum_series("w1 (even terms)", 1, cfg, |j| w1_term(y, 2 * j as u64))?;
    let odd = sum_series("w1 (odd terms)", 1, cfg, |j| w1_term(y, 2 * j as u64 - 1))?;

    Ok(even * odd)
}

/// Second auxiliary function of the variance formula
pub fn w2(x: f64, cfg: &SeriesConfig) -> OuResult<f64> {
    let y = SQRT_2_TRUNCATED * x;
    if y == 0.0 {
        return Ok(0.0);
    }

    let psi_one = digamma(1.0);
    sum_series("w2", 1, cfg, |k| {
        let half = (2 * k - 1) as f64 / 2.0;
        let power = 2 * k as u64 - 1;
        let weight = digamma(half) - psi_one;
        weight * signed_power_term(y, power, ln_gamma(half) - ln_factorial(power))
    })
}
