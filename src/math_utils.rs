// src/math_utils.rs
use crate::analytics::series::sum_series;
use crate::config::SeriesConfig;
use crate::error::{OuError, OuResult};
use std::f64::consts::PI;

/// Imaginary error function `erfi(x) = -i·erf(ix)`
///
/// # Formula
/// ```text
/// erfi(x) = 2/√π · Σ_{n≥0} x^(2n+1) / (n! (2n+1))
/// ```
///
/// Every term carries the sign of `x`, so the partial sums never cancel and
/// the relative error stays at the level of a few ulps. `erfi` grows like
/// `exp(x²)/(x√π)` and overflows past |x| ≈ 26.5, which is reported as a
/// numerical error.
pub fn erfi(x: f64, cfg: &SeriesConfig) -> OuResult<f64> {
    if x.is_nan() {
        return Err(OuError::numerical("erfi", "argument is NaN"));
    }
    if x == 0.0 {
        return Ok(0.0);
    }

    let x2 = x * x;
    // power = x^(2n+1)/n!, updated in place
    let mut power = x;
    let sum = sum_series("erfi", 0, cfg, |n| {
        if n > 0 {
            power *= x2 / n as f64;
        }
        power / (2 * n + 1) as f64
    })?;

    let value = 2.0 / PI.sqrt() * sum;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OuError::numerical(
            "erfi",
            format!("erfi({}) overflows double precision", x),
        ))
    }
}

/// Wall-clock stopwatch for the sweep binary
pub struct Timer {
    start_time: std::time::Instant,
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_erfi_reference_values() {
        let cfg = SeriesConfig::default();
        // mpmath.erfi at 30 digits
        assert_relative_eq!(erfi(1.0, &cfg).unwrap(), 1.650_425_758_797_542_9, max_relative = 1e-13);
        assert_relative_eq!(erfi(0.5, &cfg).unwrap(), 0.614_952_094_696_511, max_relative = 1e-13);
        assert_relative_eq!(erfi(2.0, &cfg).unwrap(), 18.564_802_414_575_55, max_relative = 1e-13);
    }

    #[test]
    fn test_erfi_is_odd() {
        let cfg = SeriesConfig::default();
        for &x in &[0.1, 0.7, 1.3, 3.0, 5.5] {
            let pos = erfi(x, &cfg).unwrap();
            let neg = erfi(-x, &cfg).unwrap();
            assert_eq!(pos, -neg);
        }
        assert_eq!(erfi(0.0, &cfg).unwrap(), 0.0);
    }

    #[test]
    fn test_erfi_overflow_is_reported() {
        let cfg = SeriesConfig::default();
        assert!(erfi(30.0, &cfg).unwrap_err().is_numerical());
        assert!(erfi(f64::NAN, &cfg).unwrap_err().is_numerical());
    }

    #[test]
    fn test_erfi_small_term_budget_fails() {
        let cfg = SeriesConfig {
            max_terms: 3,
            ..SeriesConfig::default()
        };
        assert!(erfi(4.0, &cfg).unwrap_err().is_numerical());
    }
}
