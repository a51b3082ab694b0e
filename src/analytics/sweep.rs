// src/analytics/sweep.rs
//! Threshold and performance curves over a grid of costs or rates
//!
//! Each point is an independent optimization, so the grid is evaluated in
//! parallel with rayon. Output order always matches input order, and the
//! first failing point aborts the whole sweep.

use crate::analytics::bertram::BertramModel;
use crate::analytics::thresholds::ThresholdPair;
use crate::error::OuResult;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One row of a sweep: the swept input, the optimal pair and a statistic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Transaction cost or risk-free rate, depending on the sweep
    pub input: f64,
    pub a: f64,
    pub m: f64,
    /// Statistic evaluated at `(a, m)`; equals `a` for pure threshold sweeps
    pub value: f64,
}

impl SweepPoint {
    pub fn thresholds(&self) -> ThresholdPair {
        ThresholdPair { a: self.a, m: self.m }
    }
}

fn sweep<F>(inputs: &[f64], point: F) -> OuResult<Vec<SweepPoint>>
where
    F: Fn(f64) -> OuResult<SweepPoint> + Sync + Send,
{
    inputs.par_iter().map(|&input| point(input)).collect()
}

impl BertramModel {
    /// Expected-return-optimal thresholds for each cost in `costs`
    pub fn thresholds_vs_cost(&self, costs: &[f64]) -> OuResult<Vec<SweepPoint>> {
        sweep(costs, |c| {
            let pair = self.optimize_for_expected_return(c)?;
            Ok(SweepPoint {
                input: c,
                a: pair.a,
                m: pair.m,
                value: pair.a,
            })
        })
    }

    /// Maximum expected return for each cost in `costs`
    ///
    /// A zero cost yields the collapsed pair `a = m = θ` valued at
    /// [`BertramModel::zero_band_return`].
    pub fn max_expected_return_vs_cost(&self, costs: &[f64]) -> OuResult<Vec<SweepPoint>> {
        sweep(costs, |c| {
            let pair = self.optimize_for_expected_return(c)?;
            let value = if pair.width() > 0.0 {
                self.expected_return(pair.a, pair.m, c)?
            } else {
                self.zero_band_return()
            };
            Ok(SweepPoint {
                input: c,
                a: pair.a,
                m: pair.m,
                value,
            })
        })
    }

    /// Sharpe-optimal thresholds for cost `c` and each rate in `rates`
    pub fn thresholds_vs_rate(&self, c: f64, rates: &[f64]) -> OuResult<Vec<SweepPoint>> {
        sweep(rates, |rf| {
            let pair = self.optimize_for_sharpe_ratio(c, rf)?;
            Ok(SweepPoint {
                input: rf,
                a: pair.a,
                m: pair.m,
                value: pair.a,
            })
        })
    }

    /// Maximum Sharpe ratio for cost `c` and each rate in `rates`
    pub fn max_sharpe_vs_rate(&self, c: f64, rates: &[f64]) -> OuResult<Vec<SweepPoint>> {
        sweep(rates, |rf| {
            let pair = self.optimize_for_sharpe_ratio(c, rf)?;
            Ok(SweepPoint {
                input: rf,
                a: pair.a,
                m: pair.m,
                value: self.sharpe_ratio(pair.a, pair.m, c, rf)?,
            })
        })
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.3, 1.0, 1), vec![0.3]);
        let grid = linspace(0.0, 0.5, 6);
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0], 0.0);
        assert!((grid[5] - 0.5).abs() < 1e-15);
        assert!((grid[2] - 0.2).abs() < 1e-15);
    }

    #[test]
    fn test_sweep_preserves_order() {
        let model = BertramModel::from_parts(1.0, 0.0, 1.0).unwrap();
        let costs = [0.3, 0.05, 0.2, 0.1];
        let points = model.thresholds_vs_cost(&costs).unwrap();
        let inputs: Vec<f64> = points.iter().map(|p| p.input).collect();
        assert_eq!(inputs, costs.to_vec());
        for p in &points {
            assert_eq!(p.value, p.a);
            assert_eq!(p.thresholds().m, p.m);
        }
    }

    #[test]
    fn test_zero_cost_point_is_recorded() {
        let model = BertramModel::from_parts(1.0, 0.0, 1.0).unwrap();
        let points = model.max_expected_return_vs_cost(&[0.0, 0.1]).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!((points[0].a, points[0].m), (0.0, 0.0));
        assert_eq!(points[0].value, model.zero_band_return());
        assert!(points[1].value < points[0].value);

        let thresholds = model.thresholds_vs_cost(&[0.0]).unwrap();
        assert_eq!(thresholds[0].a, 0.0);
    }

    #[test]
    fn test_sweep_aborts_on_error() {
        let model = BertramModel::from_parts(1.0, 0.0, 1.0).unwrap();
        let err = model.thresholds_vs_cost(&[0.1, -1.0, 0.2]).unwrap_err();
        assert!(err.is_domain());
    }
}
