// src/config.rs
//! Solver configuration
//!
//! Every tolerance and iteration cap used by the series summation, the root
//! finder and the simplex minimizer lives here. Each section has a `Default`
//! and a `validate()`, and the whole tree can be loaded from TOML:
//!
//! ```toml
//! [series]
//! rel_tol = 1e-15
//! max_terms = 5000
//!
//! [root]
//! initial_offset = 0.01
//! max_iter = 200
//!
//! [simplex]
//! x_tol = 1e-10
//! max_iter = 500
//! ```
//!
//! Missing keys fall back to their defaults.

use crate::error::{validation::*, OuError, OuResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Convergence settings for the infinite series (erfi, W1, W2)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Stop once two consecutive terms are below `rel_tol * |partial sum|`
    pub rel_tol: f64,
    /// Hard cap on the number of terms before giving up
    pub max_terms: usize,
}

impl SeriesConfig {
    pub fn validate(&self) -> OuResult<()> {
        validate_tolerance("series.rel_tol", self.rel_tol)?;
        validate_budget("series.max_terms", self.max_terms)?;
        Ok(())
    }
}

impl Default for SeriesConfig {
    fn default() -> Self {
        SeriesConfig {
            rel_tol: 1e-15,
            max_terms: 5_000,
        }
    }
}

/// Settings for the expected-return root finder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    /// Start point is `theta - c - initial_offset`
    pub initial_offset: f64,
    /// First step of the bracket search, doubled on every expansion
    pub bracket_step: f64,
    /// Maximum number of bracket expansions
    pub max_bracket_expansions: usize,
    /// Absolute tolerance on the root
    pub x_tol: f64,
    /// Maximum Brent iterations once a bracket is known
    pub max_iter: usize,
}

impl RootConfig {
    pub fn validate(&self) -> OuResult<()> {
        if !self.initial_offset.is_finite() {
            return Err(OuError::InvalidConfiguration {
                field: "root.initial_offset".to_string(),
                reason: "must be finite".to_string(),
            });
        }
        validate_tolerance("root.bracket_step", self.bracket_step)?;
        validate_budget("root.max_bracket_expansions", self.max_bracket_expansions)?;
        validate_tolerance("root.x_tol", self.x_tol)?;
        validate_budget("root.max_iter", self.max_iter)?;
        Ok(())
    }
}

impl Default for RootConfig {
    fn default() -> Self {
        RootConfig {
            initial_offset: 0.01,
            bracket_step: 0.01,
            max_bracket_expansions: 60,
            x_tol: 1e-12,
            max_iter: 200,
        }
    }
}

/// Settings for the Nelder-Mead minimizer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplexConfig {
    /// Converged when every vertex is within `x_tol` of the best one...
    pub x_tol: f64,
    /// ...and every function value is within `f_tol` of the best one
    pub f_tol: f64,
    pub max_iter: usize,
    /// Relative perturbation for nonzero coordinates of the initial simplex
    pub initial_step: f64,
    /// Absolute perturbation for zero coordinates of the initial simplex
    pub zero_step: f64,
}

impl SimplexConfig {
    pub fn validate(&self) -> OuResult<()> {
        validate_tolerance("simplex.x_tol", self.x_tol)?;
        validate_tolerance("simplex.f_tol", self.f_tol)?;
        validate_budget("simplex.max_iter", self.max_iter)?;
        validate_tolerance("simplex.initial_step", self.initial_step)?;
        validate_tolerance("simplex.zero_step", self.zero_step)?;
        Ok(())
    }
}

impl Default for SimplexConfig {
    fn default() -> Self {
        SimplexConfig {
            x_tol: 1e-10,
            f_tol: 1e-12,
            max_iter: 500,
            initial_step: 0.05,
            zero_step: 0.00025,
        }
    }
}

/// All numerical settings used by [`crate::analytics::bertram::BertramModel`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub series: SeriesConfig,
    pub root: RootConfig,
    pub simplex: SimplexConfig,
}

impl SolverConfig {
    /// Validate every section
    pub fn validate(&self) -> OuResult<()> {
        self.series.validate()?;
        self.root.validate()?;
        self.simplex.validate()?;
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> OuResult<Self> {
        let config: SolverConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> OuResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SolverConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SolverConfig::from_toml_str(
            r#"
            [series]
            max_terms = 800

            [simplex]
            x_tol = 1e-6
            "#,
        )
        .unwrap();

        assert_eq!(config.series.max_terms, 800);
        assert_eq!(config.series.rel_tol, SeriesConfig::default().rel_tol);
        assert_eq!(config.simplex.x_tol, 1e-6);
        assert_eq!(config.root, RootConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = SolverConfig::from_toml_str("").unwrap();
        assert_eq!(config, SolverConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SolverConfig::from_toml_str("[root]\nmax_iter = 0\n").unwrap_err();
        assert!(matches!(err, OuError::InvalidConfiguration { .. }));

        let err = SolverConfig::from_toml_str("[series]\nrel_tol = -1.0\n").unwrap_err();
        assert!(matches!(err, OuError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_malformed_toml() {
        let err = SolverConfig::from_toml_str("[series\nrel_tol = 1").unwrap_err();
        assert!(matches!(err, OuError::ConfigParse(_)));
    }
}
