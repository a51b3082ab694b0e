// src/error.rs
use thiserror::Error;

/// Error types for the ou-threshold library
#[derive(Error, Debug)]
pub enum OuError {
    /// Invalid parameter or threshold values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    Domain {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Series divergence or non-finite intermediate results
    #[error("Numerical error in {method}: {reason}")]
    Numerical { method: String, reason: String },

    /// Root finder, minimizer or simulation ran out of iterations
    #[error("{method} did not converge after {iterations} iterations: {reason}")]
    Convergence {
        method: String,
        iterations: usize,
        reason: String,
    },

    /// Invalid solver configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("Failed to parse TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OuError {
    pub fn domain(parameter: &str, value: f64, constraint: impl Into<String>) -> Self {
        OuError::Domain {
            parameter: parameter.to_string(),
            value,
            constraint: constraint.into(),
        }
    }

    pub fn numerical(method: &str, reason: impl Into<String>) -> Self {
        OuError::Numerical {
            method: method.to_string(),
            reason: reason.into(),
        }
    }

    pub fn convergence(method: &str, iterations: usize, reason: impl Into<String>) -> Self {
        OuError::Convergence {
            method: method.to_string(),
            iterations,
            reason: reason.into(),
        }
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, OuError::Domain { .. })
    }

    pub fn is_numerical(&self) -> bool {
        matches!(self, OuError::Numerical { .. })
    }

    pub fn is_convergence(&self) -> bool {
        matches!(self, OuError::Convergence { .. })
    }
}

/// Result type alias for ou-threshold operations
pub type OuResult<T> = Result<T, OuError>;

/// Validation utilities
pub mod validation {
    use super::{OuError, OuResult};

    /// Validate that a parameter is positive and finite
    pub fn validate_positive(name: &str, value: f64) -> OuResult<()> {
        validate_finite(name, value)?;
        if value <= 0.0 {
            Err(OuError::domain(name, value, "must be positive (> 0)"))
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative and finite
    pub fn validate_non_negative(name: &str, value: f64) -> OuResult<()> {
        validate_finite(name, value)?;
        if value < 0.0 {
            Err(OuError::domain(name, value, "must be non-negative (≥ 0)"))
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> OuResult<()> {
        if !value.is_finite() {
            Err(OuError::domain(
                name,
                value,
                "must be finite (not NaN or infinite)",
            ))
        } else {
            Ok(())
        }
    }

    /// Validate an entry/exit pair: both finite and `a < m`
    pub fn validate_thresholds(a: f64, m: f64) -> OuResult<()> {
        validate_finite("a", a)?;
        validate_finite("m", m)?;
        if a >= m {
            Err(OuError::domain(
                "a",
                a,
                format!("entry threshold must be below exit threshold m = {}", m),
            ))
        } else {
            Ok(())
        }
    }

    /// Validate an iteration budget
    pub fn validate_budget(field: &str, value: usize) -> OuResult<()> {
        if value == 0 {
            Err(OuError::InvalidConfiguration {
                field: field.to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate a convergence tolerance
    pub fn validate_tolerance(field: &str, value: f64) -> OuResult<()> {
        if !value.is_finite() || value <= 0.0 {
            Err(OuError::InvalidConfiguration {
                field: field.to_string(),
                reason: format!("tolerance must be positive and finite, got {}", value),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("sigma", 0.2).is_ok());
        assert!(validate_positive("sigma", 0.0).is_err());
        assert!(validate_positive("sigma", -0.1).is_err());
        assert!(validate_positive("sigma", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("value", 1.0).is_ok());
        assert!(validate_finite("value", f64::NAN).is_err());
        assert!(validate_finite("value", f64::INFINITY).is_err());
        assert!(validate_finite("value", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_validate_thresholds() {
        assert!(validate_thresholds(-1.0, 1.0).is_ok());
        assert!(validate_thresholds(1.0, 1.0).unwrap_err().is_domain());
        assert!(validate_thresholds(2.0, 1.0).unwrap_err().is_domain());
        assert!(validate_thresholds(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_validate_budget_and_tolerance() {
        assert!(validate_budget("max_iter", 10).is_ok());
        assert!(matches!(
            validate_budget("max_iter", 0),
            Err(OuError::InvalidConfiguration { .. })
        ));
        assert!(validate_tolerance("x_tol", 1e-12).is_ok());
        assert!(validate_tolerance("x_tol", 0.0).is_err());
        assert!(validate_tolerance("x_tol", f64::NAN).is_err());
    }

    #[test]
    fn test_error_display() {
        let error = OuError::domain("sigma", -0.1, "must be positive");

        let display = format!("{}", error);
        assert!(display.contains("sigma"));
        assert!(display.contains("-0.1"));
        assert!(display.contains("positive"));
    }

    #[test]
    fn test_convergence_error_display() {
        let error = OuError::convergence("Brent root finder", 200, "bracket did not shrink");

        let display = format!("{}", error);
        assert!(display.contains("Brent"));
        assert!(display.contains("200"));
        assert!(error.is_convergence());
        assert!(!error.is_numerical());
    }
}
