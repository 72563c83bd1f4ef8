//! Error types for quadrature operations.

use thiserror::Error;

/// A specialized Result type for quadrature operations.
pub type QuadratureResult<T> = Result<T, QuadratureError>;

/// Errors that can occur during quadrature.
///
/// Only configuration problems are fatal to an integration call. Non-finite
/// integrand samples are zeroed and counted, and running out of levels
/// yields a best-effort estimate; see [`crate::Estimate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuadratureError {
    /// A configuration parameter is out of range.
    #[error("Invalid configuration: {parameter} = {value} ({reason})")]
    InvalidConfig {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// The rejected value.
        value: f64,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// An interval bound is NaN or infinite.
    #[error("Invalid interval: [{a}, {b}] must have finite bounds")]
    InvalidInterval {
        /// Lower bound.
        a: f64,
        /// Upper bound.
        b: f64,
    },

    /// Refinement stopped at the level ceiling without meeting either
    /// stopping rule.
    #[error("No convergence after {levels} levels (last difference: {difference:.2e})")]
    NotConverged {
        /// Number of levels evaluated.
        levels: u32,
        /// Difference between the last two estimates.
        difference: f64,
    },
}

impl QuadratureError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(parameter: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidConfig {
            parameter,
            value,
            reason,
        }
    }

    /// Creates a non-convergence error.
    #[must_use]
    pub fn not_converged(levels: u32, difference: f64) -> Self {
        Self::NotConverged { levels, difference }
    }
}
