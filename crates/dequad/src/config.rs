//! Integrator configuration.

use serde::{Deserialize, Serialize};

use crate::error::{QuadratureError, QuadratureResult};
use crate::sampler::LevelSampler;

/// Default step size of the coarsest level.
pub const DEFAULT_INITIAL_STEP: f64 = 0.5;

/// Default extent of transform-domain sampling.
pub const DEFAULT_RANGE_PARAMETER: f64 = 10.0;

/// Default refinement ceiling.
pub const DEFAULT_MAX_LEVEL: u32 = 10;

/// Default convergence threshold.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Configuration for the tanh-sinh integrator.
///
/// # Example
///
/// ```rust
/// use dequad::TanhSinhConfig;
///
/// let config = TanhSinhConfig::default()
///     .with_tolerance(1e-12)
///     .with_max_level(12);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.initial_step, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TanhSinhConfig {
    /// Step size `h` of level 0 in the transform coordinate.
    #[serde(default = "default_initial_step")]
    pub initial_step: f64,
    /// Upper end of the sampled transform coordinate range.
    #[serde(default = "default_range_parameter")]
    pub range_parameter: f64,
    /// Highest refinement level evaluated (levels `0..=max_level`).
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    /// Absolute convergence threshold.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_initial_step() -> f64 {
    DEFAULT_INITIAL_STEP
}

fn default_range_parameter() -> f64 {
    DEFAULT_RANGE_PARAMETER
}

fn default_max_level() -> u32 {
    DEFAULT_MAX_LEVEL
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl Default for TanhSinhConfig {
    fn default() -> Self {
        Self {
            initial_step: DEFAULT_INITIAL_STEP,
            range_parameter: DEFAULT_RANGE_PARAMETER,
            max_level: DEFAULT_MAX_LEVEL,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl TanhSinhConfig {
    /// Creates a configuration with the given tolerance and default sampling.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    /// Sets the initial step size.
    #[must_use]
    pub fn with_initial_step(mut self, initial_step: f64) -> Self {
        self.initial_step = initial_step;
        self
    }

    /// Sets the range parameter.
    #[must_use]
    pub fn with_range_parameter(mut self, range_parameter: f64) -> Self {
        self.range_parameter = range_parameter;
        self
    }

    /// Sets the maximum refinement level.
    #[must_use]
    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level;
        self
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Checks every parameter, failing on the first one out of range.
    ///
    /// Besides each value being positive and finite, the coarsest and the
    /// deepest level must each sample at most
    /// [`MAX_POINTS_PER_LEVEL`](crate::sampler::MAX_POINTS_PER_LEVEL)
    /// coordinates.
    pub fn validate(&self) -> QuadratureResult<()> {
        require_positive("tolerance", self.tolerance)?;
        require_positive("initial_step", self.initial_step)?;
        require_positive("range_parameter", self.range_parameter)?;

        let sampler = LevelSampler::new(self.range_parameter);
        if sampler.points_at(0, self.initial_step).is_none() {
            return Err(QuadratureError::invalid_config(
                "initial_step",
                self.initial_step,
                "too many points per level for range_parameter",
            ));
        }
        let deepest_step = self.initial_step * 0.5_f64.powf(f64::from(self.max_level));
        if sampler.points_at(self.max_level, deepest_step).is_none() {
            return Err(QuadratureError::invalid_config(
                "max_level",
                f64::from(self.max_level),
                "too many points at the deepest level",
            ));
        }
        Ok(())
    }
}

// NaN fails the comparison, so it is rejected along with zero and negatives.
fn require_positive(parameter: &'static str, value: f64) -> QuadratureResult<()> {
    if !(value > 0.0) {
        return Err(QuadratureError::invalid_config(
            parameter,
            value,
            "must be positive",
        ));
    }
    if !value.is_finite() {
        return Err(QuadratureError::invalid_config(
            parameter,
            value,
            "must be finite",
        ));
    }
    Ok(())
}
