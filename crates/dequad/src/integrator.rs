//! Level-refinement driver and public entry points.
//!
//! Each level halves the transform step and evaluates only the newly
//! introduced coordinates. The running estimate is combined with the
//! doubling rule
//!
//! ```text
//! I_ℓ = I_{ℓ−1} / 2 + h_ℓ · Σ_new (f(x₊) + f(x₋))·w
//! ```
//!
//! Refinement stops when `|I_ℓ − I_{ℓ−1}| < tol`, or, past level 5, when the
//! newest level's contribution is below `tol·|I_ℓ|`. Otherwise the estimate
//! after `max_level` is returned as is.

use crate::config::TanhSinhConfig;
use crate::error::{QuadratureError, QuadratureResult};
use crate::evaluator::{sanitized_sample, Integrand, LevelSum};
use crate::sampler::LevelSampler;
use crate::transform::Transform;

/// Level past which the marginal-contribution rule may stop refinement.
const NEGLIGIBLE_RULE_MIN_LEVEL: u32 = 5;

/// How a refinement run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Successive estimates differed by less than the tolerance.
    Converged,
    /// The newest level contributed less than `tolerance·|estimate|`.
    Negligible,
    /// `max_level` was reached without either rule firing.
    Exhausted,
}

/// An integral estimate together with the diagnostics of the run that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// The integral approximation.
    pub value: f64,
    /// Number of levels evaluated.
    pub levels: u32,
    /// Total integrand evaluations, including the centre sample.
    pub evaluations: usize,
    /// Samples zeroed because their weighted value was not finite.
    pub sanitized: usize,
    /// `|I_ℓ − I_{ℓ−1}|` at the last level evaluated.
    pub difference: f64,
    /// Which rule ended refinement.
    pub termination: Termination,
}

impl Estimate {
    /// Returns `true` unless refinement ran out of levels.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.termination != Termination::Exhausted
    }

    /// Returns the value, or [`QuadratureError::NotConverged`] if refinement
    /// ran out of levels.
    pub fn into_converged(self) -> QuadratureResult<f64> {
        if self.is_converged() {
            Ok(self.value)
        } else {
            Err(QuadratureError::not_converged(self.levels, self.difference))
        }
    }
}

/// Mutable state of the refinement loop.
#[derive(Debug, Clone, Copy)]
struct LevelState {
    level: u32,
    step: f64,
    integral: f64,
    previous: f64,
}

impl LevelState {
    fn new(step: f64, seed: f64) -> Self {
        Self {
            level: 0,
            step,
            integral: seed,
            previous: seed,
        }
    }

    /// Folds a level sum into the estimate and returns the change.
    fn combine(&mut self, level_sum: f64) -> f64 {
        self.integral = self.previous / 2.0 + level_sum * self.step;
        (self.integral - self.previous).abs()
    }

    fn advance(&mut self) {
        self.previous = self.integral;
        self.step /= 2.0;
        self.level += 1;
    }
}

/// Trait for one-dimensional quadrature rules over finite intervals.
pub trait Quadrature {
    /// Approximates `∫_a^b f(x) dx`.
    fn integrate<F>(&self, f: F, a: f64, b: f64) -> QuadratureResult<f64>
    where
        F: Integrand;

    /// Returns the name of the rule.
    fn name(&self) -> &'static str;
}

/// Tanh-sinh (double-exponential) adaptive integrator.
///
/// # Example
///
/// ```rust
/// use dequad::{TanhSinh, TanhSinhConfig, Termination};
///
/// let integrator = TanhSinh::new(TanhSinhConfig::new(1e-12));
/// let estimate = integrator
///     .integrate_detailed(|x: f64| x.sin(), 0.0, std::f64::consts::PI)
///     .unwrap();
///
/// assert!((estimate.value - 2.0).abs() < 1e-10);
/// assert!(estimate.is_converged());
/// assert_eq!(estimate.sanitized, 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TanhSinh {
    config: TanhSinhConfig,
}

impl TanhSinh {
    /// Creates an integrator with the given configuration.
    #[must_use]
    pub fn new(config: TanhSinhConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TanhSinhConfig {
        &self.config
    }

    /// Approximates `∫_a^b f(x) dx` and reports how refinement went.
    ///
    /// `a` may exceed `b`; the result then changes sign. Running out of
    /// levels is not an error here: the last estimate comes back with
    /// [`Termination::Exhausted`].
    pub fn integrate_detailed<F>(&self, f: F, a: f64, b: f64) -> QuadratureResult<Estimate>
    where
        F: Integrand,
    {
        self.config.validate()?;
        if !a.is_finite() || !b.is_finite() {
            return Err(QuadratureError::InvalidInterval { a, b });
        }

        let tolerance = self.config.tolerance;
        let transform = Transform::new(a, b);
        let sampler = LevelSampler::new(self.config.range_parameter);

        let (seed, seed_zeroed) =
            sanitized_sample(&f, transform.center(), transform.center_weight());
        let initial_step = self.config.initial_step;
        let mut state = LevelState::new(initial_step, 2.0 * initial_step * seed);
        let mut evaluations = 1;
        let mut sanitized = usize::from(seed_zeroed);
        let mut difference = f64::INFINITY;
        let mut termination = Termination::Exhausted;

        while state.level <= self.config.max_level {
            let t = sampler.coordinates(state.level, state.step);
            let level = LevelSum::evaluate(&f, &transform, t.view());
            evaluations += level.evaluations;
            sanitized += level.sanitized;

            difference = state.combine(level.sum);
            let contribution = (level.sum * state.step).abs();

            log::trace!(
                "level {}: h = {:e}, points = {}, sum = {:e}, estimate = {:e}, difference = {:e}",
                state.level,
                state.step,
                t.len(),
                level.sum,
                state.integral,
                difference
            );

            if difference < tolerance {
                termination = Termination::Converged;
                break;
            }
            if state.level > NEGLIGIBLE_RULE_MIN_LEVEL
                && contribution < tolerance * state.integral.abs()
            {
                termination = Termination::Negligible;
                break;
            }
            if state.level == self.config.max_level {
                break;
            }
            state.advance();
        }

        let levels = state.level + 1;
        log::debug!(
            "tanh-sinh over [{}, {}]: {:?} after {} levels, {} evaluations, {} sanitized",
            a,
            b,
            termination,
            levels,
            evaluations,
            sanitized
        );

        Ok(Estimate {
            value: state.integral,
            levels,
            evaluations,
            sanitized,
            difference,
            termination,
        })
    }
}

impl Quadrature for TanhSinh {
    fn integrate<F>(&self, f: F, a: f64, b: f64) -> QuadratureResult<f64>
    where
        F: Integrand,
    {
        self.integrate_detailed(f, a, b).map(|estimate| estimate.value)
    }

    fn name(&self) -> &'static str {
        "Tanh-Sinh"
    }
}

/// Tanh-sinh quadrature of `f` over `[a, b]` with an explicit configuration.
///
/// # Example
///
/// ```rust
/// use dequad::{tanh_sinh, TanhSinhConfig};
///
/// let config = TanhSinhConfig::default().with_max_level(12);
/// let estimate = tanh_sinh(|x: f64| 1.0 / x, 1.0, std::f64::consts::E, &config).unwrap();
/// assert!((estimate.value - 1.0).abs() < 1e-9);
/// ```
pub fn tanh_sinh<F>(f: F, a: f64, b: f64, config: &TanhSinhConfig) -> QuadratureResult<Estimate>
where
    F: Integrand,
{
    TanhSinh::new(*config).integrate_detailed(f, a, b)
}

/// Approximates `∫_a^b f(x) dx` to the given tolerance, using default
/// sampling parameters.
///
/// # Example
///
/// ```rust
/// use dequad::integrate;
///
/// let value = integrate(|x: f64| x * x, 0.0, 1.0, 1e-10).unwrap();
/// assert!((value - 1.0 / 3.0).abs() < 1e-9);
/// ```
pub fn integrate<F>(f: F, a: f64, b: f64, tolerance: f64) -> QuadratureResult<f64>
where
    F: Integrand,
{
    TanhSinh::new(TanhSinhConfig::new(tolerance)).integrate(f, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::cell::Cell;
    use std::f64::consts::{E, PI};

    #[test]
    fn test_polynomial() {
        let value = integrate(|x: f64| x * x, 0.0, 1.0, 1e-10).unwrap();
        assert_relative_eq!(value, 1.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reversed_interval() {
        let value = integrate(|x: f64| x, 1.0, 0.0, 1e-10).unwrap();
        assert_relative_eq!(value, -0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_negligible_contribution_stops_refinement() {
        // Only the centre sample is nonzero, so the estimate halves each level
        // and no level adds anything: the difference never drops below the
        // tolerance, but past level 5 the zero contribution ends the run.
        let f = |x: f64| if x == 0.5 { 1.0 } else { 0.0 };
        let estimate = tanh_sinh(f, 0.0, 1.0, &TanhSinhConfig::default()).unwrap();

        assert_eq!(estimate.termination, Termination::Negligible);
        assert_eq!(estimate.levels, 7);
        assert!(estimate.is_converged());
        assert_relative_eq!(estimate.value, PI / 512.0, epsilon = 1e-15);
    }

    #[test]
    fn test_oversized_config_fails_before_evaluation() {
        let calls = Cell::new(0_usize);
        let f = |x: f64| {
            calls.set(calls.get() + 1);
            x
        };

        let config = TanhSinhConfig::default().with_initial_step(1e-300);
        let result = tanh_sinh(f, 0.0, 1.0, &config);
        assert!(matches!(
            result,
            Err(QuadratureError::InvalidConfig {
                parameter: "initial_step",
                ..
            })
        ));

        let config = TanhSinhConfig::default().with_max_level(64);
        let result = tanh_sinh(f, 0.0, 1.0, &config);
        assert!(matches!(
            result,
            Err(QuadratureError::InvalidConfig {
                parameter: "max_level",
                ..
            })
        ));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_degenerate_interval() {
        let estimate = tanh_sinh(|x: f64| x.exp(), 2.0, 2.0, &TanhSinhConfig::default()).unwrap();
        assert_eq!(estimate.value, 0.0);
        assert_eq!(estimate.levels, 1);
        assert_eq!(estimate.termination, Termination::Converged);
    }

    #[test]
    fn test_invalid_config_fails_before_evaluation() {
        let calls = Cell::new(0_usize);
        let f = |x: f64| {
            calls.set(calls.get() + 1);
            x
        };

        let result = tanh_sinh(f, 0.0, 1.0, &TanhSinhConfig::new(-1e-10));
        assert!(matches!(
            result,
            Err(QuadratureError::InvalidConfig {
                parameter: "tolerance",
                ..
            })
        ));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_infinite_bound_rejected() {
        let result = integrate(|x: f64| (-x).exp(), 0.0, f64::INFINITY, 1e-10);
        assert!(matches!(result, Err(QuadratureError::InvalidInterval { .. })));
    }

    #[test]
    fn test_evaluation_count() {
        // Levels 0 and 1 each add 20 coordinates, so 2·20 evaluations apiece.
        let config = TanhSinhConfig::default()
            .with_max_level(1)
            .with_tolerance(1e-300);
        let calls = Cell::new(0_usize);
        let f = |x: f64| {
            calls.set(calls.get() + 1);
            x.sin()
        };

        let estimate = tanh_sinh(f, 0.0, 1.0, &config).unwrap();
        assert_eq!(estimate.levels, 2);
        assert_eq!(estimate.evaluations, 1 + 40 + 40);
        assert_eq!(calls.get(), estimate.evaluations);
        assert_eq!(estimate.termination, Termination::Exhausted);
    }

    #[test]
    fn test_exhausted_returns_best_effort() {
        let config = TanhSinhConfig::default().with_max_level(0);
        let estimate = tanh_sinh(|x: f64| x.sin(), 0.0, PI, &config).unwrap();

        assert_eq!(estimate.termination, Termination::Exhausted);
        assert!(!estimate.is_converged());
        // Level 0 alone is already a fair approximation.
        assert_abs_diff_eq!(estimate.value, 2.0, epsilon = 1e-2);
        assert!(matches!(
            estimate.into_converged(),
            Err(QuadratureError::NotConverged { levels: 1, .. })
        ));
    }

    #[test]
    fn test_endpoint_singularity_is_sanitized() {
        // 1/√x is integrable on [0, 1]; the saturated endpoint sample is not.
        let estimate = tanh_sinh(
            |x: f64| 1.0 / x.sqrt(),
            0.0,
            1.0,
            &TanhSinhConfig::new(1e-10),
        )
        .unwrap();

        assert!(estimate.sanitized > 0);
        assert!(estimate.value.is_finite());
        assert_abs_diff_eq!(estimate.value, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_nan_centre_is_sanitized() {
        let f = |x: f64| if x == 0.5 { f64::NAN } else { 1.0 };
        let estimate = tanh_sinh(f, 0.0, 1.0, &TanhSinhConfig::default()).unwrap();
        assert!(estimate.sanitized >= 1);
        assert!(estimate.value.is_finite());
    }

    #[test]
    fn test_quadrature_trait() {
        fn area<Q: Quadrature>(rule: &Q) -> f64 {
            rule.integrate(|x: f64| 1.0 / x, 1.0, E).unwrap()
        }

        let rule = TanhSinh::default();
        assert_relative_eq!(area(&rule), 1.0, epsilon = 1e-9);
        assert_eq!(rule.name(), "Tanh-Sinh");
    }

    #[test]
    fn test_config_accessor() {
        let config = TanhSinhConfig::new(1e-8).with_max_level(3);
        let rule = TanhSinh::new(config);
        assert_eq!(rule.config(), &config);
    }
}
