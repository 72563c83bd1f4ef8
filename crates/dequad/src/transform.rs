//! The tanh-sinh change of variable.
//!
//! A finite interval `[a, b]` is mapped onto the real line by
//!
//! ```text
//! x(t) = c + s·tanh(π/2·sinh t),    c = (a+b)/2,  s = (b−a)/2
//! ```
//!
//! with derivative `dx/dt = s·π/2·cosh(t)·sech²(π/2·sinh t)`. The squared
//! secant is evaluated as `1 − tanh²`, which stays in `[0, 1]`; forming
//! `cosh(π/2·sinh t)` directly overflows once `t` exceeds about 6.5.

use std::f64::consts::FRAC_PI_2;

/// Below this value of `sech²` a sample's weight is taken to be exactly zero.
pub const NEGLIGIBLE_SECH_SQ: f64 = 1e-50;

/// One transform coordinate together with its abscissa pair and weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Transform coordinate `t`.
    pub t: f64,
    /// Abscissa `x₊ = c + s·tanh(φ)`.
    pub positive: f64,
    /// Mirror abscissa `x₋ = 2c − x₊`.
    pub negative: f64,
    /// Weight `dx/dt`, zero once `sech²(φ)` is negligible.
    pub weight: f64,
}

/// Tanh-sinh map of a finite interval.
///
/// The interval is signed: when `a > b` the spread is negative and every
/// weight changes sign with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    center: f64,
    spread: f64,
}

impl Transform {
    /// Creates the transform for the interval from `a` to `b`.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            center: 0.5 * (a + b),
            spread: 0.5 * (b - a),
        }
    }

    /// Midpoint of the interval.
    #[must_use]
    pub fn center(&self) -> f64 {
        self.center
    }

    /// Signed half-width of the interval.
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Weight of the undivided centre sample at `t = 0`.
    #[must_use]
    pub fn center_weight(&self) -> f64 {
        self.spread * FRAC_PI_2
    }

    /// Maps a transform coordinate to its abscissa pair and weight.
    #[must_use]
    pub fn sample(&self, t: f64) -> SamplePoint {
        let phi = FRAC_PI_2 * t.sinh();
        let tanh_phi = phi.tanh();
        let positive = self.center + self.spread * tanh_phi;
        let negative = 2.0 * self.center - positive;

        let sech_sq = 1.0 - tanh_phi * tanh_phi;
        let weight = if sech_sq > NEGLIGIBLE_SECH_SQ {
            self.spread * FRAC_PI_2 * t.cosh() * sech_sq
        } else {
            0.0
        };

        SamplePoint {
            t,
            positive,
            negative,
            weight,
        }
    }
}
