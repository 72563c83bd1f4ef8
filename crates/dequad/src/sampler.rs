//! Transform coordinates sampled at each refinement level.

use ndarray::Array1;

/// Largest number of coordinates a single level may sample.
///
/// Each coordinate costs two integrand evaluations, and the level count
/// doubles with every refinement, so this bounds both work and allocation.
pub const MAX_POINTS_PER_LEVEL: usize = 1 << 24;

/// Generates the transform coordinates new to each refinement level.
///
/// Level 0 samples `h, 2h, 3h, …` with the initial step. Every later level
/// runs with the halved step `h_ℓ` but strides by `2h_ℓ` starting at `h_ℓ`,
/// which visits exactly the odd multiples of `h_ℓ`: the points that halving
/// introduced. No coordinate is ever produced twice across a run.
///
/// Each sequence is half-open, ending before `range_parameter + h_ℓ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSampler {
    range_parameter: f64,
}

impl LevelSampler {
    /// Creates a sampler covering `t ∈ (0, range_parameter]`.
    #[must_use]
    pub fn new(range_parameter: f64) -> Self {
        Self { range_parameter }
    }

    /// Spacing between consecutive coordinates at `level` for step `step`.
    #[must_use]
    pub fn stride(level: u32, step: f64) -> f64 {
        if level == 0 {
            step
        } else {
            2.0 * step
        }
    }

    /// Transform coordinates to evaluate at `level`, where `step` is that
    /// level's (already halved) step size.
    #[must_use]
    pub fn coordinates(&self, level: u32, step: f64) -> Array1<f64> {
        Array1::range(step, self.range_parameter + step, Self::stride(level, step))
    }

    /// Number of coordinates [`coordinates`](Self::coordinates) yields, or
    /// `None` when it is not finite or exceeds [`MAX_POINTS_PER_LEVEL`].
    #[must_use]
    pub fn points_at(&self, level: u32, step: f64) -> Option<usize> {
        let span = (self.range_parameter + step) - step;
        let count = (span / Self::stride(level, step)).ceil();
        if count.is_finite() && count <= MAX_POINTS_PER_LEVEL as f64 {
            Some(count.max(0.0) as usize)
        } else {
            None
        }
    }
}
