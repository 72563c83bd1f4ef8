//! Integrand evaluation for one refinement level.
//!
//! Integrands implement [`Integrand`]. Any `Fn(f64) -> f64` already does, with
//! batches evaluated element by element; array-capable integrands are wrapped
//! in [`Vectorized`] so a whole level is handed over in one call per side.
//!
//! Integrands must be pure. The same abscissa may be requested more than once
//! across calls and nothing is cached, so a stateful integrand gives
//! unspecified results.

use ndarray::{Array1, ArrayView1, Zip};

use crate::transform::Transform;

/// A real function of one real variable.
pub trait Integrand {
    /// Evaluates the integrand at `x`.
    fn eval(&self, x: f64) -> f64;

    /// Evaluates the integrand at every abscissa in `xs`.
    ///
    /// The returned array must have the same length as `xs`.
    fn eval_batch(&self, xs: ArrayView1<'_, f64>) -> Array1<f64> {
        xs.mapv(|x| self.eval(x))
    }
}

impl<F> Integrand for F
where
    F: Fn(f64) -> f64,
{
    fn eval(&self, x: f64) -> f64 {
        self(x)
    }
}

/// Adapter for integrands that map an array of abscissas to an array of
/// values.
///
/// If the wrapped function returns an array of the wrong length, the batch
/// is re-evaluated one abscissa at a time.
///
/// # Example
///
/// ```rust
/// use dequad::{integrate, Vectorized};
/// use ndarray::{Array1, ArrayView1};
///
/// let f = Vectorized::new(|x: ArrayView1<'_, f64>| -> Array1<f64> { x.mapv(f64::exp) });
/// let value = integrate(f, 0.0, 1.0, 1e-10).unwrap();
/// assert!((value - (std::f64::consts::E - 1.0)).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Vectorized<F> {
    f: F,
}

impl<F> Vectorized<F>
where
    F: Fn(ArrayView1<'_, f64>) -> Array1<f64>,
{
    /// Wraps an array-in/array-out function.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Integrand for Vectorized<F>
where
    F: Fn(ArrayView1<'_, f64>) -> Array1<f64>,
{
    fn eval(&self, x: f64) -> f64 {
        let xs = [x];
        let values = (self.f)(ArrayView1::from(&xs[..]));
        if values.len() == 1 {
            return values[0];
        }

        log::warn!(
            "vectorized integrand returned {} values for the single abscissa {}, treating it as NaN",
            values.len(),
            x
        );
        f64::NAN
    }

    fn eval_batch(&self, xs: ArrayView1<'_, f64>) -> Array1<f64> {
        let values = (self.f)(xs);
        if values.len() == xs.len() {
            return values;
        }

        log::warn!(
            "vectorized integrand returned {} values for {} abscissas, evaluating pointwise",
            values.len(),
            xs.len()
        );
        xs.mapv(|x| self.eval(x))
    }
}

/// Evaluates an integrand at a single point, replacing a non-finite product
/// with the weight by zero.
///
/// Returns the weighted value and whether it had to be zeroed.
pub fn sanitized_sample<I>(integrand: &I, x: f64, weight: f64) -> (f64, bool)
where
    I: Integrand + ?Sized,
{
    sanitize(integrand.eval(x) * weight)
}

fn sanitize(value: f64) -> (f64, bool) {
    if value.is_finite() {
        (value, false)
    } else {
        (0.0, true)
    }
}

/// Weighted sum over one level's new sample points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSum {
    /// `Σ (f(x₊) + f(x₋))·w` over the level.
    pub sum: f64,
    /// Integrand evaluations performed.
    pub evaluations: usize,
    /// Samples whose weighted value was NaN or infinite and was zeroed.
    pub sanitized: usize,
}

impl LevelSum {
    /// Evaluates `integrand` on both mirror abscissas of every coordinate
    /// in `t` and accumulates the weighted values in coordinate order.
    pub fn evaluate<I>(integrand: &I, transform: &Transform, t: ArrayView1<'_, f64>) -> Self
    where
        I: Integrand + ?Sized,
    {
        let n = t.len();
        let mut positive = Array1::<f64>::zeros(n);
        let mut negative = Array1::<f64>::zeros(n);
        let mut weights = Array1::<f64>::zeros(n);

        Zip::from(&mut positive)
            .and(&mut negative)
            .and(&mut weights)
            .and(&t)
            .for_each(|xp, xn, w, &t| {
                let point = transform.sample(t);
                *xp = point.positive;
                *xn = point.negative;
                *w = point.weight;
            });

        let f_pos = integrand.eval_batch(positive.view());
        let f_neg = integrand.eval_batch(negative.view());

        let mut sum = 0.0;
        let mut sanitized = 0;
        for ((fp, fm), w) in f_pos.iter().zip(f_neg.iter()).zip(weights.iter()) {
            let (value, zeroed) = sanitize((fp + fm) * w);
            sum += value;
            sanitized += usize::from(zeroed);
        }

        Self {
            sum,
            evaluations: 2 * n,
            sanitized,
        }
    }
}
