//! # dequad
//!
//! Double-exponential (tanh-sinh) adaptive quadrature of real functions over
//! finite intervals.
//!
//! This crate provides:
//!
//! - **Transform**: The tanh-sinh map of `[a, b]` onto the real line, with
//!   weights formed from `sech² = 1 − tanh²` so they never overflow
//! - **Level Sampler**: The transform coordinates new to each refinement level
//! - **Evaluator**: Scalar and vectorized integrands, with non-finite samples
//!   zeroed and counted
//! - **Integrator**: The level-refinement loop with its two stopping rules
//!
//! ## Example
//!
//! ```rust
//! use dequad::prelude::*;
//!
//! // ∫₀^π sin(x) dx = 2
//! let value = integrate(|x: f64| x.sin(), 0.0, std::f64::consts::PI, 1e-10).unwrap();
//! assert!((value - 2.0).abs() < 1e-9);
//!
//! // Reversed bounds flip the sign.
//! let value = integrate(|x: f64| x, 1.0, 0.0, 1e-10).unwrap();
//! assert!((value + 0.5).abs() < 1e-9);
//! ```
//!
//! ## Failure Policy
//!
//! Only an invalid configuration or a non-finite bound is an error. An
//! integrand sample that comes out NaN or infinite contributes zero, and
//! running out of levels returns the latest estimate. Both are reported on
//! [`Estimate`] for callers that want to audit a result.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::float_cmp)]

pub mod config;
pub mod error;
pub mod evaluator;
pub mod integrator;
pub mod sampler;
pub mod transform;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::TanhSinhConfig;
    pub use crate::error::{QuadratureError, QuadratureResult};
    pub use crate::evaluator::{Integrand, Vectorized};
    pub use crate::integrator::{
        integrate, tanh_sinh, Estimate, Quadrature, TanhSinh, Termination,
    };
}

pub use config::TanhSinhConfig;
pub use error::{QuadratureError, QuadratureResult};
pub use evaluator::{Integrand, Vectorized};
pub use integrator::{integrate, tanh_sinh, Estimate, Quadrature, TanhSinh, Termination};
