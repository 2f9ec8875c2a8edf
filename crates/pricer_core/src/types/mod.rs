//! Core numeric and error types.
//!
//! This module provides:
//! - `dual`: Dual number aliases from num-dual and the [`Scalar`] bound used by differentiable code
//! - `error`: Structured error type for solver operations
//!
//! # Re-exports
//!
//! - [`DualNumber`], [`HyperDualNumber`], [`Scalar`] from `dual`
//! - [`SolverError`] from `error`

pub mod dual;
pub mod error;

pub use dual::{DualNumber, HyperDualNumber, Scalar};
pub use error::SolverError;
