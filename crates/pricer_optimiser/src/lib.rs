//! # pricer_optimiser
//!
//! Implied-volatility inversion of Black-Scholes prices.
//!
//! This crate sits on top of Models (L2), solving the inverse problem
//! "which σ reproduces this observed price".
//!
//! ## Architecture Position
//!
//! Layer 2.5 in the pricer stack.
//! Depends on `pricer_core` (L1) for solvers and differentiation, and on
//! `pricer_models` (L2) for the pricing model and quotes.
//!
//! ## Modules
//!
//! - `implied_vol`: objective adapter, entry points, configuration and chain solving
//!
//! ## Example
//!
//! ```
//! use pricer_optimiser::prelude::*;
//!
//! let result = put_implied_volatility(
//!     100.0, 110.0, 0.05, 1.0, 10.675_324_824_803,
//!     0.5, SolverKind::GradientDescent, 1e-6, 1000,
//! )?;
//! assert!(result.converged());
//! assert!((result.volatility - 0.2).abs() < 1e-6);
//! # Ok::<(), OptimiserError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod implied_vol;

mod error;

pub use error::OptimiserError;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::implied_vol::*;
    pub use crate::OptimiserError;
    pub use pricer_core::math::solvers::{RootSolver, Solver, SolverConfig, SolverKind};
    pub use pricer_models::instruments::{OptionSide, Quote};
}
