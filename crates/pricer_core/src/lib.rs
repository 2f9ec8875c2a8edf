//! # pricer_core: Numerical Foundation for Implied Volatility
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Dual number aliases and the [`Scalar`](types::Scalar) bound (`types::dual`)
//! - Derivative providers: automatic and finite differences (`math::differentiation`)
//! - Root-finding solvers behind one contract (`math::solvers`)
//! - Error types: `SolverError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-dual: Dual number types and automatic differentiation
//! - thiserror: Error derivation
//! - tracing: Structured solver diagnostics
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::math::differentiation::ScalarFunction;
//! use pricer_core::math::solvers::{DifferentiatedFunction, RootSolver, SolverConfig, SolverKind};
//! use pricer_core::types::Scalar;
//!
//! struct Cosine;
//!
//! impl ScalarFunction for Cosine {
//!     fn call<D: Scalar>(&self, x: D) -> D {
//!         x.cos() - x
//!     }
//! }
//!
//! let objective = DifferentiatedFunction::auto(Cosine);
//! let result = SolverKind::Halley
//!     .solver()
//!     .solve(&objective, 1.0, &SolverConfig::default())
//!     .unwrap();
//! assert!(result.converged);
//! # assert!((result.root - 0.739_085_133).abs() < 1e-6);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for solver configuration and results

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
