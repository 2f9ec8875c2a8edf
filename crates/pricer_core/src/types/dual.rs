//! Dual number aliases for forward-mode automatic differentiation.
//!
//! ## Usage
//!
//! ```
//! use num_dual::DualNum;
//! use pricer_core::types::dual::{DualNumber, HyperDualNumber};
//!
//! // d/dx (x³) at x = 2
//! let x = DualNumber::new(2.0, 1.0);
//! let y = x.powi(3);
//! assert_eq!(y.re(), 8.0);
//! assert_eq!(y.eps, 12.0);
//!
//! // d²/dx² (x³) at x = 2
//! let x = HyperDualNumber::new(2.0, 1.0, 0.0);
//! let y = x.powi(3);
//! assert_eq!(y.v1, 12.0);
//! assert_eq!(y.v2, 12.0);
//! ```

/// First-order dual number (`f64` value plus one derivative).
///
/// - `re`: Real part (function value)
/// - `eps`: Dual part (derivative)
pub type DualNumber = num_dual::Dual64;

/// Second-order dual number carrying value, first and second derivative.
///
/// - `re`: Real part
/// - `v1`: First derivative
/// - `v2`: Second derivative
pub type HyperDualNumber = num_dual::Dual2_64;

/// Scalar bound accepted by every differentiable function in the workspace.
///
/// Implemented for `f64`, [`DualNumber`] and [`HyperDualNumber`], so a single
/// generic function body yields the value, the first derivative or the
/// second derivative depending on the type it is called with.
pub trait Scalar: num_dual::DualNum<f64> + Copy {}

impl<T: num_dual::DualNum<f64> + Copy> Scalar for T {}
