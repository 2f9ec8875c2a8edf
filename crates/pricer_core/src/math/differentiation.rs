//! Derivative providers for scalar functions.
//!
//! Solvers ask for a value and, depending on the algorithm, the first or
//! second derivative at a point. How those derivatives are produced is a
//! separate concern, captured by [`DerivativeProvider`]:
//!
//! - [`AutoDiff`]: forward-mode dual numbers from num-dual (exact)
//! - [`FiniteDifference`]: central differences (approximate)
//!
//! Functions are expressed once through [`ScalarFunction`], generic over the
//! scalar type, so the same body evaluates on `f64`, [`DualNumber`] and
//! [`HyperDualNumber`].
//!
//! ```
//! use pricer_core::math::differentiation::{
//!     AutoDiff, DerivativeOrder, DerivativeProvider, ScalarFunction,
//! };
//! use pricer_core::types::Scalar;
//!
//! struct Cube;
//!
//! impl ScalarFunction for Cube {
//!     fn call<D: Scalar>(&self, x: D) -> D {
//!         x.powi(3)
//!     }
//! }
//!
//! let value = AutoDiff.evaluate(&Cube, 2.0, DerivativeOrder::Second);
//! assert_eq!(value.value, 8.0);
//! assert_eq!(value.grad, Some(12.0));
//! assert_eq!(value.hessian, Some(12.0));
//! ```

use crate::types::{DualNumber, HyperDualNumber, Scalar, SolverError};

/// A scalar function of one variable, generic over the scalar type.
pub trait ScalarFunction {
    /// Evaluate the function at `x`.
    fn call<D: Scalar>(&self, x: D) -> D;
}

impl<F: ScalarFunction> ScalarFunction for &F {
    fn call<D: Scalar>(&self, x: D) -> D {
        (**self).call(x)
    }
}

/// Highest derivative order requested from an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DerivativeOrder {
    /// Function value only
    Value,
    /// Value and first derivative
    First,
    /// Value, first and second derivative
    Second,
}

impl DerivativeOrder {
    /// Numeric order (0, 1 or 2).
    #[inline]
    pub fn as_u8(self) -> u8 {
        match self {
            DerivativeOrder::Value => 0,
            DerivativeOrder::First => 1,
            DerivativeOrder::Second => 2,
        }
    }
}

/// Function value with the derivatives that were requested.
///
/// Produced per evaluation and consumed immediately by the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentiableValue {
    /// f(x)
    pub value: f64,
    /// f'(x), when requested
    pub grad: Option<f64>,
    /// f''(x), when requested
    pub hessian: Option<f64>,
}

impl DifferentiableValue {
    /// Value without derivatives.
    pub fn value_only(value: f64) -> Self {
        Self {
            value,
            grad: None,
            hessian: None,
        }
    }

    /// Value with first derivative.
    pub fn with_grad(value: f64, grad: f64) -> Self {
        Self {
            value,
            grad: Some(grad),
            hessian: None,
        }
    }

    /// Value with first and second derivative.
    pub fn with_hessian(value: f64, grad: f64, hessian: f64) -> Self {
        Self {
            value,
            grad: Some(grad),
            hessian: Some(hessian),
        }
    }

    /// First derivative, or [`SolverError::MissingDerivative`].
    pub fn require_grad(&self) -> Result<f64, SolverError> {
        self.grad.ok_or(SolverError::MissingDerivative { order: 1 })
    }

    /// Second derivative, or [`SolverError::MissingDerivative`].
    pub fn require_hessian(&self) -> Result<f64, SolverError> {
        self.hessian.ok_or(SolverError::MissingDerivative { order: 2 })
    }
}

/// Strategy supplying derivatives of `F` at a point.
///
/// Implementations must be deterministic and free of side effects.
pub trait DerivativeProvider<F: ?Sized> {
    /// Evaluate `f` at `x`, with derivatives up to `order`.
    fn evaluate(&self, f: &F, x: f64, order: DerivativeOrder) -> DifferentiableValue;
}

/// Forward-mode automatic differentiation with dual numbers.
///
/// `First` seeds a [`DualNumber`] with `eps = 1`, `Second` seeds a
/// [`HyperDualNumber`] with `v1 = 1`. Derivatives are exact up to
/// floating-point rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutoDiff;

impl<F: ScalarFunction> DerivativeProvider<F> for AutoDiff {
    fn evaluate(&self, f: &F, x: f64, order: DerivativeOrder) -> DifferentiableValue {
        match order {
            DerivativeOrder::Value => DifferentiableValue::value_only(f.call(x)),
            DerivativeOrder::First => {
                let y = f.call(DualNumber::new(x, 1.0));
                DifferentiableValue::with_grad(y.re, y.eps)
            }
            DerivativeOrder::Second => {
                let y = f.call(HyperDualNumber::new(x, 1.0, 0.0));
                DifferentiableValue::with_hessian(y.re, y.v1, y.v2)
            }
        }
    }
}

/// Central finite differences.
///
/// The first derivative uses `h = √ε · max(1, |x|)`; the second derivative
/// uses the larger `h = ε^(1/4) · max(1, |x|)` since a second difference
/// loses twice as many digits to cancellation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FiniteDifference;

impl FiniteDifference {
    /// Step used for the first derivative at `x`.
    #[inline]
    pub fn first_order_step(x: f64) -> f64 {
        f64::EPSILON.sqrt() * x.abs().max(1.0)
    }

    /// Step used for the second derivative at `x`.
    #[inline]
    pub fn second_order_step(x: f64) -> f64 {
        f64::EPSILON.powf(0.25) * x.abs().max(1.0)
    }
}

impl<F: ScalarFunction> DerivativeProvider<F> for FiniteDifference {
    fn evaluate(&self, f: &F, x: f64, order: DerivativeOrder) -> DifferentiableValue {
        let value: f64 = f.call(x);
        if order == DerivativeOrder::Value {
            return DifferentiableValue::value_only(value);
        }

        let h = Self::first_order_step(x);
        let grad = (f.call(x + h) - f.call(x - h)) / (2.0 * h);
        if order == DerivativeOrder::First {
            return DifferentiableValue::with_grad(value, grad);
        }

        let h2 = Self::second_order_step(x);
        let hessian = (f.call(x + h2) - 2.0 * value + f.call(x - h2)) / (h2 * h2);
        DifferentiableValue::with_hessian(value, grad, hessian)
    }
}
