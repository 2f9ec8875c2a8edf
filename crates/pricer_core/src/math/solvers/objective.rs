//! Objective contract consumed by the solvers.

use crate::math::differentiation::{
    AutoDiff, DerivativeOrder, DerivativeProvider, DifferentiableValue, ScalarFunction,
};

/// A scalar equation `f(x) = 0` as seen by a solver.
///
/// Implementations return at least the derivatives up to the requested
/// order; returning more is allowed.
pub trait Objective {
    /// Evaluate at `x` with derivatives up to `order`.
    fn evaluate(&self, x: f64, order: DerivativeOrder) -> DifferentiableValue;

    /// Function value only.
    fn value(&self, x: f64) -> f64 {
        self.evaluate(x, DerivativeOrder::Value).value
    }
}

impl<O: Objective + ?Sized> Objective for &O {
    fn evaluate(&self, x: f64, order: DerivativeOrder) -> DifferentiableValue {
        (**self).evaluate(x, order)
    }
}

/// A [`ScalarFunction`] paired with the provider that differentiates it.
///
/// # Example
///
/// ```
/// use pricer_core::math::differentiation::ScalarFunction;
/// use pricer_core::math::solvers::{
///     DifferentiatedFunction, NewtonRaphson, RootSolver, SolverConfig,
/// };
/// use pricer_core::types::Scalar;
///
/// struct SquareMinusTwo;
///
/// impl ScalarFunction for SquareMinusTwo {
///     fn call<D: Scalar>(&self, x: D) -> D {
///         x * x - 2.0
///     }
/// }
///
/// let objective = DifferentiatedFunction::auto(SquareMinusTwo);
/// let result = NewtonRaphson
///     .solve(&objective, 1.0, &SolverConfig::high_precision())
///     .unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DifferentiatedFunction<F, P> {
    function: F,
    provider: P,
}

impl<F, P> DifferentiatedFunction<F, P> {
    /// Pair `function` with `provider`.
    pub fn new(function: F, provider: P) -> Self {
        Self { function, provider }
    }
}

impl<F: ScalarFunction> DifferentiatedFunction<F, AutoDiff> {
    /// Differentiate `function` with forward-mode AD.
    pub fn auto(function: F) -> Self {
        Self::new(function, AutoDiff)
    }
}

impl<F, P> Objective for DifferentiatedFunction<F, P>
where
    P: DerivativeProvider<F>,
{
    fn evaluate(&self, x: f64, order: DerivativeOrder) -> DifferentiableValue {
        self.provider.evaluate(&self.function, x, order)
    }
}
