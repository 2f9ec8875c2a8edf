//! Newton-Raphson root-finding solver.

use tracing::trace;

use super::{
    diverged, exhausted, residual_met, step_met, Objective, RootSolver, SolverConfig, SolverResult,
};
use crate::math::differentiation::DerivativeOrder;
use crate::types::SolverError;

/// Newton-Raphson root finder.
///
/// Uses Newton's method: `x_{n+1} = x_n - f(x_n) / f'(x_n)` for quadratic
/// convergence on smooth functions.
///
/// # Convergence
///
/// The number of correct digits roughly doubles each iteration near a simple
/// root. A vanishing derivative makes the update non-finite, which is
/// reported as [`Termination::Diverged`](super::Termination::Diverged) with
/// the last finite iterate.
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
/// struct ExpMinusTwo;
///
/// impl ScalarFunction for ExpMinusTwo {
///     fn call<D: Scalar>(&self, x: D) -> D {
///         x.exp() - 2.0
///     }
/// }
///
/// let objective = DifferentiatedFunction::auto(ExpMinusTwo);
/// let result = NewtonRaphson
///     .solve(&objective, 0.0, &SolverConfig::high_precision())
///     .unwrap();
/// assert!((result.root - 2.0_f64.ln()).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewtonRaphson;

impl RootSolver for NewtonRaphson {
    fn name(&self) -> &'static str {
        "newton_raphson"
    }

    fn required_order(&self) -> DerivativeOrder {
        DerivativeOrder::First
    }

    fn solve<O: Objective + ?Sized>(
        &self,
        objective: &O,
        x0: f64,
        config: &SolverConfig,
    ) -> Result<SolverResult, SolverError> {
        config.validate()?;
        let name = self.name();
        let atol = config.tolerance;
        let mut x = x0;

        for iteration in 0..config.max_iterations {
            let eval = objective.evaluate(x, DerivativeOrder::First);
            trace!(solver = name, iteration, x, residual = eval.value);

            if eval.value.abs() < atol {
                return Ok(residual_met(name, x, iteration, eval.value));
            }

            let step = eval.value / eval.require_grad()?;
            let next = x - step;
            if !next.is_finite() {
                return Ok(diverged(name, x, iteration, eval.value));
            }
            if step.abs() < atol {
                return Ok(step_met(name, objective, next, iteration + 1, atol));
            }
            x = next;
        }

        Ok(exhausted(name, objective, x, config.max_iterations))
    }
}
