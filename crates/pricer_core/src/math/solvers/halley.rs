//! Halley root-finding solver.

use tracing::trace;

use super::{
    diverged, exhausted, residual_met, step_met, Objective, RootSolver, SolverConfig, SolverResult,
};
use crate::math::differentiation::DerivativeOrder;
use crate::types::SolverError;

/// Halley's method, cubically convergent.
///
/// `x_{n+1} = x_n - 2·f·f' / (2·f'² - f·f'')`. Needs the second derivative,
/// so the objective is evaluated at [`DerivativeOrder::Second`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Halley;

impl RootSolver for Halley {
    fn name(&self) -> &'static str {
        "halley"
    }

    fn required_order(&self) -> DerivativeOrder {
        DerivativeOrder::Second
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
            let eval = objective.evaluate(x, DerivativeOrder::Second);
            trace!(solver = name, iteration, x, residual = eval.value);

            if eval.value.abs() < atol {
                return Ok(residual_met(name, x, iteration, eval.value));
            }

            let f = eval.value;
            let g = eval.require_grad()?;
            let h = eval.require_hessian()?;
            let step = 2.0 * f * g / (2.0 * g * g - f * h);
            let next = x - step;
            if !next.is_finite() {
                return Ok(diverged(name, x, iteration, f));
            }
            if step.abs() < atol {
                return Ok(step_met(name, objective, next, iteration + 1, atol));
            }
            x = next;
        }

        Ok(exhausted(name, objective, x, config.max_iterations))
    }
}
