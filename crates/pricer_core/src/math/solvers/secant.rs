//! Secant root-finding solver.

use tracing::trace;

use super::{
    diverged, exhausted, residual_met, step_met, Objective, RootSolver, SolverConfig, SolverResult,
};
use crate::math::differentiation::DerivativeOrder;
use crate::types::SolverError;

/// Secant method, derivative-free.
///
/// `x_{n+1} = x_n - f(x_n)·(x_n - x_{n-1}) / (f(x_n) - f(x_{n-1}))`,
/// seeded with `x_{-1} = 0`. Convergence order is the golden ratio.
///
/// Equal residuals at consecutive iterates make the update non-finite,
/// which is reported as divergence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Secant;

impl RootSolver for Secant {
    fn name(&self) -> &'static str {
        "secant"
    }

    fn required_order(&self) -> DerivativeOrder {
        DerivativeOrder::Value
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

        let mut x_prev = 0.0;
        let mut f_prev = objective.value(x_prev);
        let mut x = x0;

        for iteration in 0..config.max_iterations {
            let fx = objective.value(x);
            trace!(solver = name, iteration, x, residual = fx);

            if fx.abs() < atol {
                return Ok(residual_met(name, x, iteration, fx));
            }

            let step = fx * (x - x_prev) / (fx - f_prev);
            let next = x - step;
            if !next.is_finite() {
                return Ok(diverged(name, x, iteration, fx));
            }
            if step.abs() < atol {
                return Ok(step_met(name, objective, next, iteration + 1, atol));
            }

            x_prev = x;
            f_prev = fx;
            x = next;
        }

        Ok(exhausted(name, objective, x, config.max_iterations))
    }
}
