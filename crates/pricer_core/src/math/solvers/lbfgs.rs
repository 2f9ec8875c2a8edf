//! Limited-memory BFGS on the squared residual.

use std::collections::VecDeque;

use tracing::trace;

use super::{diverged, finish, Objective, RootSolver, SolverConfig, SolverResult, Termination};
use crate::math::differentiation::DerivativeOrder;
use crate::types::SolverError;

/// Curvature pairs with `y·s` at or below this are skipped.
const CURVATURE_THRESHOLD: f64 = 1e-10;

/// Quasi-Newton minimiser of `loss(x) = f(x)²` without line search.
///
/// A curvature estimate is rebuilt from up to `history_size` pairs of step
/// and gradient change with the two-loop recursion. The first step has
/// length `min(1, 1/|g|)·learning_rate`, later steps use `learning_rate`.
///
/// The root tolerance `atol` maps to
/// - gradient tolerance `min(√atol / 1e-2, 1e-5)`
/// - change tolerance `min(atol / 1e-3, 1e-10)`
///
/// and the run stops when the gradient, the directional derivative, the
/// step or the loss change falls below them. Function evaluations are
/// capped at `max_eval_factor · max_iterations`.
///
/// Those tolerances only decide when to stop. A stationary point of the
/// loss need not be a root, so the result is marked converged only when
/// `|f(x)| < atol`, as for every other solver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Lbfgs {
    /// Step length multiplier.
    pub learning_rate: f64,
    /// Number of curvature pairs kept.
    pub history_size: usize,
    /// Evaluation budget as a multiple of `max_iterations`.
    pub max_eval_factor: f64,
}

impl Default for Lbfgs {
    fn default() -> Self {
        Self {
            learning_rate: 1.0,
            history_size: 100,
            max_eval_factor: 1.25,
        }
    }
}

impl Lbfgs {
    /// Set the number of curvature pairs kept.
    pub fn with_history_size(mut self, history_size: usize) -> Self {
        self.history_size = history_size;
        self
    }

    /// Gradient tolerance derived from the root tolerance.
    pub fn gradient_tolerance(atol: f64) -> f64 {
        (atol.sqrt() / 1e-2).min(1e-5)
    }

    /// Change tolerance derived from the root tolerance.
    pub fn change_tolerance(atol: f64) -> f64 {
        (atol / 1e-3).min(1e-10)
    }

    /// Two-loop recursion: approximate `-H·g`.
    fn direction(history: &VecDeque<CurvaturePair>, g: f64, h_diag: f64) -> f64 {
        let mut q = -g;
        let mut alphas = Vec::with_capacity(history.len());
        for pair in history.iter().rev() {
            let alpha = pair.s * q * pair.rho;
            q -= alpha * pair.y;
            alphas.push(alpha);
        }

        let mut r = q * h_diag;
        for (pair, alpha) in history.iter().zip(alphas.iter().rev()) {
            let beta = pair.y * r * pair.rho;
            r += pair.s * (alpha - beta);
        }
        r
    }
}

#[derive(Debug, Clone, Copy)]
struct CurvaturePair {
    s: f64,
    y: f64,
    rho: f64,
}

/// Squared residual and its gradient.
fn loss_and_grad<O: Objective + ?Sized>(objective: &O, x: f64) -> Result<(f64, f64), SolverError> {
    let eval = objective.evaluate(x, DerivativeOrder::First);
    let grad = eval.require_grad()?;
    Ok((eval.value * eval.value, 2.0 * eval.value * grad))
}

impl RootSolver for Lbfgs {
    fn name(&self) -> &'static str {
        "lbfgs"
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
        let tol_grad = Self::gradient_tolerance(atol);
        let tol_change = Self::change_tolerance(atol);
        let max_iter = config.max_iterations;
        let max_eval = (max_iter as f64 * self.max_eval_factor) as usize;

        let mut x = x0;
        let (mut loss, mut g) = loss_and_grad(objective, x)?;
        let mut evals = 1;

        let mut history: VecDeque<CurvaturePair> = VecDeque::with_capacity(self.history_size);
        let mut h_diag = 1.0;
        let mut d = 0.0;
        let mut t = 0.0;
        let mut prev_g = g;
        let mut n = 0;

        let termination = if g.abs() <= tol_grad {
            Termination::GradientTolerance
        } else {
            loop {
                n += 1;

                if n == 1 {
                    d = -g;
                } else {
                    let y = g - prev_g;
                    let s = d * t;
                    let ys = y * s;
                    if ys > CURVATURE_THRESHOLD {
                        if self.history_size > 0 && history.len() == self.history_size {
                            history.pop_front();
                        }
                        if self.history_size > 0 {
                            history.push_back(CurvaturePair { s, y, rho: 1.0 / ys });
                        }
                        h_diag = ys / (y * y);
                    }
                    d = Self::direction(&history, g, h_diag);
                }

                prev_g = g;
                let prev_loss = loss;
                t = if n == 1 {
                    (1.0 / g.abs()).min(1.0) * self.learning_rate
                } else {
                    self.learning_rate
                };

                let gtd = g * d;
                if gtd > -tol_change {
                    break Termination::ChangeTolerance;
                }

                let next = x + t * d;
                if !next.is_finite() {
                    let residual = objective.value(x);
                    return Ok(diverged(name, x, n - 1, residual));
                }
                x = next;

                if n != max_iter {
                    (loss, g) = loss_and_grad(objective, x)?;
                    evals += 1;
                }
                trace!(solver = name, iteration = n, x, loss, grad = g);

                if n == max_iter || evals >= max_eval {
                    break Termination::MaxIterations;
                }
                if g.abs() <= tol_grad {
                    break Termination::GradientTolerance;
                }
                if (d * t).abs() <= tol_change || (loss - prev_loss).abs() < tol_change {
                    break Termination::ChangeTolerance;
                }
            }
        };

        let residual = objective.value(x);
        let converged = residual.abs() < atol;
        Ok(finish(
            name,
            SolverResult::new(x, n, converged, residual, termination),
        ))
    }
}
