//! Gradient descent (Adam) on the squared residual.

use tracing::trace;

use super::{diverged, exhausted, residual_met, Objective, RootSolver, SolverConfig, SolverResult};
use crate::math::differentiation::DerivativeOrder;
use crate::types::SolverError;

/// Adam optimiser minimising `loss(x) = f(x)²`.
///
/// The gradient of the loss is `2·f·f'`. Moments are bias-corrected and the
/// learning rate decays by `decay` every `decay_every` steps. Convergence is
/// linear at best but the method tolerates a poor initial guess.
///
/// Stops when `|f(x)| < tolerance`.
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::{GradientDescent, RootSolver};
///
/// let adam = GradientDescent::default().with_learning_rate(0.1);
/// assert_eq!(adam.learning_rate, 0.1);
/// assert_eq!(adam.name(), "gradient_descent");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GradientDescent {
    /// Initial learning rate.
    pub learning_rate: f64,
    /// Exponential decay of the first moment.
    pub beta1: f64,
    /// Exponential decay of the second moment.
    pub beta2: f64,
    /// Denominator guard.
    pub epsilon: f64,
    /// Multiplicative learning-rate decay.
    pub decay: f64,
    /// Steps between learning-rate decays.
    pub decay_every: usize,
}

impl Default for GradientDescent {
    fn default() -> Self {
        Self {
            learning_rate: 0.2,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            decay: 0.95,
            decay_every: 10,
        }
    }
}

impl GradientDescent {
    /// Set the initial learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the learning-rate schedule.
    pub fn with_decay(mut self, decay: f64, every: usize) -> Self {
        self.decay = decay;
        self.decay_every = every;
        self
    }
}

impl RootSolver for GradientDescent {
    fn name(&self) -> &'static str {
        "gradient_descent"
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
        let mut lr = self.learning_rate;
        let mut m = 0.0;
        let mut v = 0.0;
        let mut beta1_t = 1.0;
        let mut beta2_t = 1.0;

        for iteration in 0..config.max_iterations {
            let eval = objective.evaluate(x, DerivativeOrder::First);
            trace!(solver = name, iteration, x, residual = eval.value, lr);

            if eval.value.abs() < atol {
                return Ok(residual_met(name, x, iteration, eval.value));
            }

            let grad = 2.0 * eval.value * eval.require_grad()?;
            m = self.beta1 * m + (1.0 - self.beta1) * grad;
            v = self.beta2 * v + (1.0 - self.beta2) * grad * grad;
            beta1_t *= self.beta1;
            beta2_t *= self.beta2;
            let m_hat = m / (1.0 - beta1_t);
            let v_hat = v / (1.0 - beta2_t);

            let next = x - lr * m_hat / (v_hat.sqrt() + self.epsilon);
            if !next.is_finite() {
                return Ok(diverged(name, x, iteration, eval.value));
            }
            x = next;

            if self.decay_every > 0 && (iteration + 1) % self.decay_every == 0 {
                lr *= self.decay;
            }
        }

        Ok(exhausted(name, objective, x, config.max_iterations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::differentiation::ScalarFunction;
    use crate::math::solvers::{DifferentiatedFunction, Termination};
    use crate::types::Scalar;

    struct Linear;

    impl ScalarFunction for Linear {
        fn call<D: Scalar>(&self, x: D) -> D {
            x * 2.0 - 1.0
        }
    }

    struct NoRealRoot;

    impl ScalarFunction for NoRealRoot {
        fn call<D: Scalar>(&self, x: D) -> D {
            x * x + 1.0
        }
    }

    #[test]
    fn test_defaults() {
        let adam = GradientDescent::default();
        assert_eq!(adam.learning_rate, 0.2);
        assert_eq!(adam.beta1, 0.9);
        assert_eq!(adam.beta2, 0.999);
        assert_eq!(adam.epsilon, 1e-8);
        assert_eq!(adam.decay, 0.95);
        assert_eq!(adam.decay_every, 10);
    }

    #[test]
    fn test_linear_root() {
        let objective = DifferentiatedFunction::auto(Linear);
        let result = GradientDescent::default()
            .solve(&objective, 2.0, &SolverConfig::default())
            .unwrap();

        assert!(result.converged);
        assert_eq!(result.termination, Termination::ResidualTolerance);
        assert!((result.root - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_gradient_exhausts_budget() {
        // Stationary point of f² that is not a root
        let objective = DifferentiatedFunction::auto(NoRealRoot);
        let config = SolverConfig::new(1e-6, 50);
        let result = GradientDescent::default()
            .solve(&objective, 0.0, &config)
            .unwrap();

        assert!(!result.converged);
        assert_eq!(result.termination, Termination::MaxIterations);
        assert_eq!(result.root, 0.0);
        assert_eq!(result.residual, 1.0);
    }

    #[test]
    fn test_builder_setters() {
        let adam = GradientDescent::default()
            .with_learning_rate(0.05)
            .with_decay(0.5, 3);
        assert_eq!(adam.learning_rate, 0.05);
        assert_eq!(adam.decay, 0.5);
        assert_eq!(adam.decay_every, 3);
    }
}
