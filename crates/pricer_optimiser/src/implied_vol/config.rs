//! Implied-volatility configuration.

use pricer_core::math::solvers::{SolverConfig, SolverKind};

use super::objective::DerivativeMethod;
use crate::OptimiserError;

/// Configuration for an [`ImpliedVolSolver`](super::ImpliedVolSolver).
///
/// # Examples
///
/// ```
/// use pricer_core::math::solvers::SolverKind;
/// use pricer_optimiser::implied_vol::ImpliedVolConfig;
///
/// // Use default configuration
/// let config = ImpliedVolConfig::default();
/// assert_eq!(config.solver, SolverKind::NewtonRaphson);
/// assert_eq!(config.initial_guess, 0.5);
///
/// // Custom configuration
/// let config = ImpliedVolConfig::builder()
///     .solver(SolverKind::Halley)
///     .tolerance(1e-10)
///     .max_iterations(50)
///     .compute_greeks(true)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ImpliedVolConfig {
    /// Root finder.
    ///
    /// Default: NewtonRaphson
    pub solver: SolverKind,

    /// Absolute tolerance on the price residual.
    ///
    /// Default: 1e-6
    pub tolerance: f64,

    /// Iteration budget per quote.
    ///
    /// Default: 1000
    pub max_iterations: usize,

    /// Starting volatility. Ignored by Brent.
    ///
    /// Default: 0.5
    pub initial_guess: f64,

    /// How derivatives with respect to σ are obtained.
    ///
    /// Default: AutoDiff
    pub derivative: DerivativeMethod,

    /// Attach Greeks at the solved volatility to converged results.
    ///
    /// Default: false
    pub compute_greeks: bool,
}

impl Default for ImpliedVolConfig {
    fn default() -> Self {
        let solver = SolverConfig::default();
        Self {
            solver: SolverKind::default(),
            tolerance: solver.tolerance,
            max_iterations: solver.max_iterations,
            initial_guess: 0.5,
            derivative: DerivativeMethod::default(),
            compute_greeks: false,
        }
    }
}

impl ImpliedVolConfig {
    /// Create a configuration builder for fluent construction.
    pub fn builder() -> ImpliedVolConfigBuilder {
        ImpliedVolConfigBuilder::new()
    }

    /// Tight tolerance (1e-10), Halley.
    pub fn high_precision() -> Self {
        let solver = SolverConfig::high_precision();
        Self {
            solver: SolverKind::Halley,
            tolerance: solver.tolerance,
            max_iterations: solver.max_iterations,
            ..Self::default()
        }
    }

    /// Loose tolerance (1e-4) and a small budget.
    pub fn fast() -> Self {
        let solver = SolverConfig::fast();
        Self {
            tolerance: solver.tolerance,
            max_iterations: solver.max_iterations,
            ..Self::default()
        }
    }

    /// Tolerance and iteration budget as passed to the solver.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.tolerance, self.max_iterations)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OptimiserError::Solver`] for a bad tolerance or budget and
    /// [`OptimiserError::Config`] for a non-finite initial guess.
    pub fn validate(&self) -> Result<(), OptimiserError> {
        self.solver_config().validate()?;
        if !self.initial_guess.is_finite() {
            return Err(OptimiserError::Config(format!(
                "initial_guess must be finite, got {}",
                self.initial_guess
            )));
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl ImpliedVolConfig {
    /// Parse and validate a TOML document.
    ///
    /// Missing keys take their default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::math::solvers::SolverKind;
    /// use pricer_optimiser::implied_vol::{DerivativeMethod, ImpliedVolConfig};
    ///
    /// let config = ImpliedVolConfig::from_toml_str(
    ///     r#"
    ///     solver = "secant"
    ///     tolerance = 1e-8
    ///     derivative = "analytic"
    ///     "#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.solver, SolverKind::Secant);
    /// assert_eq!(config.derivative, DerivativeMethod::Analytic);
    /// assert_eq!(config.max_iterations, 1000);
    /// ```
    ///
    /// # Errors
    ///
    /// [`OptimiserError::Config`] on malformed TOML or unknown keys, or any
    /// error from [`ImpliedVolConfig::validate`].
    pub fn from_toml_str(content: &str) -> Result<Self, OptimiserError> {
        let config: Self =
            toml::from_str(content).map_err(|e| OptimiserError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialise to TOML.
    ///
    /// # Errors
    ///
    /// [`OptimiserError::Config`] if serialisation fails.
    pub fn to_toml_string(&self) -> Result<String, OptimiserError> {
        toml::to_string(self).map_err(|e| OptimiserError::Config(e.to_string()))
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// [`OptimiserError::Config`] if the file cannot be read, plus any error
    /// from [`ImpliedVolConfig::from_toml_str`].
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, OptimiserError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            OptimiserError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }
}

/// Builder for [`ImpliedVolConfig`].
#[derive(Debug, Clone, Default)]
pub struct ImpliedVolConfigBuilder {
    config: ImpliedVolConfig,
}

impl ImpliedVolConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root finder.
    pub fn solver(mut self, solver: SolverKind) -> Self {
        self.config.solver = solver;
        self
    }

    /// Set the convergence tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Set the maximum iterations.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the starting volatility.
    pub fn initial_guess(mut self, initial_guess: f64) -> Self {
        self.config.initial_guess = initial_guess;
        self
    }

    /// Set the derivative method.
    pub fn derivative(mut self, derivative: DerivativeMethod) -> Self {
        self.config.derivative = derivative;
        self
    }

    /// Set whether Greeks are attached to results.
    pub fn compute_greeks(mut self, compute_greeks: bool) -> Self {
        self.config.compute_greeks = compute_greeks;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ImpliedVolConfig {
        self.config
    }
}
