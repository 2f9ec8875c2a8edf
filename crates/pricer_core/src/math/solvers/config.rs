//! Solver configuration types.

use crate::types::SolverError;

/// Configuration shared by every root-finding algorithm.
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::SolverConfig;
///
/// // Use default configuration
/// let config = SolverConfig::default();
/// assert_eq!(config.tolerance, 1e-6);
/// assert_eq!(config.max_iterations, 1000);
///
/// // Custom configuration
/// let custom = SolverConfig::new(1e-10, 200);
/// assert!(custom.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Absolute convergence tolerance.
    ///
    /// Residual-based solvers stop when `|f(x)| < tolerance`. LBFGS derives
    /// its gradient and change tolerances from it.
    pub tolerance: f64,

    /// Maximum number of iterations before giving up.
    ///
    /// Exhausting the budget is not an error: the solver reports the last
    /// iterate with `converged = false`.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    /// Default values:
    /// - `tolerance`: 1e-6
    /// - `max_iterations`: 1000
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 1000,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with specified values.
    ///
    /// Values are checked by [`SolverConfig::validate`], which every solver
    /// calls before iterating.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Tighter tolerance (1e-10) for callers needing more digits.
    pub fn high_precision() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 1000,
        }
    }

    /// Relaxed tolerance (1e-4) and a small iteration budget (100).
    pub fn fast() -> Self {
        Self {
            tolerance: 1e-4,
            max_iterations: 100,
        }
    }

    /// Check the tolerance is finite and positive and the budget non-zero.
    pub fn validate(&self) -> Result<(), SolverError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SolverError::InvalidConfig(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidConfig(
                "max_iterations must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
