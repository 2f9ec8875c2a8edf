//! Error type for implied-volatility operations.

use pricer_core::types::SolverError;
use pricer_models::analytical::AnalyticalError;
use thiserror::Error;

/// Errors returned by the implied-volatility API.
///
/// Non-convergence is not an error: it is reported through
/// [`SolverResult::converged`](pricer_core::math::solvers::SolverResult).
///
/// # Examples
///
/// ```
/// use pricer_core::types::SolverError;
/// use pricer_optimiser::OptimiserError;
///
/// let err: OptimiserError = SolverError::InvalidConfig("tolerance".into()).into();
/// assert!(err.to_string().contains("tolerance"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimiserError {
    /// Solver contract violation.
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// Rejected model input.
    #[error(transparent)]
    Analytical(#[from] AnalyticalError),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_error_is_transparent() {
        let err = OptimiserError::from(SolverError::NoBracket { a: 1.0, b: 2.0 });
        assert_eq!(
            err.to_string(),
            SolverError::NoBracket { a: 1.0, b: 2.0 }.to_string()
        );
    }

    #[test]
    fn test_analytical_error_conversion() {
        let err: OptimiserError = AnalyticalError::InvalidSpot { spot: 0.0 }.into();
        assert!(matches!(err, OptimiserError::Analytical(_)));
    }

    #[test]
    fn test_config_display() {
        let err = OptimiserError::Config("missing field `solver`".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field `solver`");
    }
}
