//! Error types for root finding.
//!
//! Only contract violations are errors here. A solver that runs out of
//! iterations or meets a non-finite iterate still returns a
//! [`SolverResult`](crate::math::solvers::SolverResult) describing what
//! happened.

use thiserror::Error;

/// Solver contract violations.
///
/// # Variants
/// - `InvalidConfig`: Tolerance or iteration budget is unusable
/// - `MissingDerivative`: Objective did not supply a derivative the solver requires
/// - `NoBracket`: Function values at bracket endpoints have same sign
/// - `NumericalInstability`: Objective produced a non-finite value where one is required
///
/// # Examples
/// ```
/// use pricer_core::types::SolverError;
///
/// let err = SolverError::NoBracket { a: 0.0, b: 1.0 };
/// assert!(format!("{}", err).contains("same sign"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Solver configuration rejected before iterating.
    #[error("Invalid solver configuration: {0}")]
    InvalidConfig(String),

    /// The objective returned no derivative of the requested order.
    #[error("Objective did not supply a derivative of order {order}")]
    MissingDerivative {
        /// Derivative order that was requested (1 or 2)
        order: u8,
    },

    /// No valid bracket (function values at endpoints have same sign).
    #[error("No bracket: f({a}) and f({b}) have same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}
