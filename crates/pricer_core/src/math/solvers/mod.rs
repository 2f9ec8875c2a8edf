//! Root-finding solvers for scalar equations.
//!
//! Every solver implements [`RootSolver`]: given an [`Objective`], an
//! initial guess and a [`SolverConfig`], it returns a [`SolverResult`].
//! Running out of iterations or meeting a non-finite iterate is reported in
//! the result (`converged = false`); `Err` is reserved for contract
//! violations such as an invalid configuration or a missing derivative.
//!
//! ## Available Solvers
//!
//! | Solver | Derivatives | Convergence |
//! |---|---|---|
//! | [`GradientDescent`] | first | linear (Adam on `f²`) |
//! | [`Lbfgs`] | first | superlinear (quasi-Newton on `f²`) |
//! | [`Secant`] | none | order ≈ 1.618 |
//! | [`NewtonRaphson`] | first | quadratic |
//! | [`Halley`] | first, second | cubic |
//! | [`Brent`] | none | bracketing, guaranteed on a valid bracket |
//!
//! [`Solver`] wraps all of them for selection by value, and [`SolverKind`]
//! names them in configuration.
//!
//! ## Example
//!
//! ```
//! use pricer_core::math::differentiation::ScalarFunction;
//! use pricer_core::math::solvers::{
//!     DifferentiatedFunction, RootSolver, SolverConfig, SolverKind,
//! };
//! use pricer_core::types::Scalar;
//!
//! // x³ - x - 2 = 0 has a single real root near 1.52
//! struct Cubic;
//!
//! impl ScalarFunction for Cubic {
//!     fn call<D: Scalar>(&self, x: D) -> D {
//!         x.powi(3) - x - 2.0
//!     }
//! }
//!
//! let objective = DifferentiatedFunction::auto(Cubic);
//! let config = SolverConfig::high_precision();
//!
//! for kind in [SolverKind::Secant, SolverKind::NewtonRaphson, SolverKind::Halley] {
//!     let result = kind.solver().solve(&objective, 1.5, &config).unwrap();
//!     assert!(result.converged);
//!     assert!((result.root - 1.521_379_706_804_567_6).abs() < 1e-9);
//! }
//! ```

mod brent;
mod config;
mod gradient_descent;
mod halley;
mod lbfgs;
mod newton_raphson;
mod objective;
mod result;
mod secant;

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::math::differentiation::DerivativeOrder;
use crate::types::SolverError;

// Re-export public types at module level
pub use brent::Brent;
pub use config::SolverConfig;
pub use gradient_descent::GradientDescent;
pub use halley::Halley;
pub use lbfgs::Lbfgs;
pub use newton_raphson::NewtonRaphson;
pub use objective::{DifferentiatedFunction, Objective};
pub use result::{SolverResult, Termination};
pub use secant::Secant;

/// Common contract for root-finding algorithms.
pub trait RootSolver {
    /// Short, stable name used in logs.
    fn name(&self) -> &'static str;

    /// Highest derivative order the solver asks the objective for.
    fn required_order(&self) -> DerivativeOrder;

    /// Search for `x` with `f(x) = 0` starting from `x0`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] only for contract violations. Non-convergence
    /// and divergence are described by the returned [`SolverResult`].
    fn solve<O: Objective + ?Sized>(
        &self,
        objective: &O,
        x0: f64,
        config: &SolverConfig,
    ) -> Result<SolverResult, SolverError>;
}

/// Solver selected by value, dispatched statically.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Solver {
    /// Adam on the squared residual.
    GradientDescent(GradientDescent),
    /// Limited-memory BFGS on the squared residual.
    Lbfgs(Lbfgs),
    /// Secant method.
    Secant(Secant),
    /// Newton-Raphson.
    NewtonRaphson(NewtonRaphson),
    /// Halley's method.
    Halley(Halley),
    /// Brent's bracketing method.
    Brent(Brent),
}

impl Solver {
    /// Unit tag for this solver.
    pub fn kind(&self) -> SolverKind {
        match self {
            Solver::GradientDescent(_) => SolverKind::GradientDescent,
            Solver::Lbfgs(_) => SolverKind::Lbfgs,
            Solver::Secant(_) => SolverKind::Secant,
            Solver::NewtonRaphson(_) => SolverKind::NewtonRaphson,
            Solver::Halley(_) => SolverKind::Halley,
            Solver::Brent(_) => SolverKind::Brent,
        }
    }
}

impl RootSolver for Solver {
    fn name(&self) -> &'static str {
        match self {
            Solver::GradientDescent(s) => s.name(),
            Solver::Lbfgs(s) => s.name(),
            Solver::Secant(s) => s.name(),
            Solver::NewtonRaphson(s) => s.name(),
            Solver::Halley(s) => s.name(),
            Solver::Brent(s) => s.name(),
        }
    }

    fn required_order(&self) -> DerivativeOrder {
        match self {
            Solver::GradientDescent(s) => s.required_order(),
            Solver::Lbfgs(s) => s.required_order(),
            Solver::Secant(s) => s.required_order(),
            Solver::NewtonRaphson(s) => s.required_order(),
            Solver::Halley(s) => s.required_order(),
            Solver::Brent(s) => s.required_order(),
        }
    }

    fn solve<O: Objective + ?Sized>(
        &self,
        objective: &O,
        x0: f64,
        config: &SolverConfig,
    ) -> Result<SolverResult, SolverError> {
        match self {
            Solver::GradientDescent(s) => s.solve(objective, x0, config),
            Solver::Lbfgs(s) => s.solve(objective, x0, config),
            Solver::Secant(s) => s.solve(objective, x0, config),
            Solver::NewtonRaphson(s) => s.solve(objective, x0, config),
            Solver::Halley(s) => s.solve(objective, x0, config),
            Solver::Brent(s) => s.solve(objective, x0, config),
        }
    }
}

impl From<SolverKind> for Solver {
    fn from(kind: SolverKind) -> Self {
        kind.solver()
    }
}

/// Solver names, as used in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SolverKind {
    /// [`GradientDescent`]
    GradientDescent,
    /// [`Lbfgs`]
    Lbfgs,
    /// [`Secant`]
    Secant,
    /// [`NewtonRaphson`]
    #[default]
    NewtonRaphson,
    /// [`Halley`]
    Halley,
    /// [`Brent`]
    Brent,
}

impl SolverKind {
    /// Every solver, in order of increasing convergence order, Brent last.
    pub const ALL: [SolverKind; 6] = [
        SolverKind::GradientDescent,
        SolverKind::Lbfgs,
        SolverKind::Secant,
        SolverKind::NewtonRaphson,
        SolverKind::Halley,
        SolverKind::Brent,
    ];

    /// Solver with default parameters.
    pub fn solver(self) -> Solver {
        match self {
            SolverKind::GradientDescent => Solver::GradientDescent(GradientDescent::default()),
            SolverKind::Lbfgs => Solver::Lbfgs(Lbfgs::default()),
            SolverKind::Secant => Solver::Secant(Secant),
            SolverKind::NewtonRaphson => Solver::NewtonRaphson(NewtonRaphson),
            SolverKind::Halley => Solver::Halley(Halley),
            SolverKind::Brent => Solver::Brent(Brent::default()),
        }
    }

    /// Configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            SolverKind::GradientDescent => "gradient_descent",
            SolverKind::Lbfgs => "lbfgs",
            SolverKind::Secant => "secant",
            SolverKind::NewtonRaphson => "newton_raphson",
            SolverKind::Halley => "halley",
            SolverKind::Brent => "brent",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolverKind {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "gradient_descent" | "adam" => Ok(SolverKind::GradientDescent),
            "lbfgs" => Ok(SolverKind::Lbfgs),
            "secant" => Ok(SolverKind::Secant),
            "newton_raphson" | "newton" => Ok(SolverKind::NewtonRaphson),
            "halley" => Ok(SolverKind::Halley),
            "brent" => Ok(SolverKind::Brent),
            other => Err(SolverError::InvalidConfig(format!(
                "unknown solver '{other}'"
            ))),
        }
    }
}

// ============================================================================
// Shared stopping rules
// ============================================================================

/// Log the outcome and pass it through.
fn finish(name: &'static str, result: SolverResult) -> SolverResult {
    if result.diverged() {
        warn!(
            solver = name,
            last_finite = result.root,
            iterations = result.iterations,
            "non-finite iterate, returning last finite value"
        );
    } else {
        debug!(
            solver = name,
            root = result.root,
            iterations = result.iterations,
            converged = result.converged,
            residual = result.residual,
            termination = %result.termination,
            "solve finished"
        );
    }
    result
}

/// `|f(x)| < atol` at the current iterate.
fn residual_met(name: &'static str, x: f64, iterations: usize, residual: f64) -> SolverResult {
    finish(
        name,
        SolverResult::new(x, iterations, true, residual, Termination::ResidualTolerance),
    )
}

/// Update smaller than `atol`: accept the new point, judge it by its residual.
fn step_met<O: Objective + ?Sized>(
    name: &'static str,
    objective: &O,
    x: f64,
    iterations: usize,
    atol: f64,
) -> SolverResult {
    let residual = objective.value(x);
    finish(
        name,
        SolverResult::new(
            x,
            iterations,
            residual.abs() < atol,
            residual,
            Termination::StepTolerance,
        ),
    )
}

/// Non-finite update: report the last finite iterate.
fn diverged(name: &'static str, last_finite: f64, iterations: usize, residual: f64) -> SolverResult {
    finish(
        name,
        SolverResult::new(last_finite, iterations, false, residual, Termination::Diverged),
    )
}

/// Budget exhausted.
fn exhausted<O: Objective + ?Sized>(
    name: &'static str,
    objective: &O,
    x: f64,
    iterations: usize,
) -> SolverResult {
    let residual = objective.value(x);
    finish(
        name,
        SolverResult::new(x, iterations, false, residual, Termination::MaxIterations),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_kind_round_trip_names() {
        for kind in SolverKind::ALL {
            assert_eq!(kind.as_str().parse::<SolverKind>().unwrap(), kind);
            assert_eq!(kind.solver().kind(), kind);
            assert_eq!(kind.solver().name(), kind.as_str());
        }
    }

    #[test]
    fn test_solver_kind_aliases() {
        assert_eq!("Newton".parse::<SolverKind>().unwrap(), SolverKind::NewtonRaphson);
        assert_eq!("adam".parse::<SolverKind>().unwrap(), SolverKind::GradientDescent);
        assert_eq!(
            "gradient-descent".parse::<SolverKind>().unwrap(),
            SolverKind::GradientDescent
        );
        assert!("bisection".parse::<SolverKind>().is_err());
    }

    #[test]
    fn test_required_orders() {
        assert_eq!(SolverKind::Secant.solver().required_order(), DerivativeOrder::Value);
        assert_eq!(SolverKind::Brent.solver().required_order(), DerivativeOrder::Value);
        assert_eq!(
            SolverKind::NewtonRaphson.solver().required_order(),
            DerivativeOrder::First
        );
        assert_eq!(SolverKind::Lbfgs.solver().required_order(), DerivativeOrder::First);
        assert_eq!(
            SolverKind::GradientDescent.solver().required_order(),
            DerivativeOrder::First
        );
        assert_eq!(SolverKind::Halley.solver().required_order(), DerivativeOrder::Second);
    }

    #[test]
    fn test_default_kind() {
        assert_eq!(SolverKind::default(), SolverKind::NewtonRaphson);
    }
}
