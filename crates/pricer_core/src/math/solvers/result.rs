//! Outcome of a single solve.

use std::fmt;

/// Why a solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// `|f(x)|` fell below the tolerance.
    ResidualTolerance,
    /// The update became smaller than the tolerance.
    StepTolerance,
    /// The gradient fell below the gradient tolerance (LBFGS).
    GradientTolerance,
    /// Directional derivative, step or loss change fell below the change tolerance (LBFGS).
    ChangeTolerance,
    /// Bracket width fell below the tolerance (Brent).
    BracketTolerance,
    /// Iteration or evaluation budget exhausted.
    MaxIterations,
    /// A non-finite iterate was produced.
    Diverged,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Termination::ResidualTolerance => "residual tolerance",
            Termination::StepTolerance => "step tolerance",
            Termination::GradientTolerance => "gradient tolerance",
            Termination::ChangeTolerance => "change tolerance",
            Termination::BracketTolerance => "bracket tolerance",
            Termination::MaxIterations => "max iterations",
            Termination::Diverged => "diverged",
        };
        f.write_str(s)
    }
}

/// Result of a root-finding run.
///
/// Non-convergence and divergence are reported here rather than as errors.
/// On divergence `root` is the last finite iterate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverResult {
    /// Final iterate.
    pub root: f64,
    /// Number of updates performed.
    pub iterations: usize,
    /// Whether the convergence criterion was met.
    pub converged: bool,
    /// `f(root)` at the final iterate.
    pub residual: f64,
    /// Stopping reason.
    pub termination: Termination,
}

impl SolverResult {
    /// Construct a result.
    pub fn new(
        root: f64,
        iterations: usize,
        converged: bool,
        residual: f64,
        termination: Termination,
    ) -> Self {
        Self {
            root,
            iterations,
            converged,
            residual,
            termination,
        }
    }

    /// Whether the run stopped on a non-finite iterate.
    #[inline]
    pub fn diverged(&self) -> bool {
        self.termination == Termination::Diverged
    }
}
