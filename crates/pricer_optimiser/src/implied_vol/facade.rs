//! Entry points binding quote, objective and solver.

use pricer_core::math::solvers::{RootSolver, Solver, SolverConfig, SolverResult};
use pricer_models::analytical::{ad_greeks, Greeks};
use pricer_models::instruments::{OptionSide, Quote};
use tracing::{debug, trace};

use super::config::ImpliedVolConfig;
use super::objective::ImpliedVolObjective;
use crate::OptimiserError;

/// Solved volatility with the solver's report.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpliedVolResult {
    /// Implied volatility (the solver's final iterate).
    pub volatility: f64,
    /// Full solver report.
    pub solver: SolverResult,
    /// Greeks at `volatility`, when requested and converged.
    pub greeks: Option<Greeks>,
}

impl ImpliedVolResult {
    fn from_solver(result: SolverResult) -> Self {
        Self {
            volatility: result.root,
            solver: result,
            greeks: None,
        }
    }

    /// Whether the solver met its convergence criterion.
    #[inline]
    pub fn converged(&self) -> bool {
        self.solver.converged
    }
}

/// Implied volatility of a European call.
///
/// No input is validated: out-of-domain values surface as a diverged or
/// non-converged [`SolverResult`].
///
/// # Examples
///
/// ```
/// use pricer_core::math::solvers::SolverKind;
/// use pricer_optimiser::implied_vol::call_implied_volatility;
///
/// let result = call_implied_volatility(
///     100.0, 110.0, 0.05, 1.0, 6.040_088_129_724,
///     0.5, SolverKind::NewtonRaphson, 1e-6, 1000,
/// )
/// .unwrap();
/// assert!(result.converged());
/// assert!((result.volatility - 0.2).abs() < 1e-6);
/// ```
///
/// # Errors
///
/// [`OptimiserError::Solver`] on an invalid tolerance or budget, or when
/// a bracketing solver's bracket does not contain a sign change.
#[allow(clippy::too_many_arguments)]
pub fn call_implied_volatility(
    spot: f64,
    strike: f64,
    rate: f64,
    expiry: f64,
    price: f64,
    initial_guess: f64,
    solver: impl Into<Solver>,
    tolerance: f64,
    max_iterations: usize,
) -> Result<ImpliedVolResult, OptimiserError> {
    let quote = Quote::new(spot, strike, rate, expiry, price, OptionSide::Call);
    implied_volatility(
        &quote,
        initial_guess,
        &solver.into(),
        &SolverConfig::new(tolerance, max_iterations),
    )
}

/// Implied volatility of a European put.
///
/// See [`call_implied_volatility`].
///
/// # Errors
///
/// As [`call_implied_volatility`].
#[allow(clippy::too_many_arguments)]
pub fn put_implied_volatility(
    spot: f64,
    strike: f64,
    rate: f64,
    expiry: f64,
    price: f64,
    initial_guess: f64,
    solver: impl Into<Solver>,
    tolerance: f64,
    max_iterations: usize,
) -> Result<ImpliedVolResult, OptimiserError> {
    let quote = Quote::new(spot, strike, rate, expiry, price, OptionSide::Put);
    implied_volatility(
        &quote,
        initial_guess,
        &solver.into(),
        &SolverConfig::new(tolerance, max_iterations),
    )
}

/// Implied volatility of `quote` with automatic differentiation.
///
/// # Errors
///
/// Solver contract violations only; see [`RootSolver::solve`].
pub fn implied_volatility(
    quote: &Quote,
    initial_guess: f64,
    solver: &Solver,
    config: &SolverConfig,
) -> Result<ImpliedVolResult, OptimiserError> {
    let objective = ImpliedVolObjective::new(*quote);
    let result = solver.solve(&objective, initial_guess, config)?;
    Ok(ImpliedVolResult::from_solver(result))
}

/// Try `solvers` in order and return the first converged result.
///
/// A solver that errors (for instance Brent without a sign change) is
/// skipped. When none converges, the last attempt is returned as is.
///
/// # Examples
///
/// ```
/// use pricer_core::math::solvers::{SolverConfig, SolverKind};
/// use pricer_models::instruments::Quote;
/// use pricer_optimiser::implied_vol::solve_with_fallback;
///
/// let quote = Quote::call(100.0, 110.0, 0.05, 1.0, 6.040_088_129_724);
/// let solvers = [SolverKind::Halley.solver(), SolverKind::Brent.solver()];
/// let result = solve_with_fallback(&quote, 0.5, &solvers, &SolverConfig::default()).unwrap();
/// assert!(result.converged());
/// ```
///
/// # Errors
///
/// [`OptimiserError::Config`] if `solvers` is empty, otherwise the error
/// of the last solver if it failed.
pub fn solve_with_fallback(
    quote: &Quote,
    initial_guess: f64,
    solvers: &[Solver],
    config: &SolverConfig,
) -> Result<ImpliedVolResult, OptimiserError> {
    let mut last = Err(OptimiserError::Config(
        "no solvers given for fallback".to_string(),
    ));

    for solver in solvers {
        let attempt = implied_volatility(quote, initial_guess, solver, config);
        match &attempt {
            Ok(result) if result.converged() => return attempt,
            Ok(result) => debug!(
                solver = solver.name(),
                termination = %result.solver.termination,
                "not converged, trying next solver"
            ),
            Err(err) => debug!(solver = solver.name(), error = %err, "solver failed, trying next"),
        }
        last = attempt;
    }

    last
}

/// A configured, reusable implied-volatility solver.
///
/// # Examples
///
/// ```
/// use pricer_core::math::solvers::SolverKind;
/// use pricer_models::instruments::Quote;
/// use pricer_optimiser::implied_vol::{ImpliedVolConfig, ImpliedVolSolver};
///
/// let config = ImpliedVolConfig::builder().solver(SolverKind::Secant).build();
/// let solver = ImpliedVolSolver::new(config).unwrap();
///
/// let quote = Quote::put(100.0, 110.0, 0.05, 1.0, 10.675_324_824_803);
/// let result = solver.solve_with_greeks(&quote).unwrap();
/// assert!((result.volatility - 0.2).abs() < 1e-6);
/// assert!((result.greeks.unwrap().delta + 0.550).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpliedVolSolver {
    config: ImpliedVolConfig,
    solver: Solver,
}

impl ImpliedVolSolver {
    /// Solver with default parameters for `config.solver`.
    ///
    /// # Errors
    ///
    /// Any error from [`ImpliedVolConfig::validate`].
    pub fn new(config: ImpliedVolConfig) -> Result<Self, OptimiserError> {
        config.validate()?;
        Ok(Self {
            config,
            solver: config.solver.solver(),
        })
    }

    /// Replace the solver, keeping its own parameters (e.g. a Brent bracket).
    pub fn with_solver(mut self, solver: Solver) -> Self {
        self.config.solver = solver.kind();
        self.solver = solver;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &ImpliedVolConfig {
        &self.config
    }

    /// The solver in use.
    pub fn solver(&self) -> &Solver {
        &self.solver
    }

    /// Solve one quote, with Greeks if the configuration asks for them.
    ///
    /// # Errors
    ///
    /// Solver contract violations only.
    pub fn solve(&self, quote: &Quote) -> Result<ImpliedVolResult, OptimiserError> {
        self.run(quote, self.config.compute_greeks)
    }

    /// Solve one quote and attach Greeks if it converged.
    ///
    /// # Errors
    ///
    /// Solver contract violations only.
    pub fn solve_with_greeks(&self, quote: &Quote) -> Result<ImpliedVolResult, OptimiserError> {
        self.run(quote, true)
    }

    fn run(&self, quote: &Quote, with_greeks: bool) -> Result<ImpliedVolResult, OptimiserError> {
        trace!(
            side = %quote.side,
            strike = quote.strike,
            expiry = quote.expiry,
            price = quote.price,
            "solving implied volatility"
        );

        let objective = ImpliedVolObjective::with_method(*quote, self.config.derivative);
        let report = self.solver.solve(
            &objective,
            self.config.initial_guess,
            &self.config.solver_config(),
        )?;

        let mut result = ImpliedVolResult::from_solver(report);
        if with_greeks && result.converged() {
            result.greeks = Some(ad_greeks(
                quote.side,
                quote.spot,
                quote.strike,
                quote.rate,
                quote.expiry,
                result.volatility,
            ));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::math::solvers::{Brent, SolverKind, Termination};

    const CALL: f64 = 6.040_088_129_724;

    #[test]
    fn test_call_round_trip() {
        let result =
            call_implied_volatility(100.0, 110.0, 0.05, 1.0, CALL, 0.5, SolverKind::Halley, 1e-8, 100)
                .unwrap();
        assert!(result.converged());
        assert_relative_eq!(result.volatility, 0.2, epsilon = 1e-8);
        assert!(result.greeks.is_none());
    }

    #[test]
    fn test_invalid_tolerance_is_error() {
        let err = put_implied_volatility(100.0, 110.0, 0.05, 1.0, 10.0, 0.5, SolverKind::Secant, -1.0, 10)
            .unwrap_err();
        assert!(matches!(err, OptimiserError::Solver(_)));
    }

    #[test]
    fn test_fallback_skips_failing_solver() {
        let quote = Quote::call(100.0, 110.0, 0.05, 1.0, CALL);
        // [0.5, 1.0] has no sign change at σ = 0.2
        let solvers = [
            Solver::Brent(Brent::new(0.5, 1.0)),
            SolverKind::NewtonRaphson.solver(),
        ];
        let result = solve_with_fallback(&quote, 0.5, &solvers, &SolverConfig::default()).unwrap();
        assert!(result.converged());
        assert_relative_eq!(result.volatility, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_fallback_returns_last_attempt() {
        let quote = Quote::call(100.0, 110.0, 0.05, 0.0, CALL);
        let solvers = [SolverKind::NewtonRaphson.solver(), SolverKind::Halley.solver()];
        let result = solve_with_fallback(&quote, 0.5, &solvers, &SolverConfig::default()).unwrap();
        assert!(!result.converged());
    }

    #[test]
    fn test_fallback_empty_is_error() {
        let quote = Quote::call(100.0, 110.0, 0.05, 1.0, CALL);
        let err = solve_with_fallback(&quote, 0.5, &[], &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, OptimiserError::Config(_)));
    }

    #[test]
    fn test_solver_from_config() {
        let config = ImpliedVolConfig::builder()
            .solver(SolverKind::Lbfgs)
            .compute_greeks(true)
            .build();
        let solver = ImpliedVolSolver::new(config).unwrap();
        assert_eq!(solver.solver().kind(), SolverKind::Lbfgs);

        let result = solver.solve(&Quote::call(100.0, 110.0, 0.05, 1.0, CALL)).unwrap();
        assert!(result.converged());
        assert!(result.greeks.is_some());
    }

    #[test]
    fn test_with_solver_updates_kind() {
        let solver = ImpliedVolSolver::new(ImpliedVolConfig::default())
            .unwrap()
            .with_solver(Solver::Brent(Brent::new(0.01, 2.0)));
        assert_eq!(solver.config().solver, SolverKind::Brent);

        let result = solver.solve(&Quote::call(100.0, 110.0, 0.05, 1.0, CALL)).unwrap();
        assert_relative_eq!(result.volatility, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_no_greeks_without_convergence() {
        let solver = ImpliedVolSolver::new(ImpliedVolConfig::default()).unwrap();
        let result = solver
            .solve_with_greeks(&Quote::call(100.0, 110.0, 0.05, 0.0, CALL))
            .unwrap();
        assert!(!result.converged());
        assert!(result.greeks.is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ImpliedVolConfig::builder().max_iterations(0).build();
        assert!(ImpliedVolSolver::new(config).is_err());
    }

    #[test]
    fn test_zero_initial_guess_diverges() {
        let result =
            call_implied_volatility(100.0, 110.0, 0.05, 1.0, CALL, 0.0, SolverKind::NewtonRaphson, 1e-6, 100)
                .unwrap();
        assert!(!result.converged());
        assert_eq!(result.solver.termination, Termination::Diverged);
        assert_eq!(result.volatility, 0.0);
    }
}
