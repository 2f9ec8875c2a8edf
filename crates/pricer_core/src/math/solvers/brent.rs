//! Brent's method root-finding solver.

use tracing::trace;

use super::{finish, Objective, RootSolver, SolverConfig, SolverResult, Termination};
use crate::math::differentiation::DerivativeOrder;
use crate::types::SolverError;

/// Brent's method root finder.
///
/// Combines bisection, secant, and inverse quadratic interpolation for
/// robust root finding without requiring derivatives. Guaranteed to
/// converge for continuous functions with a valid bracket.
///
/// The bracket is part of the solver; the initial guess passed to
/// [`RootSolver::solve`] is not used.
///
/// # Algorithm
///
/// Brent's method switches between:
/// - **Bisection**: Guaranteed progress, slower convergence
/// - **Secant method**: Faster convergence using linear approximation
/// - **Inverse quadratic interpolation**: Even faster when applicable
///
/// and falls back to bisection when an interpolated step would leave the
/// bracket or shrink it too slowly.
///
/// # Example
///
/// ```
/// use pricer_core::math::differentiation::ScalarFunction;
/// use pricer_core::math::solvers::{Brent, DifferentiatedFunction, RootSolver, SolverConfig};
/// use pricer_core::types::Scalar;
///
/// struct SquareMinusTwo;
///
/// impl ScalarFunction for SquareMinusTwo {
///     fn call<D: Scalar>(&self, x: D) -> D {
///         x * x - 2.0
///     }
/// }
///
/// let objective = DifferentiatedFunction::auto(SquareMinusTwo);
/// let result = Brent::new(0.0, 2.0)
///     .solve(&objective, 1.0, &SolverConfig::high_precision())
///     .unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Brent {
    /// Lower bracket endpoint.
    pub lower: f64,
    /// Upper bracket endpoint.
    pub upper: f64,
}

impl Default for Brent {
    /// Bracket `[1e-8, 10]`, wide enough for any volatility seen in practice.
    fn default() -> Self {
        Self {
            lower: 1e-8,
            upper: 10.0,
        }
    }
}

impl Brent {
    /// Create a solver on the bracket `[lower, upper]` (either order).
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }
}

impl RootSolver for Brent {
    fn name(&self) -> &'static str {
        "brent"
    }

    fn required_order(&self) -> DerivativeOrder {
        DerivativeOrder::Value
    }

    /// Find a root inside the bracket.
    ///
    /// # Errors
    ///
    /// * `SolverError::NoBracket` - `f(lower)` and `f(upper)` have same sign
    /// * `SolverError::NumericalInstability` - `f` is NaN at an endpoint
    fn solve<O: Objective + ?Sized>(
        &self,
        objective: &O,
        _x0: f64,
        config: &SolverConfig,
    ) -> Result<SolverResult, SolverError> {
        config.validate()?;
        let name = self.name();
        let tol = config.tolerance;

        let mut a = self.lower;
        let mut b = self.upper;
        let mut fa = objective.value(a);
        let mut fb = objective.value(b);

        if fa.is_nan() || fb.is_nan() {
            return Err(SolverError::NumericalInstability(format!(
                "objective is NaN at bracket endpoint [{a}, {b}]"
            )));
        }
        if fa * fb > 0.0 {
            return Err(SolverError::NoBracket { a, b });
        }

        let mut c = b;
        let mut fc = fb;
        let mut d = b - a;
        let mut e = d;

        for iteration in 0..config.max_iterations {
            // Keep the root between b and c
            if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            // b is the best estimate
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }
            trace!(solver = name, iteration, x = b, residual = fb);

            if fb.abs() < tol {
                return Ok(finish(
                    name,
                    SolverResult::new(b, iteration, true, fb, Termination::ResidualTolerance),
                ));
            }

            let m = 0.5 * (c - b);
            if m.abs() <= tol {
                return Ok(finish(
                    name,
                    SolverResult::new(b, iteration, true, fb, Termination::BracketTolerance),
                ));
            }

            if e.abs() >= tol && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    // Secant
                    (2.0 * m * s, 1.0 - s)
                } else {
                    // Inverse quadratic interpolation
                    let q = fa / fc;
                    let r = fb / fc;
                    (
                        s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                        (q - 1.0) * (r - 1.0) * (s - 1.0),
                    )
                };
                if p > 0.0 {
                    q = -q;
                } else {
                    p = -p;
                }

                let min1 = 3.0 * m * q - (tol * q).abs();
                let min2 = (e * q).abs();
                if 2.0 * p < min1.min(min2) {
                    e = d;
                    d = p / q;
                } else {
                    d = m;
                    e = d;
                }
            } else {
                d = m;
                e = d;
            }

            a = b;
            fa = fb;
            b += if d.abs() > tol { d } else { tol.copysign(m) };
            fb = objective.value(b);
        }

        let residual = fb;
        Ok(finish(
            name,
            SolverResult::new(
                b,
                config.max_iterations,
                false,
                residual,
                Termination::MaxIterations,
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::differentiation::ScalarFunction;
    use crate::math::solvers::DifferentiatedFunction;
    use crate::types::Scalar;

    struct SquareMinusTwo;

    impl ScalarFunction for SquareMinusTwo {
        fn call<D: Scalar>(&self, x: D) -> D {
            x * x - 2.0
        }
    }

    struct Sine;

    impl ScalarFunction for Sine {
        fn call<D: Scalar>(&self, x: D) -> D {
            x.sin()
        }
    }

    struct ExpMinusTwo;

    impl ScalarFunction for ExpMinusTwo {
        fn call<D: Scalar>(&self, x: D) -> D {
            x.exp() - 2.0
        }
    }

    struct Square;

    impl ScalarFunction for Square {
        fn call<D: Scalar>(&self, x: D) -> D {
            x * x
        }
    }

    fn solve<F: ScalarFunction>(f: F, lower: f64, upper: f64) -> Result<SolverResult, SolverError> {
        Brent::new(lower, upper).solve(
            &DifferentiatedFunction::auto(f),
            0.0,
            &SolverConfig::high_precision(),
        )
    }

    // ========================================
    // Basic Functionality Tests
    // ========================================

    #[test]
    fn test_find_sqrt_2() {
        let result = solve(SquareMinusTwo, 0.0, 2.0).unwrap();
        assert!(result.converged);
        assert!(
            (result.root - std::f64::consts::SQRT_2).abs() < 1e-10,
            "Expected √2 ≈ {}, got {}",
            std::f64::consts::SQRT_2,
            result.root
        );
    }

    #[test]
    fn test_find_sin_root() {
        let result = solve(Sine, 3.0, 4.0).unwrap();
        assert!((result.root - std::f64::consts::PI).abs() < 1e-10);
    }

    #[test]
    fn test_find_exp_root() {
        let result = solve(ExpMinusTwo, 0.0, 1.0).unwrap();
        assert!((result.root - 2.0_f64.ln()).abs() < 1e-10);
    }

    #[test]
    fn test_bracket_reversed() {
        let result = solve(SquareMinusTwo, 2.0, 0.0).unwrap();
        assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
    }

    #[test]
    fn test_root_at_endpoint() {
        let result = solve(Sine, 0.0, 1.0).unwrap();
        assert!(result.converged);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.root, 0.0);
    }

    // ========================================
    // Error Handling Tests
    // ========================================

    #[test]
    fn test_no_bracket_same_sign() {
        match solve(Square, 1.0, 2.0).unwrap_err() {
            SolverError::NoBracket { a, b } => {
                assert_eq!(a, 1.0);
                assert_eq!(b, 2.0);
            }
            other => panic!("Expected NoBracket, got {:?}", other),
        }
    }

    #[test]
    fn test_default_bracket() {
        let brent = Brent::default();
        assert_eq!(brent.lower, 1e-8);
        assert_eq!(brent.upper, 10.0);
    }
}
