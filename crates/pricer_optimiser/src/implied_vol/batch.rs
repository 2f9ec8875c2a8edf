//! Option-chain solving.
//!
//! Every quote is solved independently. With the `parallel` feature the
//! chain is spread over the rayon thread pool; results keep input order
//! either way.

use pricer_models::instruments::Quote;
use tracing::info;

use super::config::ImpliedVolConfig;
use super::facade::{ImpliedVolResult, ImpliedVolSolver};
use crate::OptimiserError;

/// Result of one row of a chain.
pub type ChainRow = Result<ImpliedVolResult, OptimiserError>;

/// Solve every quote in `quotes` with `config`.
///
/// An invalid `config` is reported on every row.
///
/// # Examples
///
/// ```
/// use pricer_models::analytical::call_price;
/// use pricer_models::instruments::Quote;
/// use pricer_optimiser::implied_vol::{solve_chain, ImpliedVolConfig};
///
/// let quotes: Vec<Quote> = [90.0, 100.0, 110.0]
///     .iter()
///     .map(|&k| Quote::call(100.0, k, 0.01, 0.5, call_price(100.0, k, 0.01, 0.5, 0.25)))
///     .collect();
///
/// let rows = solve_chain(&quotes, &ImpliedVolConfig::default());
/// for row in rows {
///     assert!((row.unwrap().volatility - 0.25).abs() < 1e-6);
/// }
/// ```
pub fn solve_chain(quotes: &[Quote], config: &ImpliedVolConfig) -> Vec<ChainRow> {
    let solver = match ImpliedVolSolver::new(*config) {
        Ok(solver) => solver,
        Err(err) => return quotes.iter().map(|_| Err(err.clone())).collect(),
    };

    let rows = solve_rows(&solver, quotes);
    let summary = ChainSummary::from_rows(&rows);
    info!(
        solver = %config.solver,
        total = summary.total,
        converged = summary.converged,
        not_converged = summary.not_converged,
        diverged = summary.diverged,
        failed = summary.failed,
        "chain solved"
    );
    rows
}

#[cfg(feature = "parallel")]
fn solve_rows(solver: &ImpliedVolSolver, quotes: &[Quote]) -> Vec<ChainRow> {
    use rayon::prelude::*;

    quotes.par_iter().map(|quote| solver.solve(quote)).collect()
}

/// Sequential fallback when parallel feature is disabled.
#[cfg(not(feature = "parallel"))]
fn solve_rows(solver: &ImpliedVolSolver, quotes: &[Quote]) -> Vec<ChainRow> {
    quotes.iter().map(|quote| solver.solve(quote)).collect()
}

/// Outcome counts over a solved chain.
///
/// `converged + not_converged + diverged + failed == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainSummary {
    /// Number of rows.
    pub total: usize,
    /// Rows that met the convergence criterion.
    pub converged: usize,
    /// Rows that stopped without converging or diverging.
    pub not_converged: usize,
    /// Rows that hit a non-finite iterate.
    pub diverged: usize,
    /// Rows that returned an error.
    pub failed: usize,
}

impl ChainSummary {
    /// Count outcomes in `rows`.
    pub fn from_rows(rows: &[ChainRow]) -> Self {
        rows.iter().fold(
            Self {
                total: rows.len(),
                ..Self::default()
            },
            |mut summary, row| {
                match row {
                    Ok(result) if result.converged() => summary.converged += 1,
                    Ok(result) if result.solver.diverged() => summary.diverged += 1,
                    Ok(_) => summary.not_converged += 1,
                    Err(_) => summary.failed += 1,
                }
                summary
            },
        )
    }

    /// Whether every row converged.
    pub fn all_converged(&self) -> bool {
        self.converged == self.total
    }
}
