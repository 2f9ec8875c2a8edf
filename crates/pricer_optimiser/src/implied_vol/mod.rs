//! Implied volatility of European options.
//!
//! The residual `f(σ) = BS(S, K, r, t, σ) − observed` is handed to any
//! [`RootSolver`](pricer_core::math::solvers::RootSolver). No solver is
//! preferred: pick one per call, per [`ImpliedVolConfig`], or chain several
//! with [`solve_with_fallback`].
//!
//! ## Entry points
//!
//! - [`call_implied_volatility`] / [`put_implied_volatility`]: one quote, flat arguments
//! - [`implied_volatility`]: one [`Quote`](pricer_models::instruments::Quote), any [`Solver`](pricer_core::math::solvers::Solver)
//! - [`ImpliedVolSolver`]: reusable, configured, optional Greeks
//! - [`solve_chain`]: a whole option chain, in parallel

mod batch;
mod config;
mod facade;
mod objective;

pub use batch::{solve_chain, ChainRow, ChainSummary};
pub use config::{ImpliedVolConfig, ImpliedVolConfigBuilder};
pub use facade::{
    call_implied_volatility, implied_volatility, put_implied_volatility, solve_with_fallback,
    ImpliedVolResult, ImpliedVolSolver,
};
pub use objective::{DerivativeMethod, ImpliedVolObjective};
