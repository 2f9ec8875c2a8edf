//! Analytical pricing formulas for European options.
//!
//! This module provides:
//! - Black-Scholes prices, generic over [`Scalar`](pricer_core::types::Scalar)
//! - Closed-form Greeks, including volga for second-order solvers
//! - Greeks by automatic differentiation
//!
//! ## Design Principles
//!
//! - **Generic over `T: Scalar`**: The same code prices `f64` and `Dual64`
//! - **No branching on inputs**: Degenerate σ or t flow through the formula
//! - **Numerical Stability**: Uses erfc-based CDF for accuracy

pub mod black_scholes;
pub mod distributions;
pub mod error;
pub mod greeks;

pub use black_scholes::{call_price, price, put_price, BlackScholes};
pub use distributions::{norm_cdf, norm_cdf_f64, norm_pdf, norm_pdf_f64};
pub use error::AnalyticalError;
pub use greeks::{ad_greeks, Greeks};
