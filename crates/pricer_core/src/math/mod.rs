//! Differentiation and root finding.

pub mod differentiation;
pub mod solvers;
