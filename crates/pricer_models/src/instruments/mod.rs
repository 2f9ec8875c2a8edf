//! Option quotes fed to the implied-volatility solver.

mod quote;

pub use quote::{OptionSide, Quote};
