//! # Pricer Models
//!
//! Black-Scholes pricing of European options and the quotes they are
//! inverted from.
//!
//! This crate provides:
//! - [`instruments::Quote`]: spot, strike, rate, expiry, observed price and side
//! - [`analytical`]: prices and Greeks generic over `f64` and dual numbers
//!
//! ## Example
//!
//! ```
//! use pricer_models::analytical::price;
//! use pricer_models::instruments::Quote;
//!
//! let quote = Quote::call(100.0, 110.0, 0.05, 1.0, 6.04);
//! let model = price(quote.side, quote.spot, quote.strike, quote.rate, quote.expiry, 0.2);
//! assert!((model - quote.price).abs() < 1e-3);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;
