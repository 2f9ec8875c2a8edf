//! Option sensitivities.
//!
//! [`ad_greeks`] differentiates the generic pricer in
//! [`black_scholes`](super::black_scholes) with forward-mode dual numbers,
//! one seeded input per pass. Results agree with the closed forms on
//! [`BlackScholes`](super::BlackScholes) to rounding.

use pricer_core::types::{DualNumber, HyperDualNumber};

use super::black_scholes::price;
use crate::instruments::OptionSide;

/// First-order sensitivities plus gamma.
///
/// `theta` is time decay, `-∂V/∂t`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Greeks {
    /// ∂V/∂S
    pub delta: f64,
    /// ∂²V/∂S²
    pub gamma: f64,
    /// ∂V/∂r
    pub rho: f64,
    /// -∂V/∂t
    pub theta: f64,
    /// ∂V/∂σ
    pub vega: f64,
}

/// Greeks of a European option by automatic differentiation.
///
/// # Examples
/// ```
/// use pricer_models::analytical::{ad_greeks, BlackScholes};
/// use pricer_models::instruments::OptionSide;
///
/// let ad = ad_greeks(OptionSide::Put, 100.0, 110.0, 0.05, 1.0, 0.2);
/// let cf = BlackScholes::new(100.0, 0.05, 0.2)
///     .unwrap()
///     .greeks(110.0, 1.0, OptionSide::Put);
/// assert!((ad.rho - cf.rho).abs() < 1e-10);
/// ```
pub fn ad_greeks(
    side: OptionSide,
    spot: f64,
    strike: f64,
    rate: f64,
    expiry: f64,
    volatility: f64,
) -> Greeks {
    let c = |x: f64| DualNumber::from(x);
    let seed = |x: f64| DualNumber::new(x, 1.0);

    let delta = price(side, seed(spot), c(strike), c(rate), c(expiry), c(volatility)).eps;
    let rho = price(side, c(spot), c(strike), seed(rate), c(expiry), c(volatility)).eps;
    let dv_dt = price(side, c(spot), c(strike), c(rate), seed(expiry), c(volatility)).eps;
    let vega = price(side, c(spot), c(strike), c(rate), c(expiry), seed(volatility)).eps;

    let h = |x: f64| HyperDualNumber::from(x);
    let gamma = price(
        side,
        HyperDualNumber::new(spot, 1.0, 0.0),
        h(strike),
        h(rate),
        h(expiry),
        h(volatility),
    )
    .v2;

    Greeks {
        delta,
        gamma,
        rho,
        theta: -dv_dt,
        vega,
    }
}
