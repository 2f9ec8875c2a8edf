//! Black-Scholes pricing model for European options.
//!
//! This module provides the Black-Scholes model for pricing European
//! call and put options with closed-form Greeks.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! The free functions are generic over [`Scalar`]: called with `f64` they
//! price, called with dual numbers they also return derivatives with
//! respect to whichever inputs were seeded.
//!
//! No limiting cases are special-cased. With σ → 0 or T → 0, d₁ and d₂ go
//! to ±∞ and N saturates, giving a finite price with zero vega.

use pricer_core::types::Scalar;

use super::distributions::{norm_cdf, norm_pdf};
use super::error::AnalyticalError;
use super::greeks::Greeks;
use crate::instruments::OptionSide;

/// d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
#[inline]
pub fn d1<T: Scalar>(spot: T, strike: T, rate: T, expiry: T, volatility: T) -> T {
    let log_moneyness = (spot / strike).ln();
    let drift = (rate + volatility * volatility * 0.5) * expiry;
    (log_moneyness + drift) / (volatility * expiry.sqrt())
}

/// d₂ = d₁ - σ√T
#[inline]
pub fn d2<T: Scalar>(spot: T, strike: T, rate: T, expiry: T, volatility: T) -> T {
    d1(spot, strike, rate, expiry, volatility) - volatility * expiry.sqrt()
}

/// European call price.
///
/// # Examples
/// ```
/// use pricer_models::analytical::call_price;
///
/// let price = call_price(100.0_f64, 110.0, 0.05, 1.0, 0.2);
/// assert!((price - 6.040_088_129_724).abs() < 1e-9);
/// ```
#[inline]
pub fn call_price<T: Scalar>(spot: T, strike: T, rate: T, expiry: T, volatility: T) -> T {
    let d1 = d1(spot, strike, rate, expiry, volatility);
    let d2 = d1 - volatility * expiry.sqrt();
    let discount = (-(rate * expiry)).exp();

    // C = S·N(d₁) - K·e^(-rT)·N(d₂)
    spot * norm_cdf(d1) - strike * discount * norm_cdf(d2)
}

/// European put price.
///
/// # Examples
/// ```
/// use pricer_models::analytical::put_price;
///
/// let price = put_price(100.0_f64, 110.0, 0.05, 1.0, 0.2);
/// assert!((price - 10.675_324_824_803).abs() < 1e-9);
/// ```
#[inline]
pub fn put_price<T: Scalar>(spot: T, strike: T, rate: T, expiry: T, volatility: T) -> T {
    let d1 = d1(spot, strike, rate, expiry, volatility);
    let d2 = d1 - volatility * expiry.sqrt();
    let discount = (-(rate * expiry)).exp();

    // P = K·e^(-rT)·N(-d₂) - S·N(-d₁)
    strike * discount * norm_cdf(-d2) - spot * norm_cdf(-d1)
}

/// Price of a call or put.
#[inline]
pub fn price<T: Scalar>(
    side: OptionSide,
    spot: T,
    strike: T,
    rate: T,
    expiry: T,
    volatility: T,
) -> T {
    match side {
        OptionSide::Call => call_price(spot, strike, rate, expiry, volatility),
        OptionSide::Put => put_price(spot, strike, rate, expiry, volatility),
    }
}

/// Black-Scholes model for European option pricing.
///
/// Holds validated market parameters and provides closed-form pricing
/// and Greeks.
///
/// # Type Parameters
/// * `T` - Scalar type (`f64`, or a dual number for sensitivities)
///
/// # Examples
/// ```
/// use pricer_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0_f64, 0.05, 0.2).unwrap();
/// let call_price = bs.price_call(100.0, 1.0);
/// let put_price = bs.price_put(100.0, 1.0);
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call_price - put_price - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BlackScholes<T: Scalar> {
    /// Spot price (S)
    spot: T,
    /// Risk-free interest rate (r)
    rate: T,
    /// Volatility (σ)
    volatility: T,
}

impl<T: Scalar> BlackScholes<T> {
    /// Creates a new Black-Scholes model.
    ///
    /// # Arguments
    /// * `spot` - Current spot price (must be positive)
    /// * `rate` - Risk-free interest rate (annualised)
    /// * `volatility` - Volatility (must be positive)
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidSpot` if spot <= 0
    /// - `AnalyticalError::InvalidVolatility` if volatility <= 0
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// assert!(BlackScholes::new(100.0_f64, 0.05, 0.2).is_ok());
    /// assert!(BlackScholes::new(-100.0_f64, 0.05, 0.2).is_err());
    /// assert!(BlackScholes::new(100.0_f64, 0.05, 0.0).is_err());
    /// ```
    pub fn new(spot: T, rate: T, volatility: T) -> Result<Self, AnalyticalError> {
        if !(spot.re() > 0.0) {
            return Err(AnalyticalError::InvalidSpot { spot: spot.re() });
        }
        if !(volatility.re() > 0.0) {
            return Err(AnalyticalError::InvalidVolatility {
                volatility: volatility.re(),
            });
        }
        if !rate.re().is_finite() {
            return Err(AnalyticalError::InvalidRate { rate: rate.re() });
        }

        Ok(Self {
            spot,
            rate,
            volatility,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> T {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> T {
        self.volatility
    }

    /// Same market with a different volatility (not validated).
    pub fn with_volatility(self, volatility: T) -> Self {
        Self { volatility, ..self }
    }

    /// Computes the d1 term.
    #[inline]
    pub fn d1(&self, strike: T, expiry: T) -> T {
        d1(self.spot, strike, self.rate, expiry, self.volatility)
    }

    /// Computes the d2 term.
    #[inline]
    pub fn d2(&self, strike: T, expiry: T) -> T {
        d2(self.spot, strike, self.rate, expiry, self.volatility)
    }

    /// Computes European call option price.
    #[inline]
    pub fn price_call(&self, strike: T, expiry: T) -> T {
        call_price(self.spot, strike, self.rate, expiry, self.volatility)
    }

    /// Computes European put option price.
    #[inline]
    pub fn price_put(&self, strike: T, expiry: T) -> T {
        put_price(self.spot, strike, self.rate, expiry, self.volatility)
    }

    /// Computes the price of either side.
    #[inline]
    pub fn price(&self, side: OptionSide, strike: T, expiry: T) -> T {
        price(side, self.spot, strike, self.rate, expiry, self.volatility)
    }

    /// Computes Delta (∂V/∂S).
    ///
    /// - Call Delta = N(d₁)
    /// - Put Delta = N(d₁) - 1
    #[inline]
    pub fn delta(&self, strike: T, expiry: T, side: OptionSide) -> T {
        let n_d1 = norm_cdf(self.d1(strike, expiry));
        match side {
            OptionSide::Call => n_d1,
            OptionSide::Put => n_d1 - 1.0,
        }
    }

    /// Computes Gamma (∂²V/∂S²).
    ///
    /// Gamma = φ(d₁) / (S·σ·√T), the same for calls and puts.
    #[inline]
    pub fn gamma(&self, strike: T, expiry: T) -> T {
        norm_pdf(self.d1(strike, expiry)) / (self.spot * self.volatility * expiry.sqrt())
    }

    /// Computes Vega (∂V/∂σ).
    ///
    /// Vega = S·√T·φ(d₁), the same for calls and puts.
    #[inline]
    pub fn vega(&self, strike: T, expiry: T) -> T {
        self.spot * expiry.sqrt() * norm_pdf(self.d1(strike, expiry))
    }

    /// Computes Volga (∂²V/∂σ²).
    ///
    /// Volga = Vega·d₁·d₂/σ, the same for calls and puts.
    #[inline]
    pub fn volga(&self, strike: T, expiry: T) -> T {
        let d1 = self.d1(strike, expiry);
        let d2 = d1 - self.volatility * expiry.sqrt();
        self.vega(strike, expiry) * d1 * d2 / self.volatility
    }

    /// Computes Theta as time decay, `-∂V/∂T`.
    ///
    /// - Call Theta = -(S·σ·φ(d₁))/(2√T) - r·K·e^(-rT)·N(d₂)
    /// - Put Theta = -(S·σ·φ(d₁))/(2√T) + r·K·e^(-rT)·N(-d₂)
    ///
    /// The sign convention reports the change in value as calendar time
    /// passes, so it is usually negative.
    #[inline]
    pub fn theta(&self, strike: T, expiry: T, side: OptionSide) -> T {
        let d1 = self.d1(strike, expiry);
        let d2 = d1 - self.volatility * expiry.sqrt();
        let discount = (-(self.rate * expiry)).exp();

        // Common term: -(S·σ·φ(d₁))/(2√T)
        let term1 = -(self.spot * self.volatility * norm_pdf(d1)) / (expiry.sqrt() * 2.0);
        let carry = self.rate * strike * discount;

        match side {
            OptionSide::Call => term1 - carry * norm_cdf(d2),
            OptionSide::Put => term1 + carry * norm_cdf(-d2),
        }
    }

    /// Computes Rho (∂V/∂r).
    ///
    /// - Call Rho = K·T·e^(-rT)·N(d₂)
    /// - Put Rho = -K·T·e^(-rT)·N(-d₂)
    #[inline]
    pub fn rho(&self, strike: T, expiry: T, side: OptionSide) -> T {
        let d2 = self.d2(strike, expiry);
        let discounted = strike * expiry * (-(self.rate * expiry)).exp();

        match side {
            OptionSide::Call => discounted * norm_cdf(d2),
            OptionSide::Put => -(discounted * norm_cdf(-d2)),
        }
    }
}

impl BlackScholes<f64> {
    /// All first-order Greeks plus gamma, in closed form.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    /// use pricer_models::instruments::OptionSide;
    ///
    /// let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
    /// let greeks = bs.greeks(110.0, 1.0, OptionSide::Call);
    /// assert!((greeks.delta - 0.450).abs() < 1e-3);
    /// assert!((greeks.vega - 39.576).abs() < 1e-3);
    /// ```
    pub fn greeks(&self, strike: f64, expiry: f64, side: OptionSide) -> Greeks {
        Greeks {
            delta: self.delta(strike, expiry, side),
            gamma: self.gamma(strike, expiry),
            rho: self.rho(strike, expiry, side),
            theta: self.theta(strike, expiry, side),
            vega: self.vega(strike, expiry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::types::DualNumber;

    const S: f64 = 100.0;
    const K: f64 = 110.0;
    const R: f64 = 0.05;
    const T: f64 = 1.0;
    const SIGMA: f64 = 0.2;

    fn model() -> BlackScholes<f64> {
        BlackScholes::new(S, R, SIGMA).unwrap()
    }

    // ==========================================================
    // Constructor Tests
    // ==========================================================

    #[test]
    fn test_new_valid_parameters() {
        let bs = model();
        assert_eq!(bs.spot(), 100.0);
        assert_eq!(bs.rate(), 0.05);
        assert_eq!(bs.volatility(), 0.2);
    }

    #[test]
    fn test_new_invalid_spot_negative() {
        match BlackScholes::new(-100.0_f64, 0.05, 0.2).unwrap_err() {
            AnalyticalError::InvalidSpot { spot } => assert_eq!(spot, -100.0),
            other => panic!("Expected InvalidSpot error, got {:?}", other),
        }
    }

    #[test]
    fn test_new_invalid_volatility_zero() {
        match BlackScholes::new(100.0_f64, 0.05, 0.0).unwrap_err() {
            AnalyticalError::InvalidVolatility { volatility } => assert_eq!(volatility, 0.0),
            other => panic!("Expected InvalidVolatility error, got {:?}", other),
        }
    }

    #[test]
    fn test_new_nan_volatility_rejected() {
        assert!(BlackScholes::new(100.0_f64, 0.05, f64::NAN).is_err());
    }

    #[test]
    fn test_new_negative_rate_allowed() {
        assert!(BlackScholes::new(100.0_f64, -0.01, 0.2).is_ok());
    }

    // ==========================================================
    // d1/d2 Tests
    // ==========================================================

    #[test]
    fn test_d1_atm() {
        // ATM, r = 0: d1 = σ√T/2
        let bs = BlackScholes::new(100.0_f64, 0.0, 0.2).unwrap();
        assert_relative_eq!(bs.d1(100.0, 1.0), 0.1, epsilon = 1e-15);
        assert_relative_eq!(bs.d2(100.0, 1.0), -0.1, epsilon = 1e-15);
    }

    #[test]
    fn test_d1_reference_value() {
        let expected = ((S / K).ln() + (R + 0.5 * SIGMA * SIGMA) * T) / (SIGMA * T.sqrt());
        assert_relative_eq!(model().d1(K, T), expected, epsilon = 1e-15);
        assert_relative_eq!(model().d1(K, T), -0.126_550_899_021_624_4, epsilon = 1e-12);
    }

    #[test]
    fn test_d1_d2_relationship() {
        let bs = model();
        for &t in &[0.1, 0.5, 2.0, 5.0] {
            assert_relative_eq!(
                bs.d1(K, t) - bs.d2(K, t),
                SIGMA * t.sqrt(),
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn test_d1_zero_expiry_is_infinite() {
        // No special case: ln(S/K)/0
        assert_eq!(model().d1(K, 0.0), f64::NEG_INFINITY);
        assert_eq!(model().d1(90.0, 0.0), f64::INFINITY);
    }

    // ==========================================================
    // Price Tests
    // ==========================================================

    #[test]
    fn test_call_price_reference_value() {
        assert_relative_eq!(model().price_call(K, T), 6.040_088_129_724, epsilon = 1e-9);
    }

    #[test]
    fn test_put_price_reference_value() {
        assert_relative_eq!(model().price_put(K, T), 10.675_324_824_803, epsilon = 1e-9);
    }

    #[test]
    fn test_price_dispatches_on_side() {
        let bs = model();
        assert_eq!(bs.price(OptionSide::Call, K, T), bs.price_call(K, T));
        assert_eq!(bs.price(OptionSide::Put, K, T), bs.price_put(K, T));
        assert_eq!(price(OptionSide::Call, S, K, R, T, SIGMA), bs.price_call(K, T));
    }

    #[test]
    fn test_zero_volatility_limit_is_finite() {
        // σ = 0 saturates to the discounted forward intrinsic value
        let call = call_price(S, K, R, T, 0.0);
        let put = put_price(S, K, R, T, 0.0);
        assert_eq!(call, 0.0);
        assert_relative_eq!(put, K * (-R * T).exp() - S, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_expiry_limit_is_intrinsic() {
        assert_eq!(call_price(S, K, R, 0.0, SIGMA), 0.0);
        assert_relative_eq!(put_price(S, K, R, 0.0, SIGMA), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_deep_itm_call() {
        let price = model().price_call(20.0, T);
        let lower = S - 20.0 * (-R * T).exp();
        assert_relative_eq!(price, lower, epsilon = 1e-6);
    }

    #[test]
    fn test_deep_otm_call() {
        let price = model().price_call(300.0, 0.25);
        assert!(price.abs() < 1e-10);
    }

    // ==========================================================
    // Put-Call Parity Tests
    // ==========================================================

    #[test]
    fn test_put_call_parity_various_strikes() {
        let bs = model();
        for &k in &[60.0, 90.0, 100.0, 110.0, 150.0] {
            let lhs = bs.price_call(k, T) + k * (-R * T).exp();
            let rhs = S + bs.price_put(k, T);
            assert_relative_eq!(lhs, rhs, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_put_call_parity_negative_rate() {
        let bs = BlackScholes::new(100.0_f64, -0.02, 0.3).unwrap();
        for &t in &[0.1, 1.0, 4.0] {
            let lhs = bs.price_call(95.0, t) - bs.price_put(95.0, t);
            let rhs = 100.0 - 95.0 * (0.02_f64 * t).exp();
            assert_relative_eq!(lhs, rhs, epsilon = 1e-10);
        }
    }

    // ==========================================================
    // Greeks Tests
    // ==========================================================

    #[test]
    fn test_reference_greeks_call() {
        let g = model().greeks(K, T, OptionSide::Call);
        assert_relative_eq!(g.delta, 0.450, epsilon = 1e-3);
        assert_relative_eq!(g.gamma, 0.020, epsilon = 1e-3);
        assert_relative_eq!(g.rho, 38.925, epsilon = 1e-3);
        assert_relative_eq!(g.theta, -5.904, epsilon = 1e-3);
        assert_relative_eq!(g.vega, 39.576, epsilon = 1e-3);
    }

    #[test]
    fn test_reference_greeks_put() {
        let g = model().greeks(K, T, OptionSide::Put);
        assert_relative_eq!(g.delta, -0.550, epsilon = 1e-3);
        assert_relative_eq!(g.gamma, 0.020, epsilon = 1e-3);
        assert_relative_eq!(g.rho, -65.711, epsilon = 1e-3);
        assert_relative_eq!(g.theta, -0.672, epsilon = 1e-3);
        assert_relative_eq!(g.vega, 39.576, epsilon = 1e-3);
    }

    #[test]
    fn test_delta_call_put_relationship() {
        let bs = model();
        for &k in &[80.0, 100.0, 120.0] {
            let diff = bs.delta(k, T, OptionSide::Call) - bs.delta(k, T, OptionSide::Put);
            assert_relative_eq!(diff, 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_gamma_maximum_near_atm() {
        let bs = model();
        let atm = bs.gamma(100.0, T);
        assert!(atm > bs.gamma(70.0, T));
        assert!(atm > bs.gamma(140.0, T));
    }

    #[test]
    fn test_vega_vs_dual_derivative() {
        let vol = DualNumber::new(SIGMA, 1.0);
        let p = call_price(
            DualNumber::from(S),
            DualNumber::from(K),
            DualNumber::from(R),
            DualNumber::from(T),
            vol,
        );
        assert_relative_eq!(p.eps, model().vega(K, T), epsilon = 1e-10);
    }

    #[test]
    fn test_volga_vs_finite_diff() {
        let bs = model();
        let h = 1e-4;
        let up = bs.with_volatility(SIGMA + h).vega(K, T);
        let down = bs.with_volatility(SIGMA - h).vega(K, T);
        assert_relative_eq!(bs.volga(K, T), (up - down) / (2.0 * h), epsilon = 1e-4);
    }

    #[test]
    fn test_rho_vs_finite_diff() {
        let h = 1e-5;
        let up = call_price(S, K, R + h, T, SIGMA);
        let down = call_price(S, K, R - h, T, SIGMA);
        let fd = (up - down) / (2.0 * h);
        assert_relative_eq!(model().rho(K, T, OptionSide::Call), fd, epsilon = 1e-5);
    }

    #[test]
    fn test_theta_is_negative_time_derivative() {
        let h = 1e-5;
        let up = put_price(S, K, R, T + h, SIGMA);
        let down = put_price(S, K, R, T - h, SIGMA);
        let fd = -(up - down) / (2.0 * h);
        assert_relative_eq!(model().theta(K, T, OptionSide::Put), fd, epsilon = 1e-5);
    }

    #[test]
    fn test_clone_and_debug() {
        let bs = model();
        let copy = bs;
        assert_eq!(copy.spot(), bs.spot());
        assert!(format!("{:?}", bs).contains("BlackScholes"));
    }
}
