//! Property-based checks of the Black-Scholes pricer.

use approx::assert_relative_eq;
use pricer_models::analytical::{call_price, put_price, BlackScholes};
use pricer_models::instruments::OptionSide;
use proptest::prelude::*;

// ========================================
// Parity
// ========================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_put_call_parity(
        spot in 70.0_f64..130.0,
        strike in 50.0_f64..120.0,
        rate in 0.0_f64..0.1,
        expiry in 0.1_f64..5.1,
        vol in 0.01_f64..0.4,
    ) {
        let call = call_price(spot, strike, rate, expiry, vol);
        let put = put_price(spot, strike, rate, expiry, vol);
        let forward = spot - strike * (-rate * expiry).exp();
        prop_assert!((call - put - forward).abs() < 1e-9);
    }

    #[test]
    fn prop_delta_parity(
        spot in 70.0_f64..130.0,
        strike in 50.0_f64..120.0,
        rate in 0.0_f64..0.1,
        expiry in 0.1_f64..5.1,
        vol in 0.01_f64..0.4,
    ) {
        let bs = BlackScholes::new(spot, rate, vol).unwrap();
        let diff = bs.delta(strike, expiry, OptionSide::Call) - bs.delta(strike, expiry, OptionSide::Put);
        prop_assert!((diff - 1.0).abs() < 1e-12);
    }

    #[test]
    fn prop_prices_within_no_arbitrage_bounds(
        spot in 70.0_f64..130.0,
        strike in 50.0_f64..120.0,
        rate in 0.0_f64..0.1,
        expiry in 0.1_f64..5.1,
        vol in 0.01_f64..0.4,
    ) {
        let discounted = strike * (-rate * expiry).exp();
        let call = call_price(spot, strike, rate, expiry, vol);
        let put = put_price(spot, strike, rate, expiry, vol);
        prop_assert!(call >= (spot - discounted).max(0.0) - 1e-9);
        prop_assert!(call <= spot + 1e-9);
        prop_assert!(put >= (discounted - spot).max(0.0) - 1e-9);
        prop_assert!(put <= discounted + 1e-9);
    }

    #[test]
    fn prop_price_increases_with_volatility(
        strike in 80.0_f64..120.0,
        vol in 0.05_f64..0.4,
    ) {
        let low = call_price(100.0, strike, 0.02, 1.0, vol);
        let high = call_price(100.0, strike, 0.02, 1.0, vol + 0.05);
        prop_assert!(high > low);
    }
}

// ========================================
// Fixed points
// ========================================

#[test]
fn test_atm_forward_call_equals_put() {
    // K = S·e^(rT) makes the forward at-the-money
    let (spot, rate, expiry) = (100.0_f64, 0.04_f64, 2.0_f64);
    let strike = spot * (rate * expiry).exp();
    let call = call_price(spot, strike, rate, expiry, 0.3);
    let put = put_price(spot, strike, rate, expiry, 0.3);
    assert_relative_eq!(call, put, epsilon = 1e-10);
}
