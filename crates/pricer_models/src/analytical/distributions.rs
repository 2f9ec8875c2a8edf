//! Standard normal distribution functions.
//!
//! This module provides AD-compatible implementations of:
//! - `norm_cdf`: Cumulative distribution function (CDF)
//! - `norm_pdf`: Probability density function (PDF)
//!
//! Both are generic over [`Scalar`], so they work on `f64` and on the dual
//! numbers used for automatic differentiation.

use pricer_core::types::Scalar;

/// Square root of 2.
const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Φ(x) for `f64`, through `libm::erfc` for full double precision.
///
/// `erfc(-x/√2)/2` avoids the cancellation of `(1 + erf(x/√2))/2` in the
/// lower tail.
#[inline]
pub fn norm_cdf_f64(x: f64) -> f64 {
    0.5 * libm::erfc(-x / SQRT_2)
}

/// φ(x) for `f64`.
#[inline]
pub fn norm_pdf_f64(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal cumulative distribution function.
///
/// Computes P(X <= x) where X ~ N(0, 1).
///
/// # Mathematical Definition
/// Φ(x) = (1 + erf(x/√2)) / 2
///
/// # AD Compatibility
/// The value comes from [`norm_cdf_f64`]. Derivatives are carried by the
/// Taylor expansion around the real part
///
/// Φ(x₀ + δ) = Φ(x₀) + φ(x₀)δ − x₀φ(x₀)δ²/2 + (x₀² − 1)φ(x₀)δ³/6
///
/// which is exact for dual numbers of order up to three.
///
/// At ±∞ the result saturates to 0 or 1 with zero derivative, so a
/// degenerate `d1` (zero volatility or zero time) yields a finite price.
///
/// # Examples
/// ```
/// use pricer_models::analytical::norm_cdf;
///
/// assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-15);
/// assert_eq!(norm_cdf(f64::NEG_INFINITY), 0.0);
/// assert_eq!(norm_cdf(f64::INFINITY), 1.0);
/// ```
#[inline]
pub fn norm_cdf<T: Scalar>(x: T) -> T {
    let x0 = x.re();
    let cdf = norm_cdf_f64(x0);
    if !x0.is_finite() {
        return <T as From<f64>>::from(cdf);
    }

    let pdf = norm_pdf_f64(x0);
    let dx = x - x0;
    // Horner form of the cubic Taylor polynomial
    let c1 = pdf;
    let c2 = -0.5 * x0 * pdf;
    let c3 = (x0 * x0 - 1.0) * pdf / 6.0;
    dx * (dx * (dx * c3 + c2) + c1) + cdf
}

/// Standard normal probability density function.
///
/// # Mathematical Definition
/// φ(x) = exp(-x²/2) / √(2π)
///
/// # Examples
/// ```
/// use pricer_models::analytical::norm_pdf;
///
/// assert!((norm_pdf(0.0_f64) - 0.398_942_280_401_432_7).abs() < 1e-15);
/// ```
#[inline]
pub fn norm_pdf<T: Scalar>(x: T) -> T {
    (x * x * -0.5).exp() * FRAC_1_SQRT_2PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::types::{DualNumber, HyperDualNumber};

    // ========================================
    // Value Tests
    // ========================================

    #[test]
    fn test_norm_cdf_reference_values() {
        assert_relative_eq!(norm_cdf(0.0_f64), 0.5, epsilon = 1e-15);
        assert_relative_eq!(norm_cdf(1.0_f64), 0.841_344_746_068_542_9, epsilon = 1e-15);
        assert_relative_eq!(norm_cdf(-1.0_f64), 0.158_655_253_931_457_05, epsilon = 1e-15);
        assert_relative_eq!(norm_cdf(1.96_f64), 0.975_002_104_851_780_0, epsilon = 1e-14);
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        for &x in &[0.1, 0.5, 1.3, 2.7, 5.0] {
            assert_relative_eq!(norm_cdf(x) + norm_cdf(-x), 1.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_norm_cdf_lower_tail_keeps_precision() {
        // Φ(-10) ≈ 7.62e-24, lost entirely by 1 + erf
        let tail = norm_cdf(-10.0_f64);
        assert!(tail > 0.0);
        assert_relative_eq!(tail, 7.619_853_024_160_527e-24, max_relative = 1e-12);
    }

    #[test]
    fn test_norm_cdf_saturates_at_infinity() {
        assert_eq!(norm_cdf(f64::NEG_INFINITY), 0.0);
        assert_eq!(norm_cdf(f64::INFINITY), 1.0);
        assert!(norm_cdf(f64::NAN).is_nan());
    }

    #[test]
    fn test_norm_pdf_values() {
        assert_relative_eq!(norm_pdf(0.0_f64), FRAC_1_SQRT_2PI, epsilon = 1e-16);
        assert_relative_eq!(norm_pdf(1.0_f64), 0.241_970_724_519_143_37, epsilon = 1e-15);
        assert_eq!(norm_pdf(f64::INFINITY), 0.0);
    }

    // ========================================
    // Derivative Tests
    // ========================================

    #[test]
    fn test_norm_cdf_first_derivative_is_pdf() {
        for &x in &[-3.0, -0.7, 0.0, 0.4, 2.2] {
            let y = norm_cdf(DualNumber::new(x, 1.0));
            assert_relative_eq!(y.re, norm_cdf(x), epsilon = 1e-16);
            assert_relative_eq!(y.eps, norm_pdf(x), epsilon = 1e-16);
        }
    }

    #[test]
    fn test_norm_cdf_second_derivative() {
        // Φ'' = -x φ(x)
        for &x in &[-2.0, -0.3, 0.0, 1.1] {
            let y = norm_cdf(HyperDualNumber::new(x, 1.0, 0.0));
            assert_relative_eq!(y.v1, norm_pdf(x), epsilon = 1e-16);
            assert_relative_eq!(y.v2, -x * norm_pdf(x), epsilon = 1e-16);
        }
    }

    #[test]
    fn test_norm_cdf_chain_rule() {
        // d/dx Φ(2x + 1) = 2 φ(2x + 1)
        let x = DualNumber::new(0.3, 1.0);
        let y = norm_cdf(x * 2.0 + 1.0);
        assert_relative_eq!(y.eps, 2.0 * norm_pdf(1.6_f64), epsilon = 1e-15);
    }

    #[test]
    fn test_norm_cdf_infinite_argument_has_zero_derivative() {
        let y = norm_cdf(DualNumber::new(f64::NEG_INFINITY, f64::NAN));
        assert_eq!(y.re, 0.0);
        assert_eq!(y.eps, 0.0);
    }

    #[test]
    fn test_norm_pdf_derivative() {
        // φ' = -x φ
        let x = 0.8;
        let y = norm_pdf(DualNumber::new(x, 1.0));
        assert_relative_eq!(y.eps, -x * norm_pdf(x), epsilon = 1e-15);
    }
}
