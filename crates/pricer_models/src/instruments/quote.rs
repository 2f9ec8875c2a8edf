//! Observed option quotes.

use std::fmt;

use crate::analytical::AnalyticalError;

/// Side of a vanilla European option.
///
/// # Examples
/// ```
/// use pricer_models::instruments::OptionSide;
///
/// assert!(OptionSide::Call.is_call());
/// assert!(!OptionSide::Put.is_call());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionSide {
    /// Right to buy at the strike.
    Call,
    /// Right to sell at the strike.
    Put,
}

impl OptionSide {
    /// Returns whether this is a call.
    #[inline]
    pub fn is_call(self) -> bool {
        matches!(self, OptionSide::Call)
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSide::Call => f.write_str("call"),
            OptionSide::Put => f.write_str("put"),
        }
    }
}

/// Market inputs for one implied-volatility request.
///
/// Immutable once built. Pricing and solving accept any values; call
/// [`Quote::validate`] to reject out-of-domain inputs up front.
///
/// # Examples
/// ```
/// use pricer_models::instruments::{OptionSide, Quote};
///
/// let quote = Quote::new(100.0, 110.0, 0.05, 1.0, 6.04, OptionSide::Call);
/// assert!(quote.validate().is_ok());
/// assert_eq!(quote.moneyness(), 100.0 / 110.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quote {
    /// Spot price S.
    pub spot: f64,
    /// Strike K.
    pub strike: f64,
    /// Continuously compounded risk-free rate r.
    pub rate: f64,
    /// Time to expiry t in years.
    pub expiry: f64,
    /// Observed option price.
    pub price: f64,
    /// Call or put.
    pub side: OptionSide,
}

impl Quote {
    /// Create a quote.
    pub fn new(spot: f64, strike: f64, rate: f64, expiry: f64, price: f64, side: OptionSide) -> Self {
        Self {
            spot,
            strike,
            rate,
            expiry,
            price,
            side,
        }
    }

    /// Call quote.
    pub fn call(spot: f64, strike: f64, rate: f64, expiry: f64, price: f64) -> Self {
        Self::new(spot, strike, rate, expiry, price, OptionSide::Call)
    }

    /// Put quote.
    pub fn put(spot: f64, strike: f64, rate: f64, expiry: f64, price: f64) -> Self {
        Self::new(spot, strike, rate, expiry, price, OptionSide::Put)
    }

    /// Spot over strike.
    #[inline]
    pub fn moneyness(&self) -> f64 {
        self.spot / self.strike
    }

    /// Same market inputs with a different observed price.
    pub fn with_price(self, price: f64) -> Self {
        Self { price, ..self }
    }

    /// Check S > 0, K > 0, t > 0, finite r and price ≥ 0.
    ///
    /// # Errors
    /// The first offending field, as an [`AnalyticalError`].
    pub fn validate(&self) -> Result<(), AnalyticalError> {
        if !(self.spot.is_finite() && self.spot > 0.0) {
            return Err(AnalyticalError::InvalidSpot { spot: self.spot });
        }
        if !(self.strike.is_finite() && self.strike > 0.0) {
            return Err(AnalyticalError::InvalidStrike {
                strike: self.strike,
            });
        }
        if !self.rate.is_finite() {
            return Err(AnalyticalError::InvalidRate { rate: self.rate });
        }
        if !(self.expiry.is_finite() && self.expiry > 0.0) {
            return Err(AnalyticalError::InvalidExpiry {
                expiry: self.expiry,
            });
        }
        if !(self.price.is_finite() && self.price >= 0.0) {
            return Err(AnalyticalError::InvalidPrice { price: self.price });
        }
        Ok(())
    }
}
