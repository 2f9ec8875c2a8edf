//! Residual `f(σ) = model(σ) − observed` for one quote.

use pricer_core::math::differentiation::{
    AutoDiff, DerivativeOrder, DerivativeProvider, DifferentiableValue, FiniteDifference,
    ScalarFunction,
};
use pricer_core::math::solvers::Objective;
use pricer_core::types::Scalar;
use pricer_models::analytical::{price, BlackScholes};
use pricer_models::instruments::Quote;

/// How the objective differentiates the model with respect to σ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DerivativeMethod {
    /// Forward-mode dual numbers.
    #[default]
    AutoDiff,
    /// Closed-form vega and volga.
    Analytic,
    /// Central finite differences.
    FiniteDifference,
}

/// Black-Scholes price minus the observed price, as a function of σ.
///
/// # Examples
///
/// ```
/// use pricer_core::math::differentiation::DerivativeOrder;
/// use pricer_core::math::solvers::Objective;
/// use pricer_models::instruments::Quote;
/// use pricer_optimiser::implied_vol::ImpliedVolObjective;
///
/// let quote = Quote::call(100.0, 110.0, 0.05, 1.0, 6.040_088_129_724);
/// let objective = ImpliedVolObjective::new(quote);
///
/// let at_root = objective.evaluate(0.2, DerivativeOrder::First);
/// assert!(at_root.value.abs() < 1e-9);
/// assert!((at_root.grad.unwrap() - 39.576).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpliedVolObjective {
    quote: Quote,
    method: DerivativeMethod,
}

impl ImpliedVolObjective {
    /// Objective differentiated with [`DerivativeMethod::AutoDiff`].
    pub fn new(quote: Quote) -> Self {
        Self::with_method(quote, DerivativeMethod::AutoDiff)
    }

    /// Objective with an explicit derivative method.
    pub fn with_method(quote: Quote, method: DerivativeMethod) -> Self {
        Self { quote, method }
    }

    /// The quote being inverted.
    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    /// The derivative method in use.
    pub fn method(&self) -> DerivativeMethod {
        self.method
    }

    fn analytic(&self, volatility: f64, order: DerivativeOrder) -> DifferentiableValue {
        let q = &self.quote;
        let value = self.call(volatility);
        if order == DerivativeOrder::Value {
            return DifferentiableValue::value_only(value);
        }

        // Solver iterates are not always positive, so only the market is validated.
        let model = BlackScholes::new(q.spot, q.rate, 1.0)
            .ok()
            .map(|model| model.with_volatility(volatility));
        let vega = model.map_or(f64::NAN, |m| m.vega(q.strike, q.expiry));
        if order == DerivativeOrder::First {
            return DifferentiableValue::with_grad(value, vega);
        }

        let volga = model.map_or(f64::NAN, |m| m.volga(q.strike, q.expiry));
        DifferentiableValue::with_hessian(value, vega, volga)
    }
}

impl ScalarFunction for ImpliedVolObjective {
    fn call<D: Scalar>(&self, volatility: D) -> D {
        let q = &self.quote;
        let c = |x: f64| <D as From<f64>>::from(x);
        price(q.side, c(q.spot), c(q.strike), c(q.rate), c(q.expiry), volatility) - q.price
    }
}

impl Objective for ImpliedVolObjective {
    fn evaluate(&self, x: f64, order: DerivativeOrder) -> DifferentiableValue {
        match self.method {
            DerivativeMethod::AutoDiff => AutoDiff.evaluate(self, x, order),
            DerivativeMethod::Analytic => self.analytic(x, order),
            DerivativeMethod::FiniteDifference => FiniteDifference.evaluate(self, x, order),
        }
    }

    fn value(&self, x: f64) -> f64 {
        self.call(x)
    }
}
