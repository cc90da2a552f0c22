//! Formula chains for dynamic value calculation.
//!
//! A [`Formula`] is an ordered list of unary arithmetic steps applied
//! left-to-right to an input [`Magnitude`]. Content defines formulas once
//! (e.g. "skill multiplier = log10(skill) / 4 + 1") and evaluates them on
//! demand against live game state; the formula itself is a pure function of
//! its input, with no hidden state to go stale.
//!
//! Construction is a chaining builder in the `BonusStack` style. Malformed
//! step sequences (log with a non-positive or unit base, division by zero)
//! are caught by [`Formula::validate`] at content-load time, and
//! [`Formula::evaluate`] reports the same descriptive errors if a bad
//! definition slips through.

use crate::currency::Currency;
use crate::error::{EconomyError, ErrorSeverity};
use crate::magnitude::Magnitude;
use crate::oracle::BalanceOracle;

// ============================================================================
// Steps
// ============================================================================

/// A single unary step in a formula chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormulaStep {
    /// Add a constant.
    Add(Magnitude),
    /// Subtract a constant (signed; formula outputs may dip below zero).
    Sub(Magnitude),
    /// Multiply by a constant.
    Mul(Magnitude),
    /// Divide by a constant.
    Div(Magnitude),
    /// Raise to a constant power.
    Pow(Magnitude),
    /// Logarithm in a constant base.
    Log { base: Magnitude },
}

// ============================================================================
// Errors
// ============================================================================

/// Errors from formula validation or evaluation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    /// `log` requires a positive base other than one.
    #[error("log step requires a positive base other than 1 (got {base})")]
    InvalidLogBase { base: Magnitude },

    /// `log` of a non-positive value is undefined.
    #[error("log step applied to a non-positive value")]
    LogDomain,

    /// `div` step configured with a zero divisor.
    #[error("div step with a zero divisor")]
    DivisionByZero,

    /// `evaluate_from` called on a formula with no bound source currency.
    #[error("formula has no bound input currency")]
    MissingSource,
}

impl EconomyError for FormulaError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            // Input-dependent: a different balance may be in domain.
            Self::LogDomain => ErrorSeverity::Recoverable,
            // Content definition problems, reject at load time.
            Self::InvalidLogBase { .. } | Self::DivisionByZero | Self::MissingSource => {
                ErrorSeverity::Validation
            }
        }
    }
}

// ============================================================================
// Formula
// ============================================================================

/// An ordered chain of arithmetic steps over a scalar input.
///
/// Step order is evaluation order. Optionally bound to a source currency
/// (the live input read through a [`BalanceOracle`]) and an input cap that
/// clamps the input to `min(input, cap)` before the first step runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Formula {
    steps: Vec<FormulaStep>,
    cap: Option<Magnitude>,
    source: Option<Currency>,
}

impl Formula {
    /// Starts an empty formula (the identity function).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an `add` step (builder pattern).
    pub fn add(mut self, constant: Magnitude) -> Self {
        self.steps.push(FormulaStep::Add(constant));
        self
    }

    /// Appends a `sub` step.
    pub fn sub(mut self, constant: Magnitude) -> Self {
        self.steps.push(FormulaStep::Sub(constant));
        self
    }

    /// Appends a `mul` step.
    pub fn mul(mut self, constant: Magnitude) -> Self {
        self.steps.push(FormulaStep::Mul(constant));
        self
    }

    /// Appends a `div` step.
    pub fn div(mut self, constant: Magnitude) -> Self {
        self.steps.push(FormulaStep::Div(constant));
        self
    }

    /// Appends a `pow` step.
    pub fn pow(mut self, exponent: Magnitude) -> Self {
        self.steps.push(FormulaStep::Pow(exponent));
        self
    }

    /// Appends a `log` step. Base validity is checked by [`Formula::validate`].
    pub fn log(mut self, base: Magnitude) -> Self {
        self.steps.push(FormulaStep::Log { base });
        self
    }

    /// Clamps the input to `min(input, cap)` before evaluation.
    pub fn with_cap(mut self, cap: Magnitude) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Binds the live input to a currency total read through the oracle.
    pub fn with_source(mut self, currency: Currency) -> Self {
        self.source = Some(currency);
        self
    }

    /// The bound source currency, if any.
    pub fn source(&self) -> Option<Currency> {
        self.source
    }

    pub fn steps(&self) -> &[FormulaStep] {
        &self.steps
    }

    /// Checks the step sequence for malformed constants.
    ///
    /// Called by content loading so bad definitions fail fast instead of
    /// producing garbage at evaluation time.
    pub fn validate(&self) -> Result<(), FormulaError> {
        for step in &self.steps {
            match *step {
                FormulaStep::Div(divisor) if divisor.is_zero() => {
                    return Err(FormulaError::DivisionByZero);
                }
                FormulaStep::Log { base }
                    if base.is_zero() || base.is_negative() || base == Magnitude::ONE =>
                {
                    return Err(FormulaError::InvalidLogBase { base });
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Applies the step chain to `input`.
    ///
    /// Pure: equal inputs always produce equal outputs.
    pub fn evaluate(&self, input: Magnitude) -> Result<Magnitude, FormulaError> {
        let mut value = match self.cap {
            Some(cap) => input.min(cap),
            None => input,
        };
        for step in &self.steps {
            value = match *step {
                FormulaStep::Add(constant) => value.add(constant),
                FormulaStep::Sub(constant) => value.sub(constant),
                FormulaStep::Mul(constant) => value.mul(constant),
                FormulaStep::Div(divisor) => value
                    .checked_div(divisor)
                    .ok_or(FormulaError::DivisionByZero)?,
                FormulaStep::Pow(exponent) => value.pow(exponent.to_f64()),
                FormulaStep::Log { base } => {
                    if base.is_zero() || base.is_negative() || base == Magnitude::ONE {
                        return Err(FormulaError::InvalidLogBase { base });
                    }
                    value
                        .checked_log(base.to_f64())
                        .ok_or(FormulaError::LogDomain)?
                }
            };
        }
        Ok(value)
    }

    /// Evaluates against the live total of the bound source currency.
    pub fn evaluate_from(&self, oracle: &impl BalanceOracle) -> Result<Magnitude, FormulaError> {
        let source = self.source.ok_or(FormulaError::MissingSource)?;
        self.evaluate(oracle.balance(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::CurrencyBundle;

    #[test]
    fn steps_apply_in_order() {
        // (10 + 5) * 2 = 30, not 10 + (5 * 2)
        let formula = Formula::new()
            .add(Magnitude::from(5.0))
            .mul(Magnitude::from(2.0));
        let out = formula.evaluate(Magnitude::from(10.0)).unwrap();
        assert_eq!(out, Magnitude::from(30.0));
    }

    #[test]
    fn evaluation_is_pure() {
        let formula = Formula::new()
            .log(Magnitude::from(10.0))
            .div(Magnitude::from(4.0))
            .add(Magnitude::ONE);
        let input = Magnitude::ten_pow(12);
        assert_eq!(formula.evaluate(input), formula.evaluate(input));
    }

    #[test]
    fn cap_clamps_the_input() {
        let formula = Formula::new()
            .mul(Magnitude::from(2.0))
            .with_cap(Magnitude::from(100.0));
        // Input above the cap evaluates as if it were the cap.
        assert_eq!(
            formula.evaluate(Magnitude::ten_pow(9)).unwrap(),
            Magnitude::from(200.0)
        );
        // Input below the cap passes through untouched.
        assert_eq!(
            formula.evaluate(Magnitude::from(10.0)).unwrap(),
            Magnitude::from(20.0)
        );
    }

    #[test]
    fn validate_rejects_bad_log_base() {
        assert_eq!(
            Formula::new().log(Magnitude::ONE).validate(),
            Err(FormulaError::InvalidLogBase {
                base: Magnitude::ONE
            })
        );
        assert!(Formula::new().log(Magnitude::ZERO).validate().is_err());
        assert!(Formula::new().log(Magnitude::from(10.0)).validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_divisor() {
        assert_eq!(
            Formula::new().div(Magnitude::ZERO).validate(),
            Err(FormulaError::DivisionByZero)
        );
    }

    #[test]
    fn log_of_zero_is_a_domain_error() {
        let formula = Formula::new().log(Magnitude::from(10.0));
        assert_eq!(
            formula.evaluate(Magnitude::ZERO),
            Err(FormulaError::LogDomain)
        );
    }

    #[test]
    fn evaluate_from_reads_the_bound_currency() {
        let balances = CurrencyBundle::zero().set(Currency::Skill, Magnitude::from(1000.0));
        let formula = Formula::new()
            .log(Magnitude::from(10.0))
            .with_source(Currency::Skill);
        assert_eq!(
            formula.evaluate_from(&balances).unwrap(),
            Magnitude::from(3.0)
        );

        let unbound = Formula::new().log(Magnitude::from(10.0));
        assert_eq!(
            formula_err(unbound.evaluate_from(&balances)),
            FormulaError::MissingSource
        );
    }

    fn formula_err(result: Result<Magnitude, FormulaError>) -> FormulaError {
        result.unwrap_err()
    }

    #[cfg(feature = "serde")]
    #[test]
    fn formulas_are_serializable_content() {
        let formula = Formula::new()
            .log(Magnitude::from(10.0))
            .div(Magnitude::from(4.0))
            .add(Magnitude::ONE)
            .with_cap(Magnitude::ten_pow(30))
            .with_source(Currency::Skill);

        let json = serde_json::to_string(&formula).unwrap();
        let back: Formula = serde_json::from_str(&json).unwrap();
        assert_eq!(formula, back);
        assert_eq!(
            back.evaluate(Magnitude::from(100.0)),
            formula.evaluate(Magnitude::from(100.0))
        );
    }
}
