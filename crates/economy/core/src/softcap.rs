//! Threshold-gated diminishing-returns curves.
//!
//! A [`Softcap`] pairs a threshold balance with a curve shape. Below the
//! threshold it is inert; at and above it, the curve yields a dampening
//! coefficient. Both curve shapes evaluate to exactly 1 at the threshold,
//! so the effective value is continuous as a balance crosses it.

use crate::magnitude::Magnitude;

/// Curve shape of a softcap.
///
/// Both shapes derive their coefficient from the ratio
/// `(balance / threshold) ^ exponent`; they differ in how the coefficient
/// is folded into the dampened value.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SoftcapCurve {
    /// Divide the value by the coefficient.
    Divisor { exponent: f64 },
    /// Raise the value to `1 / coefficient`.
    RecipPow { exponent: f64 },
}

/// A threshold plus a dampening curve for one currency.
///
/// Thresholds must be positive; a zero threshold leaves the softcap inert.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Softcap {
    threshold: Magnitude,
    curve: SoftcapCurve,
}

impl Softcap {
    pub fn new(threshold: Magnitude, curve: SoftcapCurve) -> Self {
        Self { threshold, curve }
    }

    pub fn threshold(&self) -> Magnitude {
        self.threshold
    }

    pub fn curve(&self) -> SoftcapCurve {
        self.curve
    }

    /// Evaluates the softcap against a balance.
    ///
    /// Returns `(None, threshold)` when the balance is below the threshold
    /// (no dampening), otherwise `(Some(coefficient), threshold)`.
    pub fn apply(&self, balance: Magnitude) -> (Option<Magnitude>, Magnitude) {
        if self.threshold.is_zero() || balance < self.threshold {
            return (None, self.threshold);
        }
        let ratio = balance.div(self.threshold);
        let exponent = match self.curve {
            SoftcapCurve::Divisor { exponent } | SoftcapCurve::RecipPow { exponent } => exponent,
        };
        (Some(ratio.pow(exponent)), self.threshold)
    }

    /// Folds every registered softcap for a currency into `value`.
    ///
    /// Softcaps apply in slice order, which callers must keep equal to
    /// registration order - stacking a divisor cap before a recip-pow cap
    /// is not the same as the reverse.
    pub fn apply_all(balance: Magnitude, value: Magnitude, softcaps: &[Softcap]) -> Magnitude {
        softcaps.iter().fold(value, |dampened, softcap| {
            let (coefficient, _) = softcap.apply(balance);
            let Some(coefficient) = coefficient else {
                return dampened;
            };
            match softcap.curve {
                SoftcapCurve::Divisor { .. } => dampened.div(coefficient),
                SoftcapCurve::RecipPow { .. } => {
                    let reciprocal = coefficient.to_f64();
                    if reciprocal > 0.0 {
                        dampened.pow(1.0 / reciprocal)
                    } else {
                        dampened
                    }
                }
            }
        })
    }
}
