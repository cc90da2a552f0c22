//! Multi-currency quantity bundles.
//!
//! A [`CurrencyBundle`] is a sparse map from [`Currency`] to [`Magnitude`]:
//! an absent currency reads as zero, and every operation returns a new
//! bundle (value semantics - call sites never observe aliased mutation).
//!
//! Identity conventions for bundle-level algebra:
//! - `add`/`sub`: a key missing from the other side contributes zero.
//! - `mul`/`pow` by a bundle: a key missing from the right-hand side is the
//!   identity (1), leaving the left value unchanged.

use std::collections::BTreeMap;

use crate::currency::Currency;
use crate::magnitude::Magnitude;

/// Sparse mapping of currency to quantity.
///
/// Zero amounts are pruned on every operation, so "absent" and "zero" are
/// the same observable state and iteration only visits meaningful entries.
/// Iteration order is the canonical [`Currency`] order (BTreeMap), which
/// keeps aggregate evaluation deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct CurrencyBundle {
    amounts: BTreeMap<Currency, Magnitude>,
}

impl CurrencyBundle {
    /// The empty (all-zero) bundle, the additive identity.
    pub fn zero() -> Self {
        Self::default()
    }

    /// A bundle holding 1 of every known currency, the multiplicative
    /// identity for boost aggregation.
    pub fn ones() -> Self {
        Currency::all()
            .into_iter()
            .map(|currency| (currency, Magnitude::ONE))
            .collect()
    }

    /// Amount of a currency; zero if absent.
    pub fn get(&self, currency: Currency) -> Magnitude {
        self.amounts
            .get(&currency)
            .copied()
            .unwrap_or(Magnitude::ZERO)
    }

    /// True when the bundle holds a non-zero amount of `currency`.
    pub fn contains(&self, currency: Currency) -> bool {
        self.amounts.contains_key(&currency)
    }

    /// Returns a new bundle with `currency` set to `amount`.
    ///
    /// Setting zero removes the entry, preserving the sparse invariant.
    pub fn set(mut self, currency: Currency, amount: Magnitude) -> Self {
        if amount.is_zero() {
            self.amounts.remove(&currency);
        } else {
            self.amounts.insert(currency, amount);
        }
        self
    }

    /// Per-currency sum.
    pub fn add(&self, rhs: &Self) -> Self {
        let mut amounts = self.amounts.clone();
        for (&currency, &amount) in &rhs.amounts {
            let combined = self.get(currency).add(amount);
            if combined.is_zero() {
                amounts.remove(&currency);
            } else {
                amounts.insert(currency, combined);
            }
        }
        Self { amounts }
    }

    /// Per-currency subtraction, saturating at zero.
    ///
    /// Currency balances never go negative; subtracting more than is held
    /// empties the entry (see `Magnitude::saturating_sub`).
    pub fn sub(&self, rhs: &Self) -> Self {
        let mut amounts = self.amounts.clone();
        for (&currency, &amount) in &rhs.amounts {
            let remaining = self.get(currency).saturating_sub(amount);
            if remaining.is_zero() {
                amounts.remove(&currency);
            } else {
                amounts.insert(currency, remaining);
            }
        }
        Self { amounts }
    }

    /// Multiplies every amount by a scalar.
    pub fn scale(&self, factor: Magnitude) -> Self {
        self.amounts
            .iter()
            .map(|(&currency, &amount)| (currency, amount.mul(factor)))
            .collect()
    }

    /// Per-currency product. A currency missing from `rhs` multiplies by 1;
    /// a currency missing from `self` stays zero (absent).
    pub fn mul(&self, rhs: &Self) -> Self {
        self.amounts
            .iter()
            .map(|(&currency, &amount)| {
                let factor = rhs
                    .amounts
                    .get(&currency)
                    .copied()
                    .unwrap_or(Magnitude::ONE);
                (currency, amount.mul(factor))
            })
            .collect()
    }

    /// Raises each amount to the matching exponent. A currency missing from
    /// `exponents` is left unchanged (exponent 1).
    pub fn pow(&self, exponents: &Self) -> Self {
        self.amounts
            .iter()
            .map(|(&currency, &amount)| match exponents.amounts.get(&currency) {
                Some(exponent) => (currency, amount.pow(exponent.to_f64())),
                None => (currency, amount),
            })
            .collect()
    }

    /// Iterates non-zero entries in canonical currency order.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, Magnitude)> + '_ {
        self.amounts
            .iter()
            .map(|(&currency, &amount)| (currency, amount))
    }

    /// True when every currency reads as zero.
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Number of non-zero entries.
    pub fn len(&self) -> usize {
        self.amounts.len()
    }
}

impl FromIterator<(Currency, Magnitude)> for CurrencyBundle {
    fn from_iter<I: IntoIterator<Item = (Currency, Magnitude)>>(iter: I) -> Self {
        let amounts = iter
            .into_iter()
            .filter(|(_, amount)| !amount.is_zero())
            .collect();
        Self { amounts }
    }
}
