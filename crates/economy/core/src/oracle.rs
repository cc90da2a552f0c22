//! Read-only access to live currency state.

use crate::currency::Currency;
use crate::magnitude::Magnitude;

/// Read accessor exposed by the currency-state collaborator.
///
/// Formulas bound to a source currency pull their input through this trait
/// (the "X-provider" seam), so content definitions stay pure while the host
/// decides where balances actually live.
pub trait BalanceOracle {
    /// Current total of a currency. Unknown balances read as zero.
    fn balance(&self, currency: Currency) -> Magnitude;
}

impl BalanceOracle for crate::bundle::CurrencyBundle {
    fn balance(&self, currency: Currency) -> Magnitude {
        self.get(currency)
    }
}
