//! Payment amounts and oracle prices

use serde::{Deserialize, Serialize};

/// Payment amount in micro-units
pub type Amount = u64;

/// Rent price quoted by the price oracle
///
/// `base` covers the duration-proportional rent; `premium` is any surcharge
/// the oracle applies on top (short labels, recently released names).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub base: Amount,
    pub premium: Amount,
}

impl Price {
    /// Create a new price
    pub fn new(base: Amount, premium: Amount) -> Self {
        Self { base, premium }
    }

    /// Total amount due
    pub fn total(&self) -> Amount {
        self.base.saturating_add(self.premium)
    }
}
