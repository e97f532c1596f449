//! Royalty reserve: per-currency accumulator of platform fees.
//!
//! Credited by auction-level distributions, drained in full by an explicit
//! withdrawal. Exact decimal arithmetic throughout.

use std::collections::HashMap;

use rust_decimal::Decimal;
use slothouse_types::{AuctionError, Currency, Result};

pub struct RoyaltyReserve {
    balances: HashMap<Currency, Decimal>,
}

impl RoyaltyReserve {
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    pub fn credit(&mut self, currency: Currency, amount: Decimal) -> Result<()> {
        let entry = self.balances.entry(currency).or_insert(Decimal::ZERO);
        *entry = entry
            .checked_add(amount)
            .ok_or(AuctionError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Undo a credit whose surrounding distribution failed.
    pub fn debit(&mut self, currency: Currency, amount: Decimal) {
        if let Some(entry) = self.balances.get_mut(&currency) {
            let take = amount.min(*entry);
            *entry -= take;
        }
    }

    /// Zero the reserve for `currency` and return what it held.
    ///
    /// # Errors
    /// `ZeroAmount` if the reserve is empty.
    pub fn drain(&mut self, currency: Currency) -> Result<Decimal> {
        let entry = self
            .balances
            .get_mut(&currency)
            .filter(|b| !b.is_zero())
            .ok_or(AuctionError::ZeroAmount)?;
        let amount = *entry;
        *entry = Decimal::ZERO;
        Ok(amount)
    }

    #[must_use]
    pub fn balance(&self, currency: Currency) -> Decimal {
        self.balances.get(&currency).copied().unwrap_or(Decimal::ZERO)
    }
}

impl Default for RoyaltyReserve {
    fn default() -> Self {
        Self::new()
    }
}
