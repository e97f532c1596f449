//! Funds conservation invariant checker.
//!
//! Invariant enforced per currency:
//! ```text
//! Σ(pulled) - Σ(pushed) == Σ(outstanding bid balances)
//!                        + Σ(undistributed residual pools)
//!                        + royalty reserve
//! ```
//!
//! The left side is what custody should hold; the right side is what the
//! engine still owes. A mismatch means money was created or lost.

use std::collections::HashMap;

use rust_decimal::Decimal;
use slothouse_types::{AuctionError, Currency, Result};

pub struct FundsConservation {
    inflows: HashMap<Currency, Decimal>,
    outflows: HashMap<Currency, Decimal>,
}

impl FundsConservation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inflows: HashMap::new(),
            outflows: HashMap::new(),
        }
    }

    /// Record funds about to be pulled into custody.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if the running total would overflow; nothing is
    /// recorded in that case.
    pub fn record_inflow(&mut self, currency: Currency, amount: Decimal) -> Result<()> {
        add_checked(&mut self.inflows, currency, amount)
    }

    /// Record funds about to be pushed out of custody.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if the running total would overflow.
    pub fn record_outflow(&mut self, currency: Currency, amount: Decimal) -> Result<()> {
        add_checked(&mut self.outflows, currency, amount)
    }

    /// Undo [`record_inflow`](Self::record_inflow) after the pull failed.
    pub fn revert_inflow(&mut self, currency: Currency, amount: Decimal) {
        sub_saturating(&mut self.inflows, currency, amount);
    }

    /// Undo [`record_outflow`](Self::record_outflow) after the push failed.
    pub fn revert_outflow(&mut self, currency: Currency, amount: Decimal) {
        sub_saturating(&mut self.outflows, currency, amount);
    }

    #[must_use]
    pub fn total_inflow(&self, currency: Currency) -> Decimal {
        self.inflows.get(&currency).copied().unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn total_outflow(&self, currency: Currency) -> Decimal {
        self.outflows.get(&currency).copied().unwrap_or(Decimal::ZERO)
    }

    /// Inflows minus outflows.
    #[must_use]
    pub fn expected_held(&self, currency: Currency) -> Decimal {
        self.total_inflow(currency) - self.total_outflow(currency)
    }

    /// Verify that `liabilities` equals what custody should hold.
    ///
    /// # Errors
    /// [`AuctionError::ConservationViolation`] on mismatch.
    pub fn verify(&self, currency: Currency, liabilities: Decimal) -> Result<()> {
        let expected = self.expected_held(currency);
        if liabilities != expected {
            tracing::error!(
                currency = %currency,
                %liabilities,
                %expected,
                "funds conservation violated"
            );
            return Err(AuctionError::ConservationViolation {
                reason: format!(
                    "{currency}: liabilities {liabilities} != held {expected} \
                     (inflow={}, outflow={})",
                    self.total_inflow(currency),
                    self.total_outflow(currency),
                ),
            });
        }
        Ok(())
    }

    /// Every currency that has seen an inflow or outflow.
    #[must_use]
    pub fn tracked_currencies(&self) -> Vec<Currency> {
        let mut currencies: Vec<Currency> = self.inflows.keys().copied().collect();
        currencies.extend(self.outflows.keys().filter(|c| !self.inflows.contains_key(*c)));
        currencies.sort();
        currencies
    }
}

fn add_checked(
    totals: &mut HashMap<Currency, Decimal>,
    currency: Currency,
    amount: Decimal,
) -> Result<()> {
    let total = totals.entry(currency).or_insert(Decimal::ZERO);
    *total = total
        .checked_add(amount)
        .ok_or(AuctionError::ArithmeticOverflow)?;
    Ok(())
}

fn sub_saturating(totals: &mut HashMap<Currency, Decimal>, currency: Currency, amount: Decimal) {
    if let Some(total) = totals.get_mut(&currency) {
        *total = total.saturating_sub(amount).max(Decimal::ZERO);
    }
}

impl Default for FundsConservation {
    fn default() -> Self {
        Self::new()
    }
}
