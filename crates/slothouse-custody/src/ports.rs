//! External custody primitives consumed by the engine.
//!
//! Implementations must be atomic per call and fail loudly: a transfer either
//! happens in full or returns an error and changes nothing.

use rust_decimal::Decimal;
use slothouse_types::{AccountId, AuctionError, Currency, ItemRef, Result};

/// Moves fungible funds between identities and the engine's custody.
pub trait FundsCustody {
    /// Move `amount` from `from` into custody. For tokens this consumes the
    /// allowance `from` granted the engine.
    fn pull(&mut self, currency: Currency, from: AccountId, amount: Decimal) -> Result<()>;

    /// Move `amount` out of custody to `to`.
    fn push(&mut self, currency: Currency, to: AccountId, amount: Decimal) -> Result<()>;

    /// Funds currently held in custody for `currency`.
    fn held(&self, currency: Currency) -> Decimal;

    /// Push every payout or none.
    ///
    /// The default checks the total against [`held`](Self::held) and then
    /// pushes in order. Adapters whose individual pushes can fail must
    /// override this to stay atomic.
    fn push_all(&mut self, currency: Currency, payouts: &[(AccountId, Decimal)]) -> Result<()> {
        let total = payout_total(payouts)?;
        let held = self.held(currency);
        if total > held {
            return Err(AuctionError::CustodyFailed {
                reason: format!("batch payout {total} exceeds custody {held} for {currency}"),
            });
        }
        for (to, amount) in payouts {
            self.push(currency, *to, *amount)?;
        }
        Ok(())
    }
}

/// Checked sum of a payout batch.
///
/// # Errors
/// `ArithmeticOverflow` if the total does not fit.
pub fn payout_total(payouts: &[(AccountId, Decimal)]) -> Result<Decimal> {
    payouts.iter().try_fold(Decimal::ZERO, |total, (_, amount)| {
        total
            .checked_add(*amount)
            .ok_or(AuctionError::ArithmeticOverflow)
    })
}

/// Moves indivisible items between identities and the engine's custody.
pub trait ItemCustody {
    /// Take `item` from `from` into custody.
    fn hold_item(&mut self, item: ItemRef, from: AccountId) -> Result<()>;

    /// Release a held `item` to `to`.
    fn release_item(&mut self, item: ItemRef, to: AccountId) -> Result<()>;
}
