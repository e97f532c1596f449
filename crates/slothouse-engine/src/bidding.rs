//! Bidding engine: cumulative bids with anti-snipe extension.
//!
//! ## Bid Flow
//!
//! ```text
//! exists → canceled → started → not ended → amount → currency
//!        → credit balance → record inflow → extend deadline → pull funds → event
//! ```
//!
//! The balance, the inflow and the deadline change before funds are pulled.
//! A failed step puts back everything before it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use slothouse_custody::{FundsCustody, ItemCustody};
use slothouse_settlement::RoyaltyRegistry;
use slothouse_types::{
    AccountId, AuctionError, AuctionEvent, AuctionId, ContractAddress, Currency, Result,
};

use crate::{AuctionHouse, clock::Clock};

/// Funds attached to a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidPayment {
    /// Value carried by the call itself.
    Native { value: Decimal },
    /// Pulled from the bidder's allowance for `token`.
    Token { token: ContractAddress, amount: Decimal },
}

impl BidPayment {
    #[must_use]
    pub fn amount(&self) -> Decimal {
        match self {
            Self::Native { value } => *value,
            Self::Token { amount, .. } => *amount,
        }
    }

    #[must_use]
    pub fn currency(&self) -> Currency {
        match self {
            Self::Native { .. } => Currency::Native,
            Self::Token { token, .. } => Currency::Token(*token),
        }
    }
}

/// Outcome of an accepted bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidReceipt {
    /// Bidder's cumulative balance after the bid.
    pub balance: Decimal,
    /// New deadline when the bid triggered an extension.
    pub extended_to: Option<chrono::DateTime<chrono::Utc>>,
}

fn validate_amount(amount: Decimal) -> Result<()> {
    if amount.is_zero() {
        return Err(AuctionError::ZeroAmount);
    }
    if amount.is_sign_negative() || !amount.fract().is_zero() {
        return Err(AuctionError::InvalidAmount(amount));
    }
    Ok(())
}

impl<E, R, C> AuctionHouse<E, R, C>
where
    E: FundsCustody + ItemCustody,
    R: RoyaltyRegistry,
    C: Clock,
{
    /// Add `payment` to the caller's cumulative balance in auction `id`.
    ///
    /// A bid inside the last `extension` of the window pushes the deadline
    /// out according to the configured [`ExtensionPolicy`](slothouse_types::ExtensionPolicy).
    ///
    /// # Errors
    /// `AuctionCanceled`, `AuctionNotStarted`, `AuctionEnded`, `ZeroAmount`,
    /// `InvalidAmount`, `WrongCurrency`, plus whatever the custody pull
    /// reports (`AllowanceTooLow`, `InsufficientFunds`).
    pub fn bid(
        &mut self,
        caller: AccountId,
        id: AuctionId,
        payment: BidPayment,
    ) -> Result<BidReceipt> {
        let now = self.clock.now();
        let policy = self.config.extension_policy;
        let auction = self.registry.get_mut(id)?;

        if auction.canceled {
            return Err(AuctionError::AuctionCanceled(id));
        }
        if !auction.window.has_started(now) {
            return Err(AuctionError::AuctionNotStarted(id));
        }
        if auction.finalized || auction.window.has_ended(now) {
            return Err(AuctionError::AuctionEnded(id));
        }
        let amount = payment.amount();
        validate_amount(amount)?;
        let currency = auction.currency;
        if payment.currency() != currency {
            return Err(AuctionError::WrongCurrency {
                expected: currency.to_string(),
                got: payment.currency().to_string(),
            });
        }
        let old_end = auction.window.end;
        let new_end = auction
            .window
            .extended_end(now, policy)?
            .filter(|end| *end > old_end);

        // Mutate, then pull.
        let previous = self.ledger.credit(id, caller, amount)?;
        if let Err(e) = self.conservation.record_inflow(currency, amount) {
            self.ledger.restore(id, caller, previous);
            tracing::warn!(auction = %id, bidder = %caller, %amount, error = %e, "bid rejected");
            return Err(e);
        }
        if let Some(end) = new_end {
            auction.window.end = end;
        }
        if let Err(e) = self.custody.pull(currency, caller, amount) {
            auction.window.end = old_end;
            self.conservation.revert_inflow(currency, amount);
            self.ledger.restore(id, caller, previous);
            tracing::warn!(auction = %id, bidder = %caller, %amount, error = %e, "bid reverted");
            return Err(e);
        }

        let balance = self.ledger.balance(id, caller);
        tracing::debug!(auction = %id, bidder = %caller, %amount, %balance, "bid accepted");
        match new_end {
            Some(end) => {
                tracing::info!(auction = %id, bidder = %caller, new_end = %end, "auction extended");
                self.emit(AuctionEvent::AuctionExtended {
                    auction: id,
                    bidder: caller,
                    amount,
                    new_end: end,
                });
            }
            None => self.emit(AuctionEvent::BidSubmitted {
                auction: id,
                bidder: caller,
                amount,
            }),
        }
        Ok(BidReceipt {
            balance,
            extended_to: new_end,
        })
    }
}
