//! In-memory custody adapter.
//!
//! Wallets, token allowances, and item ownership live in hash maps. Useful
//! for embedding the engine in tests and simulations. Recipients can be
//! marked as rejecting payments to exercise rollback paths.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use slothouse_types::{AccountId, AuctionError, ContractAddress, Currency, ItemRef, Result};

use crate::ports::{FundsCustody, ItemCustody, payout_total};

pub struct InMemoryEscrow {
    wallets: HashMap<(AccountId, Currency), Decimal>,
    /// Allowance granted to the engine per (owner, token).
    allowances: HashMap<(AccountId, ContractAddress), Decimal>,
    item_owners: HashMap<ItemRef, AccountId>,
    held_items: HashSet<ItemRef>,
    held: HashMap<Currency, Decimal>,
    rejecting: HashSet<AccountId>,
}

impl InMemoryEscrow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            wallets: HashMap::new(),
            allowances: HashMap::new(),
            item_owners: HashMap::new(),
            held_items: HashSet::new(),
            held: HashMap::new(),
            rejecting: HashSet::new(),
        }
    }

    /// Credit `amount` to an identity's wallet.
    pub fn fund(&mut self, account: AccountId, currency: Currency, amount: Decimal) {
        let wallet = self.wallets.entry((account, currency)).or_default();
        *wallet = wallet.saturating_add(amount);
    }

    /// Set the allowance `owner` grants the engine for `token`.
    pub fn approve(&mut self, owner: AccountId, token: ContractAddress, amount: Decimal) {
        self.allowances.insert((owner, token), amount);
    }

    /// Create an item owned by `owner`.
    pub fn mint_item(&mut self, item: ItemRef, owner: AccountId) {
        self.item_owners.insert(item, owner);
    }

    /// Make every push to `account` fail.
    pub fn reject_payments_to(&mut self, account: AccountId) {
        self.rejecting.insert(account);
    }

    pub fn accept_payments_to(&mut self, account: AccountId) {
        self.rejecting.remove(&account);
    }

    #[must_use]
    pub fn wallet(&self, account: AccountId, currency: Currency) -> Decimal {
        self.wallets
            .get(&(account, currency))
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn allowance(&self, owner: AccountId, token: ContractAddress) -> Decimal {
        self.allowances
            .get(&(owner, token))
            .copied()
            .unwrap_or_default()
    }

    /// Current owner of an item outside custody.
    #[must_use]
    pub fn owner_of(&self, item: &ItemRef) -> Option<AccountId> {
        self.item_owners.get(item).copied()
    }

    #[must_use]
    pub fn is_held(&self, item: &ItemRef) -> bool {
        self.held_items.contains(item)
    }

    fn check_push(&self, currency: Currency, to: AccountId, amount: Decimal) -> Result<()> {
        if self.rejecting.contains(&to) {
            tracing::debug!(recipient = %to, %amount, "transfer rejected by recipient");
            return Err(AuctionError::CustodyFailed {
                reason: format!("recipient {to} rejected the transfer"),
            });
        }
        let held = self.held(currency);
        if amount > held {
            return Err(AuctionError::CustodyFailed {
                reason: format!("payout {amount} exceeds custody {held} for {currency}"),
            });
        }
        Ok(())
    }
}

impl Default for InMemoryEscrow {
    fn default() -> Self {
        Self::new()
    }
}

impl FundsCustody for InMemoryEscrow {
    fn pull(&mut self, currency: Currency, from: AccountId, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(AuctionError::ZeroAmount);
        }
        if let Currency::Token(token) = currency {
            let approved = self.allowance(from, token);
            if approved < amount {
                return Err(AuctionError::AllowanceTooLow {
                    needed: amount,
                    approved,
                });
            }
        }
        let available = self.wallet(from, currency);
        if available < amount {
            return Err(AuctionError::InsufficientFunds {
                needed: amount,
                available,
            });
        }

        let held = self
            .held(currency)
            .checked_add(amount)
            .ok_or(AuctionError::ArithmeticOverflow)?;

        if let Currency::Token(token) = currency {
            if let Some(allowance) = self.allowances.get_mut(&(from, token)) {
                *allowance -= amount;
            }
        }
        self.wallets.insert((from, currency), available - amount);
        self.held.insert(currency, held);
        tracing::trace!(account = %from, currency = %currency, %amount, "funds pulled");
        Ok(())
    }

    fn push(&mut self, currency: Currency, to: AccountId, amount: Decimal) -> Result<()> {
        self.check_push(currency, to, amount)?;
        let wallet = self
            .wallet(to, currency)
            .checked_add(amount)
            .ok_or(AuctionError::ArithmeticOverflow)?;
        self.held.insert(currency, self.held(currency) - amount);
        self.wallets.insert((to, currency), wallet);
        Ok(())
    }

    fn held(&self, currency: Currency) -> Decimal {
        self.held.get(&currency).copied().unwrap_or_default()
    }

    fn push_all(&mut self, currency: Currency, payouts: &[(AccountId, Decimal)]) -> Result<()> {
        if let Some((to, _)) = payouts.iter().find(|(to, _)| self.rejecting.contains(to)) {
            tracing::debug!(
                recipient = %to,
                payouts = payouts.len(),
                "batch rejected by recipient"
            );
            return Err(AuctionError::CustodyFailed {
                reason: format!("recipient {to} rejected the transfer"),
            });
        }
        let total = payout_total(payouts)?;
        let held = self.held(currency);
        if total > held {
            return Err(AuctionError::CustodyFailed {
                reason: format!("batch payout {total} exceeds custody {held} for {currency}"),
            });
        }
        // Credit every recipient in a scratch map first so a wallet overflow
        // fails the batch before anything moves.
        let mut credited: HashMap<AccountId, Decimal> = HashMap::with_capacity(payouts.len());
        for (to, amount) in payouts {
            let wallet = credited
                .get(to)
                .copied()
                .unwrap_or_else(|| self.wallet(*to, currency));
            let wallet = wallet
                .checked_add(*amount)
                .ok_or(AuctionError::ArithmeticOverflow)?;
            credited.insert(*to, wallet);
        }
        for (to, wallet) in credited {
            self.wallets.insert((to, currency), wallet);
        }
        self.held.insert(currency, held - total);
        Ok(())
    }
}

impl ItemCustody for InMemoryEscrow {
    fn hold_item(&mut self, item: ItemRef, from: AccountId) -> Result<()> {
        if self.owner_of(&item) != Some(from) {
            return Err(AuctionError::ItemNotOwned { item, caller: from });
        }
        self.item_owners.remove(&item);
        self.held_items.insert(item);
        Ok(())
    }

    fn release_item(&mut self, item: ItemRef, to: AccountId) -> Result<()> {
        if !self.held_items.remove(&item) {
            return Err(AuctionError::CustodyFailed {
                reason: format!("item {item} is not in custody"),
            });
        }
        self.item_owners.insert(item, to);
        Ok(())
    }
}
