//! Error types for the SlotHouse auction engine.
//!
//! All errors use the `SH_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by failure class:
//! - 1xx: Validation (malformed parameters)
//! - 2xx: Temporal (operation outside its time window)
//! - 3xx: Authorization (wrong caller)
//! - 4xx: State conflict (already finalized, captured, distributed, ...)
//! - 5xx: Economic (zero amounts, allowances, reserve prices)
//! - 6xx: Custody / external collaborators
//! - 9xx: General / internal errors

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AccountId, AuctionId, ItemRef};

/// Failure class of an [`AuctionError`]. Tells callers whether retrying with
/// the same inputs can ever succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Validation,
    Temporal,
    Authorization,
    StateConflict,
    Economic,
    External,
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::Temporal => write!(f, "TEMPORAL"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::StateConflict => write!(f, "STATE_CONFLICT"),
            Self::Economic => write!(f, "ECONOMIC"),
            Self::External => write!(f, "EXTERNAL"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Central error enum for all SlotHouse operations.
#[derive(Debug, Error)]
pub enum AuctionError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// Start/end/extension fields are inconsistent.
    #[error("SH_ERR_100: Invalid auction window: {reason}")]
    InvalidWindow { reason: String },

    /// Slot count outside `1..=max_slots`.
    #[error("SH_ERR_101: Invalid slot count {count}: must be between 1 and {max}")]
    InvalidSlotCount { count: u32, max: u32 },

    /// Reserve list must be empty or have one entry per slot.
    #[error("SH_ERR_102: Invalid reserve arity: expected 0 or {expected}, got {got}")]
    InvalidReserveArity { expected: u32, got: usize },

    /// Basis points of a single distribution tier exceed 100%.
    #[error("SH_ERR_103: Invalid split total: {total_bps} bps exceeds 10000")]
    InvalidSplitTotal { total_bps: u32 },

    /// The referenced auction does not exist.
    #[error("SH_ERR_104: Auction not found: {0}")]
    AuctionNotFound(AuctionId),

    /// Slot index outside `1..=slot_count`.
    #[error("SH_ERR_105: Invalid slot {slot} for auction with {slot_count} slots")]
    InvalidSlot { slot: u32, slot_count: u32 },

    /// The zero address cannot be a collection.
    #[error("SH_ERR_106: Zero collection address")]
    ZeroCollectionAddress,

    /// Too many items in a single call.
    #[error("SH_ERR_107: Batch of {got} items exceeds per-call limit {max}")]
    BatchTooLarge { got: usize, max: usize },

    /// Amounts must be whole, non-negative base units.
    #[error("SH_ERR_108: Invalid amount {0}: must be a whole number of base units")]
    InvalidAmount(Decimal),

    /// Malformed deposit request.
    #[error("SH_ERR_109: Invalid deposit: {reason}")]
    InvalidDeposit { reason: String },

    /// Item index outside the slot's item list.
    #[error("SH_ERR_110: Invalid item index {index} for slot holding {count} items")]
    InvalidItemIndex { index: usize, count: usize },

    /// Supplied winner list has the wrong length.
    #[error("SH_ERR_111: Wrong winner count: expected {expected}, got {got}")]
    WrongWinnerCount { expected: usize, got: usize },

    /// Supplied winner list is not the canonical descending ranking.
    #[error("SH_ERR_112: Winners not sorted: {reason}")]
    WinnersNotSorted { reason: String },

    /// Platform fee must stay below 10%.
    #[error("SH_ERR_113: Platform fee {bps} bps is too high: must be below {max_exclusive}")]
    FeeTooHigh { bps: u32, max_exclusive: u32 },

    // =================================================================
    // Temporal Errors (2xx)
    // =================================================================
    /// Bidding has not opened yet.
    #[error("SH_ERR_200: Auction {0} has not started")]
    AuctionNotStarted(AuctionId),

    /// Bidding window has closed.
    #[error("SH_ERR_201: Auction {0} has ended")]
    AuctionEnded(AuctionId),

    /// Operation only allowed before the start time.
    #[error("SH_ERR_202: Auction {0} has already started")]
    AlreadyStarted(AuctionId),

    /// Finalization attempted before the end time.
    #[error("SH_ERR_203: Auction {0} has not ended")]
    NotEnded(AuctionId),

    /// Deposits are closed under the auction's deposit policy.
    #[error("SH_ERR_204: Deposits closed for auction {0}")]
    DepositsClosed(AuctionId),

    /// Operation requires a finalized auction.
    #[error("SH_ERR_205: Auction {0} is not finalized")]
    NotFinalized(AuctionId),

    // =================================================================
    // Authorization Errors (3xx)
    // =================================================================
    /// Caller is not the owner of the auction or of the platform.
    #[error("SH_ERR_300: Caller {caller} is not the owner")]
    NotOwner { caller: AccountId },

    /// Depositor is not on the auction's whitelist.
    #[error("SH_ERR_301: Depositor {0} is not whitelisted")]
    NotWhitelisted(AccountId),

    /// Caller did not deposit any item in the slot.
    #[error("SH_ERR_302: Caller {0} is not a depositor of this slot")]
    NotDepositor(AccountId),

    /// Caller is not the recorded slot winner.
    #[error("SH_ERR_303: Caller {0} is not the slot winner")]
    NotWinner(AccountId),

    /// Slot winners cannot withdraw their winning balance.
    #[error("SH_ERR_304: Caller {0} won a slot and cannot withdraw the balance")]
    IsWinner(AccountId),

    // =================================================================
    // State Conflict Errors (4xx)
    // =================================================================
    /// Auction was canceled.
    #[error("SH_ERR_400: Auction {0} is canceled")]
    AuctionCanceled(AuctionId),

    /// Auction was already finalized.
    #[error("SH_ERR_401: Auction {0} is already finalized")]
    AlreadyFinalized(AuctionId),

    /// Slot revenue was already captured.
    #[error("SH_ERR_402: Revenue for slot {slot} of {auction} already captured")]
    AlreadyCaptured { auction: AuctionId, slot: u32 },

    /// Revenue for this item or auction was already distributed.
    #[error("SH_ERR_403: Already distributed: {what}")]
    AlreadyDistributed { what: String },

    /// Auction does not support whitelisting.
    #[error("SH_ERR_404: Auction {0} does not support whitelisting")]
    WhitelistNotSupported(AuctionId),

    /// Slot items are locked while the slot can still be (or was) won.
    #[error("SH_ERR_405: Slot {slot} of {auction} is locked")]
    SlotLocked { auction: AuctionId, slot: u32 },

    /// Slot revenue must be captured before royalties are distributed.
    #[error("SH_ERR_406: Revenue for slot {slot} of {auction} not captured")]
    NotCaptured { auction: AuctionId, slot: u32 },

    /// Auction revenue cannot be distributed while item royalties are outstanding.
    #[error("SH_ERR_407: Royalties pending for slot {slot} of {auction}")]
    RoyaltiesPending { auction: AuctionId, slot: u32 },

    /// Item is already in custody.
    #[error("SH_ERR_408: Item {0} already deposited")]
    ItemAlreadyDeposited(ItemRef),

    /// All items of the slot were already claimed.
    #[error("SH_ERR_409: Items of slot {slot} of {auction} already claimed")]
    AlreadyClaimed { auction: AuctionId, slot: u32 },

    /// The slot has no assigned winner.
    #[error("SH_ERR_410: Slot {slot} of {auction} has no winner")]
    NoWinner { auction: AuctionId, slot: u32 },

    // =================================================================
    // Economic Errors (5xx)
    // =================================================================
    /// Amount must be greater than zero.
    #[error("SH_ERR_500: Amount is zero")]
    ZeroAmount,

    /// Payment currency does not match the auction currency.
    #[error("SH_ERR_501: Wrong currency: auction accepts {expected}, got {got}")]
    WrongCurrency { expected: String, got: String },

    /// Token allowance does not cover the bid.
    #[error("SH_ERR_502: Allowance too low: need {needed}, approved {approved}")]
    AllowanceTooLow { needed: Decimal, approved: Decimal },

    /// Wallet does not hold enough funds.
    #[error("SH_ERR_503: Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    /// Caller has nothing to withdraw.
    #[error("SH_ERR_504: Zero balance")]
    ZeroBalance,

    /// Slot reached its reserve price, so it is a winning slot.
    #[error("SH_ERR_505: Reserve met for slot {slot} of {auction}")]
    ReserveMet { auction: AuctionId, slot: u32 },

    /// Slot did not reach its reserve price.
    #[error("SH_ERR_506: Reserve not met for slot {slot} of {auction}")]
    ReserveNotMet { auction: AuctionId, slot: u32 },

    /// The slot is full.
    #[error("SH_ERR_507: Slot capacity exceeded: {held} held + {adding} new > {max}")]
    SlotCapacityExceeded {
        held: usize,
        adding: usize,
        max: usize,
    },

    /// Caller asked for more items than they hold in the slot.
    #[error("SH_ERR_508: Insufficient items: requested {requested}, available {available}")]
    InsufficientItems { requested: usize, available: usize },

    /// Currency is not accepted by this engine.
    #[error("SH_ERR_509: Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    // =================================================================
    // Custody / External Errors (6xx)
    // =================================================================
    /// The custody primitive rejected a transfer.
    #[error("SH_ERR_600: Custody transfer failed: {reason}")]
    CustodyFailed { reason: String },

    /// The royalty registry could not answer.
    #[error("SH_ERR_601: Royalty registry error: {reason}")]
    RegistryFailed { reason: String },

    /// Caller does not own the item being deposited.
    #[error("SH_ERR_602: Item {item} is not owned by {caller}")]
    ItemNotOwned { item: ItemRef, caller: AccountId },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Checked arithmetic overflowed.
    #[error("SH_ERR_900: Arithmetic overflow")]
    ArithmeticOverflow,

    /// Funds held do not match outstanding obligations. Critical alert.
    #[error("SH_ERR_901: Funds conservation violation: {reason}")]
    ConservationViolation { reason: String },

    /// Serialization / deserialization error.
    #[error("SH_ERR_902: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid values, missing fields, etc.).
    #[error("SH_ERR_903: Configuration error: {0}")]
    Configuration(String),

    /// Unrecoverable internal error.
    #[error("SH_ERR_904: Internal error: {0}")]
    Internal(String),
}

impl AuctionError {
    /// Failure class of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidWindow { .. }
            | Self::InvalidSlotCount { .. }
            | Self::InvalidReserveArity { .. }
            | Self::InvalidSplitTotal { .. }
            | Self::AuctionNotFound(_)
            | Self::InvalidSlot { .. }
            | Self::ZeroCollectionAddress
            | Self::BatchTooLarge { .. }
            | Self::InvalidAmount(_)
            | Self::InvalidDeposit { .. }
            | Self::InvalidItemIndex { .. }
            | Self::WrongWinnerCount { .. }
            | Self::WinnersNotSorted { .. }
            | Self::FeeTooHigh { .. } => ErrorCategory::Validation,

            Self::AuctionNotStarted(_)
            | Self::AuctionEnded(_)
            | Self::AlreadyStarted(_)
            | Self::NotEnded(_)
            | Self::DepositsClosed(_)
            | Self::NotFinalized(_) => ErrorCategory::Temporal,

            Self::NotOwner { .. }
            | Self::NotWhitelisted(_)
            | Self::NotDepositor(_)
            | Self::NotWinner(_)
            | Self::IsWinner(_) => ErrorCategory::Authorization,

            Self::AuctionCanceled(_)
            | Self::AlreadyFinalized(_)
            | Self::AlreadyCaptured { .. }
            | Self::AlreadyDistributed { .. }
            | Self::WhitelistNotSupported(_)
            | Self::SlotLocked { .. }
            | Self::NotCaptured { .. }
            | Self::RoyaltiesPending { .. }
            | Self::ItemAlreadyDeposited(_)
            | Self::AlreadyClaimed { .. }
            | Self::NoWinner { .. } => ErrorCategory::StateConflict,

            Self::ZeroAmount
            | Self::WrongCurrency { .. }
            | Self::AllowanceTooLow { .. }
            | Self::InsufficientFunds { .. }
            | Self::ZeroBalance
            | Self::ReserveMet { .. }
            | Self::ReserveNotMet { .. }
            | Self::SlotCapacityExceeded { .. }
            | Self::InsufficientItems { .. }
            | Self::UnsupportedCurrency(_) => ErrorCategory::Economic,

            Self::CustodyFailed { .. }
            | Self::RegistryFailed { .. }
            | Self::ItemNotOwned { .. } => ErrorCategory::External,

            Self::ArithmeticOverflow
            | Self::ConservationViolation { .. }
            | Self::Serialization(_)
            | Self::Configuration(_)
            | Self::Internal(_) => ErrorCategory::Internal,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, AuctionError>;

impl From<serde_json::Error> for AuctionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
