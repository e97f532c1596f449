//! # slothouse-settlement
//!
//! **Revenue plane**: everything that happens to money after winners are fixed.
//!
//! ## Architecture
//!
//! 1. **RevenueBook**: immutable per-slot captures and the residual pools left after item royalties
//! 2. **Waterfall**: pure payout planning in strict tier order
//! 3. **DistributionGuard**: each item and each auction is distributed exactly once
//! 4. **RoyaltyReserve**: per-currency accumulator of platform fees
//! 5. **WithdrawalGuard**: who may take what back, as a pure function of auction state
//! 6. **FundsConservation**: inflow/outflow bookkeeping checked against outstanding liabilities
//! 7. **RoyaltyRegistry**: the external source of item and collection royalty receivers
//!
//! ## Waterfall
//!
//! ```text
//! captured ─┬─ per item: item royalties → collection royalties ─┐
//!           └────────────────────────────────────────────────────┴→ residual
//! residual → payment splits → platform fee (reserve) → creator
//! ```

pub mod conservation;
pub mod idempotency;
pub mod registry;
pub mod reserve;
pub mod revenue;
pub mod waterfall;
pub mod withdrawal_guard;

pub use conservation::FundsConservation;
pub use idempotency::{DistributionGuard, DistributionKey};
pub use registry::{RoyaltyRegistry, StaticRoyaltyRegistry};
pub use reserve::RoyaltyReserve;
pub use revenue::{RevenueBook, RevenueState};
pub use waterfall::{
    AuctionRevenuePlan, ItemRoyaltyPlan, Payout, per_item_base, plan_auction_revenue,
    plan_item_royalties,
};
pub use withdrawal_guard::WithdrawalGuard;
