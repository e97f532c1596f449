//! # slothouse-engine
//!
//! The **SlotHouse** auction house: a multi-slot, multi-item auction with a
//! layered royalty waterfall.
//!
//! [`AuctionHouse`] is the single writer over every component:
//!
//! - [`AuctionRegistry`]: auction and slot records, creation rules, whitelists
//! - **Custody**: bid balances and items in custody (`slothouse-custody`)
//! - **Bidding**: cumulative bids with anti-snipe extension ([`BidPayment`])
//! - **Finalization**: deterministic ranking, rank k → slot k (`slothouse-ranking`)
//! - **Settlement**: revenue capture, royalty waterfall, reserve, withdrawals (`slothouse-settlement`)
//! - [`Clock`]: injected time source; [`ManualClock`] for simulations
//! - [`telemetry`]: `tracing-subscriber` setup for hosts
//!
//! ## Auction Lifecycle
//!
//! ```text
//! PENDING ──▶ BIDDING ──▶ ENDED ──▶ FINALIZED
//!   │  deposits,   bids,       finalize    capture → royalties → revenue
//!   │  whitelist   extension               claims, refunds
//!   ▼
//! CANCELED (only before start; every deposit becomes withdrawable)
//! ```
//!
//! Every operation validates, then updates internal state, then moves funds
//! or items. A failed transfer reverts the internal update.

pub mod bidding;
pub mod clock;
pub mod deposits;
pub mod finalize;
pub mod house;
pub mod registry;
pub mod revenue;
pub mod telemetry;
pub mod withdrawals;

pub use bidding::{BidPayment, BidReceipt};
pub use clock::{Clock, ManualClock, SystemClock};
pub use house::AuctionHouse;
pub use registry::AuctionRegistry;
pub use telemetry::init_tracing;

/// House backed by the in-memory escrow and static royalty tables.
pub type InMemoryAuctionHouse<C = SystemClock> = AuctionHouse<
    slothouse_custody::InMemoryEscrow,
    slothouse_settlement::StaticRoyaltyRegistry,
    C,
>;
