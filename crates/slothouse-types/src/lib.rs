//! # slothouse-types
//!
//! Shared types, errors, and configuration for the **SlotHouse** auction engine.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`AuctionId`], [`AccountId`], [`ContractAddress`], [`ItemId`], [`ItemRef`]
//! - **Currency**: [`Currency`]
//! - **Time/window policy**: [`AuctionWindow`], [`AuctionPhase`], [`ExtensionPolicy`], [`DepositPolicy`]
//! - **Auction model**: [`AuctionParams`], [`Auction`], [`Slot`]
//! - **Balances**: [`BidBalance`], [`BidderStanding`]
//! - **Royalties**: [`RoyaltyReceiver`], basis-point helpers
//! - **Events**: [`AuctionEvent`], [`RoyaltyTier`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`AuctionError`] with `SH_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod auction;
pub mod balance;
pub mod config;
pub mod constants;
pub mod currency;
pub mod error;
pub mod event;
pub mod ids;
pub mod royalty;
pub mod window;

pub use auction::*;
pub use balance::*;
pub use config::*;
pub use currency::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use royalty::*;
pub use window::*;

// Constants are accessed via `slothouse_types::constants::FOO`.
