//! Shared fixtures for the engine integration tests.

#![allow(dead_code)]

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use slothouse_custody::InMemoryEscrow;
use slothouse_engine::{AuctionHouse, BidPayment, BidReceipt, InMemoryAuctionHouse, ManualClock};
use slothouse_settlement::StaticRoyaltyRegistry;
use slothouse_types::*;

pub type House = InMemoryAuctionHouse<ManualClock>;

pub const START: i64 = 100;
pub const END: i64 = 1_000;
pub const EXTENSION: u64 = 60;
pub const EXT: i64 = 60;
pub const ETH: i64 = 1_000_000_000_000_000_000;

pub fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_800_000_000 + secs, 0).unwrap()
}

pub fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

pub fn window() -> AuctionWindow {
    AuctionWindow::new(ts(START), ts(END), Duration::from_secs(EXTENSION))
}

pub struct Fixture {
    pub house: House,
    pub owner: AccountId,
    pub creator: AccountId,
    pub depositor: AccountId,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(tweak: impl FnOnce(&mut EngineConfig)) -> Self {
        let owner = AccountId::new();
        let mut config = EngineConfig::new(owner);
        tweak(&mut config);
        let house = AuctionHouse::new(
            config,
            InMemoryEscrow::new(),
            StaticRoyaltyRegistry::new(),
            ManualClock::new(ts(0)),
        )
        .unwrap();
        Self {
            house,
            owner,
            creator: AccountId::new(),
            depositor: AccountId::new(),
        }
    }

    pub fn create(&mut self, params: AuctionParams) -> AuctionId {
        self.house.create_auction(self.creator, params).unwrap()
    }

    pub fn native_auction(&mut self, slots: u32) -> AuctionId {
        self.create(AuctionParams::new(window(), slots, Currency::Native))
    }

    /// Mint `count` fresh items of collection `tag` to the depositor and
    /// deposit them into `slot`.
    pub fn deposit(
        &mut self,
        id: AuctionId,
        slot: u32,
        tag: u8,
        first: u64,
        count: u64,
    ) -> Vec<ItemRef> {
        let collection = ContractAddress::from_tag(tag);
        let items: Vec<ItemRef> = (first..first + count)
            .map(|n| ItemRef::new(collection, n))
            .collect();
        for item in &items {
            self.house.custody_mut().mint_item(*item, self.depositor);
        }
        self.house
            .deposit_items(self.depositor, id, slot, &items)
            .unwrap();
        items
    }

    pub fn fund(&mut self, who: AccountId, amount: Decimal) {
        self.house.custody_mut().fund(who, Currency::Native, amount);
    }

    /// Fund `who` with exactly `amount` and bid it.
    pub fn bid(&mut self, who: AccountId, id: AuctionId, amount: Decimal) -> BidReceipt {
        self.fund(who, amount);
        self.house
            .bid(who, id, BidPayment::Native { value: amount })
            .unwrap()
    }

    pub fn at(&mut self, secs: i64) {
        self.house.clock_mut().set(ts(secs));
    }

    pub fn wallet(&self, who: AccountId) -> Decimal {
        self.house.custody().wallet(who, Currency::Native)
    }

    pub fn event_names(&mut self) -> Vec<String> {
        self.house
            .drain_events()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}
