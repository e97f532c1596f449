//! # slothouse-custody
//!
//! **Custody Ledger** for SlotHouse: everything the engine holds on behalf
//! of bidders and depositors.
//!
//! ## Architecture
//!
//! 1. **BidLedger**: cumulative bid balance per (auction, bidder)
//! 2. **ItemVault**: items held per (auction, slot), with depositor and claim state
//! 3. **DepositGate**: hard gate that validates a deposit before any state changes
//! 4. **Ports**: [`FundsCustody`] and [`ItemCustody`], the external transfer primitives
//! 5. **InMemoryEscrow**: an adapter implementing both ports over in-memory wallets
//!
//! ## Deposit Flow
//!
//! ```text
//! DepositGate.check() → ItemVault.deposit() → ItemCustody.hold_item()
//! ```
//!
//! The ledger and vault are the only owners of balance and item records.
//! Nothing else mutates them.

pub mod bid_ledger;
pub mod deposit_gate;
pub mod item_vault;
pub mod memory;
pub mod ports;

pub use bid_ledger::BidLedger;
pub use deposit_gate::DepositGate;
pub use item_vault::{CustodiedItem, ItemVault};
pub use memory::InMemoryEscrow;
pub use ports::{FundsCustody, ItemCustody, payout_total};
