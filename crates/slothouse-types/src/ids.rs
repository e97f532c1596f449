//! Identifiers used throughout SlotHouse.
//!
//! Auctions are numbered sequentially starting at 1. Identities use UUIDv7,
//! collections and fungible tokens are addressed by a 20-byte contract address.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AuctionError;

// ---------------------------------------------------------------------------
// AuctionId
// ---------------------------------------------------------------------------

/// Sequential auction identifier. The first auction created is `AuctionId(1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AuctionId(pub u64);

impl AuctionId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for AuctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "auction:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// An identity that can bid, deposit, create auctions, or receive payouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub Uuid);

impl AccountId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ContractAddress
// ---------------------------------------------------------------------------

/// 20-byte address of an item collection or a fungible payment token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ContractAddress(pub [u8; 20]);

impl ContractAddress {
    /// The all-zero address. Never a valid collection.
    pub const ZERO: Self = Self([0u8; 20]);

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for ContractAddress {
    type Err = AuctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| AuctionError::Serialization(format!("bad address {s}: {e}")))?;
        let arr: [u8; 20] = bytes.try_into().map_err(|_| {
            AuctionError::Serialization(format!("address {s} is not 20 bytes"))
        })?;
        Ok(Self(arr))
    }
}

// ---------------------------------------------------------------------------
// ItemId / ItemRef
// ---------------------------------------------------------------------------

/// Identifier of an indivisible item within its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fully qualified reference to a custodied item: (collection, item id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ItemRef {
    pub collection: ContractAddress,
    pub item_id: ItemId,
}

impl ItemRef {
    #[must_use]
    pub fn new(collection: ContractAddress, item_id: u64) -> Self {
        Self {
            collection,
            item_id: ItemId(item_id),
        }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.collection, self.item_id)
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl ContractAddress {
    /// Random non-zero address for tests.
    #[must_use]
    pub fn random() -> Self {
        use rand::Rng;
        let mut bytes: [u8; 20] = rand::thread_rng().r#gen();
        bytes[0] |= 1;
        Self(bytes)
    }

    /// Address whose last byte is `tag`, for readable fixtures.
    #[must_use]
    pub fn from_tag(tag: u8) -> Self {
        let mut bytes = [0u8; 20];
        bytes[0] = 0xC0;
        bytes[19] = tag;
        Self(bytes)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auction_id_next() {
        assert_eq!(AuctionId(1).next(), AuctionId(2));
        assert_eq!(format!("{}", AuctionId(7)), "auction:7");
    }

    #[test]
    fn account_id_uniqueness_and_order() {
        let a = AccountId::new();
        let b = AccountId::new();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn zero_address_detection() {
        assert!(ContractAddress::ZERO.is_zero());
        assert!(!ContractAddress::from_tag(1).is_zero());
        assert!(!ContractAddress::random().is_zero());
    }

    #[test]
    fn address_display_and_parse() {
        let addr = ContractAddress::from_tag(0xAB);
        let text = addr.to_string();
        assert!(text.starts_with("0xc0"));
        assert!(text.ends_with("ab"));
        let back: ContractAddress = text.parse().unwrap();
        assert_eq!(addr, back);
    }

    #[test]
    fn address_parse_rejects_wrong_length() {
        let err = "0x1234".parse::<ContractAddress>().unwrap_err();
        assert!(matches!(err, AuctionError::Serialization(_)));
    }

    #[test]
    fn item_ref_display() {
        let item = ItemRef::new(ContractAddress::from_tag(1), 42);
        assert!(item.to_string().ends_with("#42"));
    }

    #[test]
    fn serde_roundtrips() {
        let item = ItemRef::new(ContractAddress::random(), 9);
        let json = serde_json::to_string(&item).unwrap();
        let back: ItemRef = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);

        let acct = AccountId::new();
        let json = serde_json::to_string(&acct).unwrap();
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(acct, back);
    }
}
