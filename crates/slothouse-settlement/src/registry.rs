//! Royalty registry port.
//!
//! The registry is queried at distribution time, never cached at deposit
//! time, so updates made after a deposit still apply.

use std::collections::HashMap;

use slothouse_types::{ContractAddress, ItemRef, Result, RoyaltyReceiver};

/// Read-only source of item-level and collection-level royalty receivers.
pub trait RoyaltyRegistry {
    /// Receivers registered for one specific item.
    fn royalties_for_item(&self, item: &ItemRef) -> Result<Vec<RoyaltyReceiver>>;

    /// Default receivers for every item of a collection.
    fn royalties_for_collection(&self, collection: ContractAddress)
    -> Result<Vec<RoyaltyReceiver>>;
}

/// Registry backed by in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct StaticRoyaltyRegistry {
    items: HashMap<ItemRef, Vec<RoyaltyReceiver>>,
    collections: HashMap<ContractAddress, Vec<RoyaltyReceiver>>,
}

impl StaticRoyaltyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_item_royalties(&mut self, item: ItemRef, receivers: Vec<RoyaltyReceiver>) {
        self.items.insert(item, receivers);
    }

    pub fn set_collection_royalties(
        &mut self,
        collection: ContractAddress,
        receivers: Vec<RoyaltyReceiver>,
    ) {
        self.collections.insert(collection, receivers);
    }

    pub fn clear_item_royalties(&mut self, item: &ItemRef) {
        self.items.remove(item);
    }
}

impl RoyaltyRegistry for StaticRoyaltyRegistry {
    fn royalties_for_item(&self, item: &ItemRef) -> Result<Vec<RoyaltyReceiver>> {
        Ok(self.items.get(item).cloned().unwrap_or_default())
    }

    fn royalties_for_collection(
        &self,
        collection: ContractAddress,
    ) -> Result<Vec<RoyaltyReceiver>> {
        Ok(self.collections.get(&collection).cloned().unwrap_or_default())
    }
}
