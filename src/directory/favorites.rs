use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::ShopId;

/// A user's saved shops. Add and remove are idempotent so the surrounding
/// client can apply its change optimistically and retry or roll back safely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesLedger {
    shops: BTreeSet<ShopId>,
}

impl FavoritesLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the shop was already a favorite.
    pub fn add(&mut self, shop_id: ShopId) -> bool {
        self.shops.insert(shop_id)
    }

    /// Returns `false` when the shop was not a favorite.
    pub fn remove(&mut self, shop_id: &ShopId) -> bool {
        self.shops.remove(shop_id)
    }

    pub fn contains(&self, shop_id: &ShopId) -> bool {
        self.shops.contains(shop_id)
    }

    pub fn is_empty(&self) -> bool {
        self.shops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShopId> {
        self.shops.iter()
    }
}
