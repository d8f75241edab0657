use std::collections::BTreeMap;
use std::sync::Mutex;

use super::domain::{Shop, ShopId, UserId};
use super::favorites::FavoritesLedger;

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction over the shop collection. The engine validates against
/// the snapshot a fetch returns; backends owning real persistence must
/// enforce "one vote per (shop, user)" and "one pending claim per shop" with
/// an atomic conditional write and surface races as `Conflict`.
pub trait ShopRepository: Send + Sync {
    fn insert(&self, shop: Shop) -> Result<Shop, RepositoryError>;
    fn update(&self, shop: Shop) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ShopId) -> Result<Option<Shop>, RepositoryError>;
    fn remove(&self, id: &ShopId) -> Result<(), RepositoryError>;
    /// All shops in arrival order; the moderation queue preserves it.
    fn list(&self) -> Result<Vec<Shop>, RepositoryError>;
}

/// Storage abstraction for per-user favorites.
pub trait FavoriteStore: Send + Sync {
    /// Idempotent; returns `false` when the shop was already saved.
    fn add(&self, user_id: &UserId, shop_id: ShopId) -> Result<bool, RepositoryError>;
    /// Idempotent; returns `false` when the shop was not saved.
    fn remove(&self, user_id: &UserId, shop_id: &ShopId) -> Result<bool, RepositoryError>;
    fn list(&self, user_id: &UserId) -> Result<Vec<ShopId>, RepositoryError>;
}

/// Mutex-guarded in-memory shop collection, used by the demo server and the
/// test suites. The mutex serializes callers, standing in for the uniqueness
/// constraints a database would enforce.
#[derive(Debug, Default)]
pub struct MemoryShopRepository {
    shops: Mutex<Vec<Shop>>,
}

impl MemoryShopRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Shop>>, RepositoryError> {
        self.shops
            .lock()
            .map_err(|_| RepositoryError::Unavailable("shop store poisoned".to_string()))
    }
}

impl ShopRepository for MemoryShopRepository {
    fn insert(&self, shop: Shop) -> Result<Shop, RepositoryError> {
        let mut shops = self.lock()?;
        if shops.iter().any(|existing| existing.id == shop.id) {
            return Err(RepositoryError::Conflict);
        }
        shops.push(shop.clone());
        Ok(shop)
    }

    fn update(&self, shop: Shop) -> Result<(), RepositoryError> {
        let mut shops = self.lock()?;
        match shops.iter_mut().find(|existing| existing.id == shop.id) {
            Some(existing) => {
                *existing = shop;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &ShopId) -> Result<Option<Shop>, RepositoryError> {
        let shops = self.lock()?;
        Ok(shops.iter().find(|shop| &shop.id == id).cloned())
    }

    fn remove(&self, id: &ShopId) -> Result<(), RepositoryError> {
        let mut shops = self.lock()?;
        let before = shops.len();
        shops.retain(|shop| &shop.id != id);
        if shops.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<Shop>, RepositoryError> {
        let shops = self.lock()?;
        Ok(shops.clone())
    }
}

/// Mutex-guarded in-memory favorites store.
#[derive(Debug, Default)]
pub struct MemoryFavoriteStore {
    ledgers: Mutex<BTreeMap<UserId, FavoritesLedger>>,
}

impl MemoryFavoriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<UserId, FavoritesLedger>>, RepositoryError>
    {
        self.ledgers
            .lock()
            .map_err(|_| RepositoryError::Unavailable("favorites store poisoned".to_string()))
    }
}

impl FavoriteStore for MemoryFavoriteStore {
    fn add(&self, user_id: &UserId, shop_id: ShopId) -> Result<bool, RepositoryError> {
        let mut ledgers = self.lock()?;
        Ok(ledgers.entry(user_id.clone()).or_default().add(shop_id))
    }

    fn remove(&self, user_id: &UserId, shop_id: &ShopId) -> Result<bool, RepositoryError> {
        let mut ledgers = self.lock()?;
        Ok(ledgers
            .get_mut(user_id)
            .map(|ledger| ledger.remove(shop_id))
            .unwrap_or(false))
    }

    fn list(&self, user_id: &UserId) -> Result<Vec<ShopId>, RepositoryError> {
        let ledgers = self.lock()?;
        Ok(ledgers
            .get(user_id)
            .map(|ledger| ledger.iter().cloned().collect())
            .unwrap_or_default())
    }
}
