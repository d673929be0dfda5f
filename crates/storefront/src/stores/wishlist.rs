//! Wishlist store.
//!
//! Set-like semantics keyed on product identity alone: adding a product that
//! is already wishlisted is a no-op, independent of variants.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use clementine_core::ProductId;

use super::{ProductSnapshot, load_collection, persist_collection};
use crate::storage::{KeyValueStore, keys};

/// A wishlisted product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    /// Product this entry refers to.
    pub product: ProductSnapshot,
    /// When the product was added.
    pub added_at: DateTime<Utc>,
}

/// The wishlist state container.
///
/// Same persistence-per-mutation and fail-soft loading behavior as the cart
/// store; subscribers are notified with the current entry count.
pub struct WishlistStore {
    storage: Arc<dyn KeyValueStore>,
    entries: Mutex<Vec<WishlistEntry>>,
    count: watch::Sender<usize>,
}

impl WishlistStore {
    /// Construct the store, loading prior state from storage.
    ///
    /// Missing or corrupt persisted state degrades to an empty wishlist.
    #[must_use]
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let entries: Vec<WishlistEntry> = load_collection(storage.as_ref(), keys::WISHLIST);
        let (count, _) = watch::channel(entries.len());
        Self {
            storage,
            entries: Mutex::new(entries),
            count,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<WishlistEntry>> {
        self.entries.lock().expect("wishlist store mutex poisoned")
    }

    fn mutate(&self, transition: impl FnOnce(&mut Vec<WishlistEntry>)) {
        let mut entries = self.lock();
        transition(&mut entries);
        persist_collection(self.storage.as_ref(), keys::WISHLIST, &entries);
        self.count.send_replace(entries.len());
    }

    /// Add a product, stamped with the current time.
    ///
    /// Returns `false` (and changes nothing) if the product is already
    /// wishlisted.
    pub fn add(&self, product: ProductSnapshot) -> bool {
        let mut added = false;
        self.mutate(|entries| {
            if entries.iter().any(|e| e.product.id == product.id) {
                return;
            }
            entries.push(WishlistEntry {
                product,
                added_at: Utc::now(),
            });
            added = true;
        });
        added
    }

    /// Remove a product. Removing an absent product is a no-op.
    pub fn remove(&self, product_id: &ProductId) {
        self.mutate(|entries| entries.retain(|e| &e.product.id != product_id));
    }

    /// Whether the product is wishlisted.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.lock().iter().any(|e| &e.product.id == product_id)
    }

    /// Empty the wishlist.
    pub fn clear(&self) {
        self.mutate(Vec::clear);
    }

    /// Number of wishlisted products.
    #[must_use]
    pub fn len(&self) -> usize {
        *self.count.borrow()
    }

    /// Whether the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clone of the current entry list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<WishlistEntry> {
        self.lock().clone()
    }

    /// Subscribe to the entry count; the receiver sees a fresh value after
    /// every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.count.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use rust_decimal::Decimal;

    fn snapshot(id: &str) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::new(999, 2),
            image: None,
        }
    }

    fn store() -> WishlistStore {
        WishlistStore::load(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let wishlist = store();
        assert!(wishlist.add(snapshot("p1")));
        assert!(!wishlist.add(snapshot("p1")));

        assert_eq!(wishlist.len(), 1);
        assert_eq!(wishlist.snapshot().len(), 1);
    }

    #[test]
    fn test_remove_and_contains() {
        let wishlist = store();
        wishlist.add(snapshot("p1"));
        wishlist.add(snapshot("p2"));

        assert!(wishlist.contains(&ProductId::new("p1")));
        wishlist.remove(&ProductId::new("p1"));
        assert!(!wishlist.contains(&ProductId::new("p1")));
        assert_eq!(wishlist.len(), 1);

        // Removing an absent product is a no-op
        wishlist.remove(&ProductId::new("p1"));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_clear() {
        let wishlist = store();
        wishlist.add(snapshot("p1"));
        wishlist.clear();
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_persist_reload_round_trip() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        let wishlist = WishlistStore::load(Arc::clone(&storage));
        wishlist.add(snapshot("p1"));
        wishlist.add(snapshot("p2"));
        let before = wishlist.snapshot();

        let reloaded = WishlistStore::load(storage);
        let after = reloaded.snapshot();
        assert_eq!(after.len(), 2);
        for entry in &before {
            assert!(after.contains(entry), "missing entry after reload: {entry:?}");
        }
    }

    #[test]
    fn test_corrupt_state_loads_as_empty() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        storage.set(keys::WISHLIST, "42").unwrap();

        let wishlist = WishlistStore::load(storage);
        assert!(wishlist.is_empty());
    }
}
