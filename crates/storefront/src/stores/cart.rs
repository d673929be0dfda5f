//! Cart store.
//!
//! Entries are keyed by (product, selected color, selected size); adding the
//! same combination again merges quantities into the existing line. Line-level
//! mutations (quantity change, removal) key on the full combination so one
//! color variant of a product can be edited without touching its siblings;
//! whole-product removal is a separate, explicitly named operation.

use std::sync::{Arc, Mutex, MutexGuard};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use clementine_core::ProductId;

use super::{ProductSnapshot, load_collection, persist_collection};
use crate::storage::{KeyValueStore, keys};

/// A single cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    /// Product this line refers to.
    pub product: ProductSnapshot,
    /// How many units; never persisted below 1.
    pub quantity: u32,
    /// Chosen color variant, if the product has colors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<String>,
    /// Chosen size variant, if the product has sizes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
}

impl CartEntry {
    /// Price of this line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }

    fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product.id.clone(),
            color: self.selected_color.clone(),
            size: self.selected_size.clone(),
        }
    }
}

/// Composite key identifying one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    /// Product identity.
    pub product_id: ProductId,
    /// Selected color variant.
    pub color: Option<String>,
    /// Selected size variant.
    pub size: Option<String>,
}

/// Aggregate cart figures published to subscribers after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    /// Sum of quantities across all lines.
    pub count: u64,
    /// Sum of line totals.
    pub total: Decimal,
}

// =============================================================================
// State transitions
// =============================================================================
//
// Pure functions over the entry list, composed with persistence by the store.

/// Merge a new line into the list, adding quantities on a matching key.
///
/// A zero quantity changes nothing and adds nothing.
fn apply_add(entries: &mut Vec<CartEntry>, entry: CartEntry) {
    if entry.quantity == 0 {
        return;
    }
    let key = entry.key();
    match entries.iter_mut().find(|e| e.key() == key) {
        Some(existing) => existing.quantity += entry.quantity,
        None => entries.push(entry),
    }
}

/// Overwrite a line's quantity; anything below 1 removes the line.
fn apply_set_quantity(entries: &mut Vec<CartEntry>, key: &LineKey, quantity: i64) {
    if quantity < 1 {
        apply_remove_line(entries, key);
        return;
    }
    let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
    if let Some(entry) = entries.iter_mut().find(|e| &e.key() == key) {
        entry.quantity = quantity;
    }
}

/// Remove the line matching the full composite key, if present.
fn apply_remove_line(entries: &mut Vec<CartEntry>, key: &LineKey) {
    entries.retain(|e| &e.key() != key);
}

/// Remove every line for a product, across all variant combinations.
fn apply_remove_product(entries: &mut Vec<CartEntry>, product_id: &ProductId) {
    entries.retain(|e| &e.product.id != product_id);
}

fn summarize(entries: &[CartEntry]) -> CartSummary {
    CartSummary {
        count: entries.iter().map(|e| u64::from(e.quantity)).sum(),
        total: entries.iter().map(CartEntry::line_total).sum(),
    }
}

// =============================================================================
// CartStore
// =============================================================================

/// The cart state container.
///
/// Mutations are serialized behind a lock; every mutation persists the full
/// entry list under the cart key and publishes an updated [`CartSummary`] to
/// subscribers.
pub struct CartStore {
    storage: Arc<dyn KeyValueStore>,
    entries: Mutex<Vec<CartEntry>>,
    summary: watch::Sender<CartSummary>,
}

impl CartStore {
    /// Construct the store, loading prior state from storage.
    ///
    /// Missing or corrupt persisted state degrades to an empty cart.
    #[must_use]
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let entries: Vec<CartEntry> = load_collection(storage.as_ref(), keys::CART);
        let (summary, _) = watch::channel(summarize(&entries));
        Self {
            storage,
            entries: Mutex::new(entries),
            summary,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CartEntry>> {
        self.entries.lock().expect("cart store mutex poisoned")
    }

    /// Apply a state transition, then persist and notify.
    fn mutate(&self, transition: impl FnOnce(&mut Vec<CartEntry>)) {
        let mut entries = self.lock();
        transition(&mut entries);
        persist_collection(self.storage.as_ref(), keys::CART, &entries);
        self.summary.send_replace(summarize(&entries));
    }

    /// Add a product to the cart, merging quantities on an existing line with
    /// the same product/color/size combination.
    pub fn add(
        &self,
        product: ProductSnapshot,
        quantity: u32,
        color: Option<String>,
        size: Option<String>,
    ) {
        self.mutate(|entries| {
            apply_add(
                entries,
                CartEntry {
                    product,
                    quantity,
                    selected_color: color,
                    selected_size: size,
                },
            );
        });
    }

    /// Overwrite a line's quantity. A quantity below 1 removes the line.
    pub fn set_quantity(&self, key: &LineKey, quantity: i64) {
        self.mutate(|entries| apply_set_quantity(entries, key, quantity));
    }

    /// Remove one line identified by its full composite key.
    pub fn remove_line(&self, key: &LineKey) {
        self.mutate(|entries| apply_remove_line(entries, key));
    }

    /// Remove every line for a product, regardless of variant selection.
    pub fn remove_product(&self, product_id: &ProductId) {
        self.mutate(|entries| apply_remove_product(entries, product_id));
    }

    /// Empty the cart (called after a successful checkout).
    pub fn clear(&self) {
        self.mutate(Vec::clear);
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.summary.borrow().count
    }

    /// Sum of line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.summary.borrow().total
    }

    /// Whether any line refers to the given product.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.lock().iter().any(|e| &e.product.id == product_id)
    }

    /// Clone of the current entry list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartEntry> {
        self.lock().clone()
    }

    /// Current aggregate figures.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        self.summary.borrow().clone()
    }

    /// Subscribe to aggregate figures; the receiver sees a fresh value after
    /// every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSummary> {
        self.summary.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn snapshot(id: &str, price: Decimal) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price,
            image: None,
        }
    }

    fn store() -> CartStore {
        CartStore::load(Arc::new(MemoryStore::new()))
    }

    fn key(id: &str) -> LineKey {
        LineKey {
            product_id: ProductId::new(id),
            color: None,
            size: None,
        }
    }

    #[test]
    fn test_add_merges_same_combination() {
        let cart = store();
        cart.add(snapshot("p1", Decimal::new(1999, 2)), 2, None, None);
        cart.add(snapshot("p1", Decimal::new(1999, 2)), 3, None, None);

        let entries = cart.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.first().unwrap().quantity, 5);
        assert_eq!(cart.count(), 5);
        assert_eq!(cart.total(), Decimal::new(9995, 2));
    }

    #[test]
    fn test_add_keeps_variants_distinct() {
        let cart = store();
        let product = snapshot("p1", Decimal::new(500, 2));
        cart.add(product.clone(), 1, Some("red".to_string()), None);
        cart.add(product, 1, Some("blue".to_string()), None);

        assert_eq!(cart.snapshot().len(), 2);
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let cart = store();
        cart.add(snapshot("p1", Decimal::ONE), 0, None, None);
        assert!(cart.snapshot().is_empty());
    }

    #[test]
    fn test_set_quantity_overwrites() {
        let cart = store();
        cart.add(snapshot("p1", Decimal::TEN), 2, None, None);
        cart.set_quantity(&key("p1"), 7);

        assert_eq!(cart.count(), 7);
        assert_eq!(cart.total(), Decimal::new(70, 0));
    }

    #[test]
    fn test_set_quantity_below_one_removes() {
        for quantity in [0, -1] {
            let cart = store();
            cart.add(snapshot("p1", Decimal::ONE), 3, None, None);
            cart.set_quantity(&key("p1"), quantity);
            assert!(cart.snapshot().is_empty(), "quantity {quantity} must remove");
            assert_eq!(cart.total(), Decimal::ZERO);
        }
    }

    #[test]
    fn test_set_quantity_unknown_line_is_noop() {
        let cart = store();
        cart.add(snapshot("p1", Decimal::ONE), 1, None, None);
        cart.set_quantity(&key("p2"), 5);
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_remove_line_spares_sibling_variants() {
        let cart = store();
        let product = snapshot("p1", Decimal::ONE);
        cart.add(product.clone(), 1, Some("red".to_string()), None);
        cart.add(product, 1, Some("blue".to_string()), None);

        cart.remove_line(&LineKey {
            product_id: ProductId::new("p1"),
            color: Some("red".to_string()),
            size: None,
        });

        let entries = cart.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries.first().unwrap().selected_color.as_deref(),
            Some("blue")
        );
    }

    #[test]
    fn test_remove_product_drops_all_variants() {
        let cart = store();
        let product = snapshot("p1", Decimal::ONE);
        cart.add(product.clone(), 1, Some("red".to_string()), None);
        cart.add(product, 1, Some("blue".to_string()), None);
        cart.add(snapshot("p2", Decimal::ONE), 1, None, None);

        cart.remove_product(&ProductId::new("p1"));

        let entries = cart.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.first().unwrap().product.id, ProductId::new("p2"));
    }

    #[test]
    fn test_total_of_empty_cart_is_zero() {
        let cart = store();
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_contains() {
        let cart = store();
        cart.add(snapshot("p1", Decimal::ONE), 1, None, None);
        assert!(cart.contains(&ProductId::new("p1")));
        assert!(!cart.contains(&ProductId::new("p2")));
    }

    #[test]
    fn test_clear_empties_and_persists() {
        let storage = Arc::new(MemoryStore::new());
        let cart = CartStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStore>);
        cart.add(snapshot("p1", Decimal::ONE), 2, None, None);
        cart.clear();

        assert!(cart.snapshot().is_empty());
        assert_eq!(storage.get(keys::CART).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_persist_reload_round_trip() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        let cart = CartStore::load(Arc::clone(&storage));
        cart.add(snapshot("p1", Decimal::new(1250, 2)), 2, None, None);
        cart.add(
            snapshot("p2", Decimal::new(300, 2)),
            1,
            Some("green".to_string()),
            Some("M".to_string()),
        );
        let before = cart.snapshot();

        let reloaded = CartStore::load(storage);
        let after = reloaded.snapshot();
        assert_eq!(after.len(), before.len());
        for entry in &before {
            assert!(after.contains(entry), "missing entry after reload: {entry:?}");
        }
        assert_eq!(reloaded.total(), cart.total());
    }

    #[test]
    fn test_corrupt_state_loads_as_empty() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        storage.set(keys::CART, "{not json").unwrap();

        let cart = CartStore::load(storage);
        assert!(cart.snapshot().is_empty());
    }

    #[test]
    fn test_subscribe_sees_mutations() {
        let cart = store();
        let rx = cart.subscribe();
        cart.add(snapshot("p1", Decimal::TEN), 2, None, None);

        let summary = rx.borrow().clone();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total, Decimal::new(20, 0));
    }
}
