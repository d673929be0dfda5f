//! Shopper state stores.
//!
//! Each store owns its entry list, is the sole writer of its persisted key,
//! and follows the same pattern: load once at construction (falling back to
//! empty state on missing or corrupt data), mutate in memory under a lock,
//! persist the full document after every mutation, and publish a change
//! notification for subscribers. Persistence failures are logged and never
//! surfaced to callers - the in-memory state stays authoritative.

pub mod cart;
pub mod theme;
pub mod wishlist;

pub use cart::{CartEntry, CartStore, CartSummary, LineKey};
pub use theme::{Theme, ThemeStore};
pub use wishlist::{WishlistEntry, WishlistStore};

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use clementine_core::ProductId;

use crate::storage::KeyValueStore;

/// The slice of a catalog product that cart and wishlist entries carry.
///
/// Embedding the snapshot keeps totals and order lines computable without a
/// catalog lookup, and mirrors what the persisted documents hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    /// Product identity.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    /// Primary image reference, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Load a persisted entry list, falling back to empty on any failure.
///
/// Missing data, unreadable storage, and corrupt documents all degrade to an
/// empty collection; none of them are surfaced to the caller.
pub(crate) fn load_collection<T: DeserializeOwned>(
    storage: &dyn KeyValueStore,
    key: &str,
) -> Vec<T> {
    match storage.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(key, "discarding corrupt persisted state: {e}");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(key, "failed to read persisted state: {e}");
            Vec::new()
        }
    }
}

/// Persist an entry list as a JSON array under `key`.
///
/// Failures are logged, not propagated.
pub(crate) fn persist_collection<T: Serialize>(
    storage: &dyn KeyValueStore,
    key: &str,
    entries: &[T],
) {
    match serde_json::to_string(entries) {
        Ok(raw) => {
            if let Err(e) = storage.set(key, &raw) {
                tracing::error!(key, "failed to persist state: {e}");
            }
        }
        Err(e) => tracing::error!(key, "failed to serialize state: {e}"),
    }
}
