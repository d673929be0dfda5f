//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::commerce::CommerceClient;
use crate::config::StorefrontConfig;
use crate::services::CheckoutService;
use crate::storage::KeyValueStore;
use crate::stores::{CartStore, ThemeStore, WishlistStore};
use crate::toast::ToastQueue;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// wired singletons: the shopper state stores, the notification queue, the
/// catalog, and the commerce client. Stores are injected here once at wiring
/// time; handlers receive them through this state rather than through any
/// ambient global.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storage: Arc<dyn KeyValueStore>,
    cart: Arc<CartStore>,
    wishlist: WishlistStore,
    theme: ThemeStore,
    toasts: ToastQueue,
    catalog: Catalog,
    commerce: CommerceClient,
    checkout: CheckoutService,
}

impl AppState {
    /// Wire the application state.
    ///
    /// Loads each store from `storage` (falling back to empty state where
    /// nothing is persisted) and connects the checkout orchestrator to the
    /// cart and notification queue.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
        catalog: Catalog,
    ) -> Self {
        let cart = Arc::new(CartStore::load(Arc::clone(&storage)));
        let wishlist = WishlistStore::load(Arc::clone(&storage));
        let theme = ThemeStore::load(Arc::clone(&storage));
        let toasts = ToastQueue::new(config.toast_duration);
        let commerce = CommerceClient::new(config.commerce_api_url.clone());
        let checkout = CheckoutService::new(Arc::clone(&cart), toasts.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                cart,
                wishlist,
                theme,
                toasts,
                catalog,
                commerce,
                checkout,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the persisted state storage.
    #[must_use]
    pub fn storage(&self) -> &dyn KeyValueStore {
        self.inner.storage.as_ref()
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the wishlist store.
    #[must_use]
    pub fn wishlist(&self) -> &WishlistStore {
        &self.inner.wishlist
    }

    /// Get a reference to the theme store.
    #[must_use]
    pub fn theme(&self) -> &ThemeStore {
        &self.inner.theme
    }

    /// Get a reference to the notification queue.
    #[must_use]
    pub fn toasts(&self) -> &ToastQueue {
        &self.inner.toasts
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the commerce backend client.
    #[must_use]
    pub fn commerce(&self) -> &CommerceClient {
        &self.inner.commerce
    }

    /// Get a reference to the checkout orchestrator.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }
}
