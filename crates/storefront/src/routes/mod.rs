//! HTTP route handlers for the storefront JSON facade.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check
//!
//! # Products
//! GET  /products                - Product listing (?category=, ?q=)
//! GET  /products/flash-sale     - Discounted products, steepest first
//! GET  /products/best-selling   - Most-reviewed products
//! GET  /products/{id}           - Product detail (404 JSON on unknown id)
//! GET  /products/{id}/related   - Same-category products
//!
//! # Cart
//! GET  /cart                    - Cart contents with count and total
//! GET  /cart/count              - Aggregate figures only
//! POST /cart/add                - Add a product (merges matching lines)
//! POST /cart/update             - Overwrite a line's quantity
//! POST /cart/remove             - Remove one line (full variant key)
//! POST /cart/remove-product     - Remove every line for a product
//! POST /cart/clear              - Empty the cart
//!
//! # Wishlist
//! GET  /wishlist                - Wishlist contents
//! POST /wishlist/add            - Add a product (duplicate adds are no-ops)
//! POST /wishlist/remove         - Remove a product
//! POST /wishlist/clear          - Empty the wishlist
//!
//! # Checkout
//! POST /checkout                - Validate billing and submit the order
//!
//! # Auth (proxied to the commerce backend)
//! POST /auth/register           - Create an account, retain the session
//! POST /auth/login              - Sign in, retain the session
//! POST /auth/logout             - Drop the session
//! GET  /auth/session            - Session status
//!
//! # Account (requires a session; 401 responses carry a sign-in redirect)
//! GET  /account                 - Profile
//! PUT  /account                 - Update profile
//! GET  /account/orders          - Order history
//!
//! # Theme
//! GET  /theme                   - Current theme
//! PUT  /theme                   - Set theme
//! POST /theme/toggle            - Flip theme
//!
//! # Notifications
//! GET    /notifications         - Active notifications
//! DELETE /notifications/{id}    - Dismiss a notification
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod notifications;
pub mod products;
pub mod theme;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/flash-sale", get(products::flash_sale))
        .route("/best-selling", get(products::best_selling))
        .route("/{id}", get(products::show))
        .route("/{id}/related", get(products::related))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/remove-product", post(cart::remove_product))
        .route("/clear", post(cart::clear))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
        .route("/clear", post(wishlist::clear))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::profile).put(account::update_profile))
        .route("/orders", get(account::orders))
}

/// Create the theme routes router.
pub fn theme_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(theme::show).put(theme::set))
        .route("/toggle", post(theme::toggle))
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::index))
        .route("/{id}", delete(notifications::dismiss))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::submit))
        .nest("/wishlist", wishlist_routes())
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
        .nest("/theme", theme_routes())
        .nest("/notifications", notification_routes())
}
