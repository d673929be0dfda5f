//! Wishlist route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clementine_core::ProductId;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::stores::WishlistEntry;

/// Wishlist contents.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistView {
    /// Current entries in insertion order.
    pub items: Vec<WishlistEntry>,
    /// Entry count.
    pub count: usize,
}

/// Add/remove request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    pub product_id: ProductId,
}

fn view(state: &AppState) -> WishlistView {
    let items = state.wishlist().snapshot();
    WishlistView {
        count: items.len(),
        items,
    }
}

/// Show the wishlist.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<WishlistView> {
    Json(view(&state))
}

/// Add a product to the wishlist. Adding an already-wishlisted product is a
/// no-op.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(form): Json<WishlistRequest>,
) -> Result<Json<WishlistView>> {
    let product = state
        .catalog()
        .get(&form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    if state.wishlist().add(product.snapshot()) {
        state
            .toasts()
            .success(format!("{} added to wishlist", product.name));
    }

    Ok(Json(view(&state)))
}

/// Remove a product from the wishlist.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(form): Json<WishlistRequest>,
) -> Json<WishlistView> {
    state.wishlist().remove(&form.product_id);
    state.toasts().info("Removed from wishlist");
    Json(view(&state))
}

/// Empty the wishlist.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> StatusCode {
    state.wishlist().clear();
    StatusCode::NO_CONTENT
}
