//! Cart route handlers.
//!
//! Line-level mutations (update, remove) key on the full product/color/size
//! combination; removing every variant of a product at once is its own
//! endpoint so a caller can never drop sibling variants by accident.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clementine_core::ProductId;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::stores::{CartEntry, CartStore, CartSummary, LineKey};

/// Cart contents with aggregate figures.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    /// Current lines.
    pub items: Vec<CartEntry>,
    /// Sum of quantities.
    pub count: u64,
    /// Sum of line totals.
    pub total: Decimal,
}

fn view(cart: &CartStore) -> CartView {
    let summary = cart.summary();
    CartView {
        items: cart.snapshot(),
        count: summary.count,
        total: summary.total,
    }
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
    pub selected_color: Option<String>,
    pub selected_size: Option<String>,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub quantity: i64,
    pub selected_color: Option<String>,
    pub selected_size: Option<String>,
}

/// Line removal request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLineRequest {
    pub product_id: ProductId,
    pub selected_color: Option<String>,
    pub selected_size: Option<String>,
}

/// Whole-product removal request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveProductRequest {
    pub product_id: ProductId,
}

/// Show the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(view(state.cart()))
}

/// Aggregate figures only (for the header badge).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartSummary> {
    Json(state.cart().summary())
}

/// Add a product to the cart.
///
/// A line with the same product/color/size combination absorbs the quantity;
/// otherwise a new line is created.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(form): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .get(&form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    state.cart().add(
        product.snapshot(),
        form.quantity.unwrap_or(1),
        form.selected_color,
        form.selected_size,
    );
    state
        .toasts()
        .success(format!("{} added to cart", product.name));

    Ok(Json(view(state.cart())))
}

/// Overwrite a line's quantity; anything below 1 removes the line.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(form): Json<UpdateCartRequest>,
) -> Json<CartView> {
    let key = LineKey {
        product_id: form.product_id,
        color: form.selected_color,
        size: form.selected_size,
    };
    state.cart().set_quantity(&key, form.quantity);
    Json(view(state.cart()))
}

/// Remove one line identified by its full variant key.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(form): Json<RemoveLineRequest>,
) -> Json<CartView> {
    let key = LineKey {
        product_id: form.product_id,
        color: form.selected_color,
        size: form.selected_size,
    };
    state.cart().remove_line(&key);
    state.toasts().info("Removed from cart");
    Json(view(state.cart()))
}

/// Remove every line for a product, across all variants.
#[instrument(skip(state))]
pub async fn remove_product(
    State(state): State<AppState>,
    Json(form): Json<RemoveProductRequest>,
) -> Json<CartView> {
    state.cart().remove_product(&form.product_id);
    state.toasts().info("Removed from cart");
    Json(view(state.cart()))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> StatusCode {
    state.cart().clear();
    StatusCode::NO_CONTENT
}
