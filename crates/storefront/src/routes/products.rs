//! Product route handlers.
//!
//! All responses are derived views over the catalog; nothing here mutates
//! state. An unknown product id yields a dedicated 404 JSON body rather than
//! an error page.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use clementine_core::ProductId;

use crate::catalog::{BEST_SELLING_LIMIT, FLASH_SALE_LIMIT, Product, RELATED_LIMIT, views};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product listing filters.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Restrict to one category.
    pub category: Option<String>,
    /// Case-insensitive name search.
    pub q: Option<String>,
}

/// Bound override for the bounded listings.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    /// Maximum number of products to return.
    pub limit: Option<usize>,
}

/// List products, optionally filtered by category and search query.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Product>>> {
    let products = match params.category.as_deref() {
        Some(category) => state.catalog().products_in_category(category).await?,
        None => state.catalog().all(),
    };

    let products = match params.q.as_deref() {
        Some(query) => views::search(&products, query),
        None => products,
    };

    Ok(Json(products))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    state
        .catalog()
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Products related to the given one (same category, excluding it).
#[instrument(skip(state))]
pub async fn related(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<LimitParams>,
) -> Json<Vec<Product>> {
    let id = ProductId::new(id);
    let limit = params.limit.unwrap_or(RELATED_LIMIT);
    Json(state.catalog().related(&id, limit))
}

/// Discounted products, steepest discount first.
#[instrument(skip(state))]
pub async fn flash_sale(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Json<Vec<Product>> {
    let limit = params.limit.unwrap_or(FLASH_SALE_LIMIT);
    Json(state.catalog().flash_sale(limit))
}

/// Most-reviewed products first.
#[instrument(skip(state))]
pub async fn best_selling(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Json<Vec<Product>> {
    let limit = params.limit.unwrap_or(BEST_SELLING_LIMIT);
    Json(state.catalog().best_selling(limit))
}
