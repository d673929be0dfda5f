//! Account route handlers.
//!
//! Profile and order history live in the commerce backend. A 401 from any of
//! these calls maps to a JSON 401 carrying a sign-in redirect (see
//! `AppError`).

use axum::{Json, extract::State};
use tracing::instrument;

use crate::commerce::{Order, ProfileUpdate, UserProfile};
use crate::error::Result;
use crate::state::AppState;

/// Fetch the authenticated shopper's profile.
#[instrument(skip(state))]
pub async fn profile(State(state): State<AppState>) -> Result<Json<UserProfile>> {
    Ok(Json(state.commerce().me().await?))
}

/// Update the authenticated shopper's profile.
#[instrument(skip(state))]
pub async fn update_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>> {
    let profile = state.commerce().update_me(&update).await?;
    state.toasts().success("Profile updated");
    Ok(Json(profile))
}

/// Fetch the authenticated shopper's order history.
#[instrument(skip(state))]
pub async fn orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.commerce().orders().await?))
}
