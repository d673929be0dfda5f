//! Notification route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::state::AppState;
use crate::toast::Notification;

/// Currently active notifications in insertion order.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.toasts().active())
}

/// Dismiss a notification. Dismissing an expired or unknown id is a no-op,
/// so this always answers 204.
#[instrument(skip(state))]
pub async fn dismiss(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    state.toasts().dismiss(id);
    StatusCode::NO_CONTENT
}
