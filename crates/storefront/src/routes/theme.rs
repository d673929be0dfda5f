//! Theme route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::state::AppState;
use crate::stores::Theme;

/// Theme request/response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeBody {
    /// "light" or "dark".
    pub theme: Theme,
}

/// Current theme.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<ThemeBody> {
    Json(ThemeBody {
        theme: state.theme().current(),
    })
}

/// Set and persist the theme.
#[instrument(skip(state))]
pub async fn set(State(state): State<AppState>, Json(body): Json<ThemeBody>) -> Json<ThemeBody> {
    state.theme().set(body.theme);
    Json(body)
}

/// Flip between light and dark.
#[instrument(skip(state))]
pub async fn toggle(State(state): State<AppState>) -> Json<ThemeBody> {
    Json(ThemeBody {
        theme: state.theme().toggle(),
    })
}
