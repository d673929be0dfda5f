//! Auth route handlers.
//!
//! Authentication lives in the commerce backend; these handlers proxy the
//! register/login calls and retain the session token inside the commerce
//! client. Credentials are skipped from tracing spans.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Registration form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Whether a session is currently held.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub signed_in: bool,
}

/// Create an account and retain the session.
#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> Result<Json<SessionStatus>> {
    state
        .commerce()
        .register(&form.name, &form.email, &form.password)
        .await?;
    state.toasts().success("Account created");
    Ok(Json(SessionStatus { signed_in: true }))
}

/// Sign in and retain the session.
#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Json<SessionStatus>> {
    state.commerce().login(&form.email, &form.password).await?;
    state.toasts().success("Signed in");
    Ok(Json(SessionStatus { signed_in: true }))
}

/// Drop the session.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Json<SessionStatus> {
    state.commerce().sign_out();
    state.toasts().info("Signed out");
    Json(SessionStatus { signed_in: false })
}

/// Session status.
#[instrument(skip(state))]
pub async fn session(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(SessionStatus {
        signed_in: state.commerce().is_signed_in(),
    })
}
