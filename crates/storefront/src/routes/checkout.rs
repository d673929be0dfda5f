//! Checkout route handler.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::instrument;

use crate::commerce::Order;
use crate::error::AppError;
use crate::services::{BillingDetails, CheckoutError};
use crate::state::AppState;

/// Successful checkout response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// The created order.
    pub order: Order,
    /// Where the UI should navigate next.
    pub redirect: &'static str,
}

/// Validation failure response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationBody {
    /// One message per problem.
    pub errors: Vec<String>,
}

/// Gateway failure response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GatewayBody {
    error: String,
}

/// Validate billing details and submit the cart as an order.
///
/// - `201` with a confirmation redirect on success (cart cleared)
/// - `400` with field messages when validation fails or the cart is empty
/// - `401` with a sign-in redirect when the backend rejects the session
/// - `502` when the backend fails; the cart is untouched so the shopper can
///   retry
#[instrument(skip(state, billing))]
pub async fn submit(
    State(state): State<AppState>,
    Json(billing): Json<BillingDetails>,
) -> Response {
    match state
        .checkout()
        .place_order(state.commerce(), &billing)
        .await
    {
        Ok(order) => (
            StatusCode::CREATED,
            Json(CheckoutResponse {
                order,
                redirect: "/order-confirmation",
            }),
        )
            .into_response(),
        Err(CheckoutError::Validation(errors)) => {
            (StatusCode::BAD_REQUEST, Json(ValidationBody { errors })).into_response()
        }
        Err(CheckoutError::EmptyCart) => (
            StatusCode::BAD_REQUEST,
            Json(ValidationBody {
                errors: vec!["Your cart is empty".to_string()],
            }),
        )
            .into_response(),
        Err(CheckoutError::SignInRequired) => {
            AppError::Unauthorized("sign-in required to place an order".to_string())
                .into_response()
        }
        Err(CheckoutError::Gateway(message)) => {
            (StatusCode::BAD_GATEWAY, Json(GatewayBody { error: message })).into_response()
        }
    }
}
