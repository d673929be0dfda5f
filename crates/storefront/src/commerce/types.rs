//! Wire types for the commerce backend.
//!
//! The backend speaks camelCase JSON; these types mirror its documents
//! exactly and stay free of storefront-internal concerns.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use clementine_core::OrderId;

/// Registration request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Plaintext password (hashed server-side).
    pub password: String,
}

/// Login request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Successful auth response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// The authenticated user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Shipping address, if one has been saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Partial profile update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New shipping address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product display name at purchase time.
    pub name: String,
    /// Unit price at purchase time.
    pub price: Decimal,
    /// Units purchased.
    pub quantity: u32,
}

/// Order creation request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Order lines.
    pub items: Vec<OrderItem>,
    /// Total across all lines.
    pub total_price: Decimal,
}

/// A created order as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Backend-assigned order identity.
    pub id: OrderId,
    /// Order lines.
    pub items: Vec<OrderItem>,
    /// Total across all lines.
    pub total_price: Decimal,
    /// When the order was placed.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
