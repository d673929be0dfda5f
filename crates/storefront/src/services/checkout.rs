//! Checkout orchestration.
//!
//! Reads the cart, validates the billing form, submits one order-creation
//! request, and settles the aftermath: a successful order clears the cart and
//! raises a success toast; any failure leaves the cart untouched so the
//! shopper can retry. An authentication failure is reported distinctly so the
//! facade can route the shopper to sign-in.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use clementine_core::Email;

use crate::commerce::{CommerceError, Order, OrderGateway, OrderItem, OrderRequest};
use crate::stores::CartStore;
use crate::toast::ToastQueue;

/// Billing form state, valid only for the duration of one checkout attempt.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingDetails {
    /// Required.
    #[serde(default)]
    pub first_name: String,
    /// Optional.
    #[serde(default)]
    pub last_name: String,
    /// Optional.
    #[serde(default)]
    pub company_name: String,
    /// Required.
    #[serde(default)]
    pub street_address: String,
    /// Optional.
    #[serde(default)]
    pub apartment: String,
    /// Required.
    #[serde(default)]
    pub city: String,
    /// Required.
    #[serde(default)]
    pub phone: String,
    /// Required; must be a well-formed address.
    #[serde(default)]
    pub email: String,
    /// Whether the shopper asked to keep this information for next time.
    #[serde(default)]
    pub save_info: bool,
}

impl BillingDetails {
    /// Validate the form, returning one message per problem.
    ///
    /// An empty result means the form is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let required = [
            (&self.first_name, "First name is required"),
            (&self.street_address, "Street address is required"),
            (&self.city, "City is required"),
            (&self.phone, "Phone number is required"),
            (&self.email, "Email address is required"),
        ];
        for (value, message) in required {
            if value.trim().is_empty() {
                errors.push(message.to_string());
            }
        }

        if !self.email.trim().is_empty() && Email::parse(self.email.trim()).is_err() {
            errors.push("Enter a valid email address".to_string());
        }

        errors
    }
}

/// Why a checkout attempt did not produce an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The billing form failed validation; nothing was submitted.
    #[error("billing details are invalid")]
    Validation(Vec<String>),

    /// The cart is empty; nothing was submitted.
    #[error("cart is empty")]
    EmptyCart,

    /// The backend rejected the session; the shopper must sign in.
    #[error("sign-in required")]
    SignInRequired,

    /// The backend rejected or failed the order; the cart is untouched.
    #[error("order submission failed: {0}")]
    Gateway(String),
}

/// The checkout orchestrator.
pub struct CheckoutService {
    cart: Arc<CartStore>,
    toasts: ToastQueue,
}

impl CheckoutService {
    /// Wire the orchestrator to the cart it reads and the queue it notifies.
    #[must_use]
    pub const fn new(cart: Arc<CartStore>, toasts: ToastQueue) -> Self {
        Self { cart, toasts }
    }

    /// Build the order request from the current cart contents.
    fn order_request(&self) -> OrderRequest {
        let items = self
            .cart
            .snapshot()
            .into_iter()
            .map(|entry| OrderItem {
                name: entry.product.name.clone(),
                price: entry.product.price,
                quantity: entry.quantity,
            })
            .collect();
        OrderRequest {
            items,
            total_price: self.cart.total(),
        }
    }

    /// Validate and submit the current cart as an order.
    ///
    /// On success the cart is cleared and a success toast raised. On any
    /// failure the cart is left untouched and an error toast raised; a 401
    /// from the backend is reported as [`CheckoutError::SignInRequired`].
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` describing why no order was placed.
    #[instrument(skip(self, gateway, billing))]
    pub async fn place_order<G: OrderGateway>(
        &self,
        gateway: &G,
        billing: &BillingDetails,
    ) -> Result<Order, CheckoutError> {
        let errors = billing.validate();
        if !errors.is_empty() {
            self.toasts.error("Please fill in all required fields");
            return Err(CheckoutError::Validation(errors));
        }

        if self.cart.count() == 0 {
            self.toasts.error("Your cart is empty");
            return Err(CheckoutError::EmptyCart);
        }

        let request = self.order_request();
        match gateway.create_order(&request).await {
            Ok(order) => {
                self.cart.clear();
                self.toasts.success("Order placed successfully");
                tracing::info!(order_id = %order.id, "order placed");
                Ok(order)
            }
            Err(CommerceError::Unauthorized) => {
                self.toasts.error("Please sign in to place your order");
                Err(CheckoutError::SignInRequired)
            }
            Err(CommerceError::Api { message, .. }) => {
                self.toasts.error(message.clone());
                Err(CheckoutError::Gateway(message))
            }
            Err(e) => {
                tracing::error!("order submission failed: {e}");
                self.toasts.error("Something went wrong placing your order");
                Err(CheckoutError::Gateway(e.to_string()))
            }
        }
    }
}
