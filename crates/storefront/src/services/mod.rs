//! Storefront services.

pub mod checkout;

pub use checkout::{BillingDetails, CheckoutError, CheckoutService};
