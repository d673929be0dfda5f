//! Checkout orchestration flows against a stub order gateway.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;

use clementine_core::{OrderId, ProductId};
use clementine_storefront::commerce::{CommerceError, Order, OrderGateway, OrderRequest};
use clementine_storefront::services::{BillingDetails, CheckoutError, CheckoutService};
use clementine_storefront::storage::MemoryStore;
use clementine_storefront::stores::{CartStore, ProductSnapshot};
use clementine_storefront::toast::{Severity, ToastQueue};

/// What the stub backend should answer with.
enum StubResponse {
    Success,
    Unauthorized,
    Rejected(String),
}

/// Order gateway double that records every request it receives.
struct StubGateway {
    response: StubResponse,
    calls: Mutex<Vec<OrderRequest>>,
}

impl StubGateway {
    fn new(response: StubResponse) -> Self {
        Self {
            response,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<OrderRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl OrderGateway for StubGateway {
    async fn create_order(&self, request: &OrderRequest) -> Result<Order, CommerceError> {
        self.calls.lock().unwrap().push(request.clone());
        match &self.response {
            StubResponse::Success => Ok(Order {
                id: OrderId::new("ord-1"),
                items: request.items.clone(),
                total_price: request.total_price,
                created_at: None,
            }),
            StubResponse::Unauthorized => Err(CommerceError::Unauthorized),
            StubResponse::Rejected(message) => Err(CommerceError::Api {
                status: 422,
                message: message.clone(),
            }),
        }
    }
}

fn snapshot(id: &str, price: Decimal) -> ProductSnapshot {
    ProductSnapshot {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        price,
        image: None,
    }
}

fn valid_billing() -> BillingDetails {
    BillingDetails {
        first_name: "Grace".to_string(),
        street_address: "1 Harbor Street".to_string(),
        city: "Arlington".to_string(),
        phone: "555-0134".to_string(),
        email: "grace@example.com".to_string(),
        ..BillingDetails::default()
    }
}

fn fixture() -> (Arc<CartStore>, ToastQueue, CheckoutService) {
    let cart = Arc::new(CartStore::load(Arc::new(MemoryStore::new())));
    let toasts = ToastQueue::default();
    let checkout = CheckoutService::new(Arc::clone(&cart), toasts.clone());
    (cart, toasts, checkout)
}

fn severities(toasts: &ToastQueue) -> Vec<Severity> {
    toasts.active().iter().map(|n| n.severity).collect()
}

#[tokio::test]
async fn empty_cart_makes_no_network_call() {
    let (_cart, toasts, checkout) = fixture();
    let gateway = StubGateway::new(StubResponse::Success);

    let result = checkout.place_order(&gateway, &valid_billing()).await;

    assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    assert!(gateway.calls().is_empty(), "no order request must be sent");
    assert_eq!(severities(&toasts), [Severity::Error]);
}

#[tokio::test]
async fn invalid_billing_aborts_before_submission() {
    let (cart, _toasts, checkout) = fixture();
    cart.add(snapshot("p1", Decimal::TEN), 1, None, None);
    let gateway = StubGateway::new(StubResponse::Success);

    let result = checkout.place_order(&gateway, &BillingDetails::default()).await;

    match result {
        Err(CheckoutError::Validation(errors)) => assert!(!errors.is_empty()),
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert!(gateway.calls().is_empty());
    assert_eq!(cart.count(), 1, "cart must be untouched");
}

#[tokio::test]
async fn successful_checkout_clears_cart_and_signals_confirmation() {
    let (cart, toasts, checkout) = fixture();
    let price = Decimal::new(19200, 2);
    cart.add(snapshot("p1", price), 2, None, None);
    cart.add(snapshot("p1", price), 3, None, None);
    assert_eq!(cart.count(), 5);
    assert_eq!(cart.total(), price * Decimal::from(5u32));

    let gateway = StubGateway::new(StubResponse::Success);
    let order = checkout
        .place_order(&gateway, &valid_billing())
        .await
        .expect("order placed");

    assert_eq!(order.id, OrderId::new("ord-1"));
    assert_eq!(cart.count(), 0, "cart must be cleared");
    assert_eq!(severities(&toasts), [Severity::Success]);

    // The submitted request carries the merged line and the computed total
    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    let request = calls.first().unwrap();
    assert_eq!(request.items.len(), 1);
    assert_eq!(request.items.first().unwrap().quantity, 5);
    assert_eq!(request.total_price, price * Decimal::from(5u32));
}

#[tokio::test]
async fn unauthorized_checkout_signals_sign_in_and_keeps_cart() {
    let (cart, toasts, checkout) = fixture();
    cart.add(snapshot("p1", Decimal::TEN), 2, None, None);

    let gateway = StubGateway::new(StubResponse::Unauthorized);
    let result = checkout.place_order(&gateway, &valid_billing()).await;

    assert!(matches!(result, Err(CheckoutError::SignInRequired)));
    assert_eq!(cart.count(), 2, "cart must survive an auth failure");
    assert_eq!(severities(&toasts), [Severity::Error]);
}

#[tokio::test]
async fn backend_rejection_surfaces_server_message_and_keeps_cart() {
    let (cart, toasts, checkout) = fixture();
    cart.add(snapshot("p1", Decimal::TEN), 1, None, None);

    let gateway = StubGateway::new(StubResponse::Rejected("Item no longer available".to_string()));
    let result = checkout.place_order(&gateway, &valid_billing()).await;

    match result {
        Err(CheckoutError::Gateway(message)) => {
            assert_eq!(message, "Item no longer available");
        }
        other => panic!("expected gateway failure, got {other:?}"),
    }
    assert_eq!(cart.count(), 1, "cart must allow a retry");

    let messages: Vec<String> = toasts.active().iter().map(|n| n.message.clone()).collect();
    assert_eq!(messages, ["Item no longer available"]);
}
