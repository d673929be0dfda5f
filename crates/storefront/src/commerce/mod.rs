//! Commerce backend API client.
//!
//! The backend is an external collaborator with three surfaces: auth
//! (register/login), user profiles, and orders. This client owns the session
//! token after a successful login and attaches it as a bearer header; a 401
//! from any endpoint surfaces as [`CommerceError::Unauthorized`] so callers
//! can route the shopper to sign-in.
//!
//! # Example
//!
//! ```rust,ignore
//! use clementine_storefront::commerce::CommerceClient;
//!
//! let client = CommerceClient::new(config.commerce_api_url.clone());
//! client.login("shopper@example.com", "hunter2!").await?;
//! let orders = client.orders().await?;
//! ```

pub mod types;

pub use types::{
    AuthSession, LoginRequest, Order, OrderItem, OrderRequest, ProfileUpdate, RegisterRequest,
    UserProfile,
};

use std::sync::{Arc, RwLock};

use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Errors that can occur when talking to the commerce backend.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the session (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// The backend answered with a non-success status.
    #[error("commerce API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or a generic fallback.
        message: String,
    },

    /// Building a request URL failed.
    #[error("invalid commerce API URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Fallback message when the backend provides none.
const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Pull the `message` field out of an error body, falling back to a generic
/// message when the body is empty or not the expected shape.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_owned))
        .unwrap_or_else(|| GENERIC_ERROR.to_string())
}

// =============================================================================
// OrderGateway
// =============================================================================

/// Order submission seam.
///
/// The checkout orchestrator only needs order creation; keeping that one
/// operation behind a trait lets tests drive checkout against a stub instead
/// of a live backend.
pub trait OrderGateway: Send + Sync {
    /// Submit an order to the backend.
    fn create_order(
        &self,
        request: &OrderRequest,
    ) -> impl Future<Output = Result<Order, CommerceError>> + Send;
}

// =============================================================================
// CommerceClient
// =============================================================================

/// Client for the commerce backend REST API.
///
/// Cheaply cloneable; all clones share the session token.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl CommerceClient {
    /// Create a client against the given backend base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: Arc::new(CommerceClientInner {
                client: reqwest::Client::new(),
                base_url,
                token: RwLock::new(None),
            }),
        }
    }

    /// Whether a session token is currently held.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.inner
            .token
            .read()
            .expect("commerce token lock poisoned")
            .is_some()
    }

    /// Drop the held session token.
    pub fn sign_out(&self) {
        *self
            .inner
            .token
            .write()
            .expect("commerce token lock poisoned") = None;
    }

    fn store_token(&self, token: &str) {
        *self
            .inner
            .token
            .write()
            .expect("commerce token lock poisoned") = Some(SecretString::from(token.to_owned()));
    }

    fn endpoint(&self, path: &str) -> Result<Url, CommerceError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Attach the bearer token, when one is held.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self
            .inner
            .token
            .read()
            .expect("commerce token lock poisoned")
            .as_ref()
            .map(|t| t.expose_secret().to_owned());
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and map 401/non-success responses to errors.
    async fn execute(&self, request: RequestBuilder) -> Result<reqwest::Response, CommerceError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(CommerceError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CommerceError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(response)
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Register a new account and retain the returned session token.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError` if the request fails or the backend rejects
    /// the registration.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), CommerceError> {
        let url = self.endpoint("api/auth/register")?;
        let body = RegisterRequest {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let response = self.execute(self.inner.client.post(url).json(&body)).await?;
        let session: AuthSession = response.json().await?;
        self.store_token(&session.token);
        Ok(())
    }

    /// Log in and retain the returned session token.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Unauthorized` on bad credentials, or another
    /// `CommerceError` for transport/backend failures.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), CommerceError> {
        let url = self.endpoint("api/auth/login")?;
        let body = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let response = self.execute(self.inner.client.post(url).json(&body)).await?;
        let session: AuthSession = response.json().await?;
        self.store_token(&session.token);
        Ok(())
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Fetch the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Unauthorized` when no valid session is held.
    pub async fn me(&self) -> Result<UserProfile, CommerceError> {
        let url = self.endpoint("api/users/me")?;
        let response = self.execute(self.authorize(self.inner.client.get(url))).await?;
        Ok(response.json().await?)
    }

    /// Update the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Unauthorized` when no valid session is held.
    pub async fn update_me(&self, update: &ProfileUpdate) -> Result<UserProfile, CommerceError> {
        let url = self.endpoint("api/users/me")?;
        let response = self
            .execute(self.authorize(self.inner.client.put(url).json(update)))
            .await?;
        Ok(response.json().await?)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List the authenticated user's orders.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Unauthorized` when no valid session is held.
    pub async fn orders(&self) -> Result<Vec<Order>, CommerceError> {
        let url = self.endpoint("api/orders")?;
        let response = self.execute(self.authorize(self.inner.client.get(url))).await?;
        Ok(response.json().await?)
    }
}

impl OrderGateway for CommerceClient {
    async fn create_order(&self, request: &OrderRequest) -> Result<Order, CommerceError> {
        let url = self.endpoint("api/orders")?;
        let response = self
            .execute(self.authorize(self.inner.client.post(url).json(request)))
            .await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_extracts_server_message() {
        assert_eq!(
            error_message(r#"{"message": "Cart total mismatch"}"#),
            "Cart total mismatch"
        );
    }

    #[test]
    fn test_error_message_falls_back_on_junk() {
        assert_eq!(error_message(""), GENERIC_ERROR);
        assert_eq!(error_message("<html>502</html>"), GENERIC_ERROR);
        assert_eq!(error_message(r#"{"error": "other shape"}"#), GENERIC_ERROR);
    }

    #[test]
    fn test_token_lifecycle() {
        let client = CommerceClient::new(Url::parse("http://localhost:4000").unwrap());
        assert!(!client.is_signed_in());

        client.store_token("session-token");
        assert!(client.is_signed_in());

        client.sign_out();
        assert!(!client.is_signed_in());
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let client = CommerceClient::new(Url::parse("http://localhost:4000/").unwrap());
        let url = client.endpoint("api/orders").unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/api/orders");
    }
}
