//! Moltin commerce API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`, JSON:API style `{"data": ...}` envelopes
//! - OAuth client-credentials tokens owned by a [`TokenProvider`] and
//!   refreshed shortly before they expire
//! - No caching: every dialogue turn sees the live catalog and cart
//!
//! Handlers depend on the [`CommerceApi`] trait rather than on
//! [`MoltinClient`] so the dialogue can run against an in-memory shop in
//! tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopbot::moltin::{CommerceApi, MoltinClient};
//!
//! let client = MoltinClient::new(&config.moltin);
//! let catalog = client.list_products().await?;
//! client.add_to_cart(chat_id, &catalog[0].id, 3).await?;
//! let cart = client.get_cart(chat_id).await?;
//! ```

mod auth;
mod client;
mod types;

pub use auth::{AccessToken, TokenProvider};
pub use client::MoltinClient;

use std::future::Future;

use shopbot_core::{Cart, CartItemId, CatalogEntry, ChatId, CustomerId, Email, ProductDetail, ProductId};
use thiserror::Error;

/// Errors that can occur when interacting with the Moltin API.
#[derive(Debug, Error)]
pub enum MoltinError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Moltin API returned {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Obtaining an access token failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Catalog, cart and customer operations the dialogue needs.
///
/// Carts are keyed by the chat they belong to.
/// Uses native async fn in traits (Rust 2024 edition, no `async_trait` macro).
pub trait CommerceApi: Send + Sync {
    /// List every product in the catalog.
    fn list_products(&self) -> impl Future<Output = Result<Vec<CatalogEntry>, MoltinError>> + Send;

    /// Fetch a single product.
    fn get_product(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<ProductDetail, MoltinError>> + Send;

    /// Resolve the public URL of a product's main image.
    fn get_product_image_url(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<String, MoltinError>> + Send;

    /// Add `quantity` units of a product to a chat's cart.
    fn add_to_cart(
        &self,
        cart: ChatId,
        product_id: &ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<(), MoltinError>> + Send;

    /// Fetch a chat's cart with its total.
    fn get_cart(&self, cart: ChatId) -> impl Future<Output = Result<Cart, MoltinError>> + Send;

    /// Remove a line from a chat's cart.
    fn remove_from_cart(
        &self,
        cart: ChatId,
        item_id: &CartItemId,
    ) -> impl Future<Output = Result<(), MoltinError>> + Send;

    /// Create a customer record.
    fn create_customer(
        &self,
        name: &str,
        email: &Email,
    ) -> impl Future<Output = Result<CustomerId, MoltinError>> + Send;
}
