//! `MoltinClient`: the REST implementation of [`CommerceApi`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shopbot_core::{Cart, CartItemId, CatalogEntry, ChatId, CustomerId, Email, ProductDetail, ProductId};
use tracing::{debug, instrument};

use super::auth::TokenProvider;
use super::types::{
    CartEnvelope, CartItemRequest, CustomerData, CustomerRequest, Envelope, FileData, ProductData,
    RequestEnvelope, convert_cart, convert_catalog_entry, convert_product,
};
use super::{CommerceApi, MoltinError};
use crate::config::MoltinConfig;

/// Client for the Moltin REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and the token.
#[derive(Clone)]
pub struct MoltinClient {
    inner: Arc<MoltinClientInner>,
}

struct MoltinClientInner {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenProvider,
}

impl std::fmt::Debug for MoltinClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoltinClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl MoltinClient {
    /// Create a new Moltin API client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(config: &MoltinConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            inner: Arc::new(MoltinClientInner {
                http,
                base_url: config.api_url.clone(),
                tokens: TokenProvider::new(config),
            }),
        }
    }

    /// Send an authenticated request and return the raw response body.
    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String, MoltinError> {
        let token = self.inner.tokens.valid_token(&self.inner.http).await?;

        let mut request = self
            .inner
            .http
            .request(method, format!("{}{path}", self.inner.base_url))
            .bearer_auth(token.expose_secret());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            // Token revoked early; force a fresh one on the next call
            self.inner.tokens.invalidate().await;
        }

        if status == StatusCode::NOT_FOUND {
            return Err(MoltinError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            return Err(api_error(status, path, &response_text));
        }

        Ok(response_text)
    }

    /// `GET` a path and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, MoltinError> {
        let body = self.send::<()>(Method::GET, path, None).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(
                error = %e,
                path = %path,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse Moltin response"
            );
            MoltinError::Parse(e)
        })
    }

    async fn fetch_product(&self, product_id: &ProductId) -> Result<ProductDetail, MoltinError> {
        let envelope: Envelope<ProductData> = self
            .get_json(&format!("/v2/products/{}", encode(product_id.as_str())))
            .await?;
        Ok(convert_product(envelope.data))
    }
}

impl CommerceApi for MoltinClient {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<CatalogEntry>, MoltinError> {
        let envelope: Envelope<Vec<ProductData>> = self.get_json("/v2/products").await?;
        debug!(count = envelope.data.len(), "Fetched catalog");
        Ok(envelope.data.into_iter().map(convert_catalog_entry).collect())
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn get_product(&self, product_id: &ProductId) -> Result<ProductDetail, MoltinError> {
        self.fetch_product(product_id).await
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn get_product_image_url(&self, product_id: &ProductId) -> Result<String, MoltinError> {
        let product = self.fetch_product(product_id).await?;
        let file_id = product.main_image_id.ok_or_else(|| {
            MoltinError::NotFound(format!("Main image for product {product_id}"))
        })?;

        let envelope: Envelope<FileData> = self
            .get_json(&format!("/v2/files/{}", encode(&file_id)))
            .await?;
        Ok(envelope.data.link.href)
    }

    #[instrument(skip(self), fields(cart = %cart, product_id = %product_id))]
    async fn add_to_cart(
        &self,
        cart: ChatId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), MoltinError> {
        let body = RequestEnvelope {
            data: CartItemRequest {
                id: product_id.as_str(),
                kind: "cart_item",
                quantity,
            },
        };
        self.send(Method::POST, &format!("/v2/carts/{cart}/items"), Some(&body))
            .await?;
        debug!(quantity, "Added product to cart");
        Ok(())
    }

    #[instrument(skip(self), fields(cart = %cart))]
    async fn get_cart(&self, cart: ChatId) -> Result<Cart, MoltinError> {
        let envelope: CartEnvelope = self.get_json(&format!("/v2/carts/{cart}/items")).await?;
        Ok(convert_cart(envelope))
    }

    #[instrument(skip(self), fields(cart = %cart, item_id = %item_id))]
    async fn remove_from_cart(&self, cart: ChatId, item_id: &CartItemId) -> Result<(), MoltinError> {
        self.send::<()>(
            Method::DELETE,
            &format!("/v2/carts/{cart}/items/{}", encode(item_id.as_str())),
            None,
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self, email), fields(name = %name))]
    async fn create_customer(&self, name: &str, email: &Email) -> Result<CustomerId, MoltinError> {
        let body = RequestEnvelope {
            data: CustomerRequest {
                kind: "customer",
                name,
                email: email.as_str(),
            },
        };
        let response = self.send(Method::POST, "/v2/customers", Some(&body)).await?;
        let envelope: Envelope<CustomerData> = serde_json::from_str(&response)?;
        debug!(customer_id = %envelope.data.id, "Created customer");
        Ok(CustomerId::from(envelope.data.id))
    }
}

/// Turn a non-success response into an error.
///
/// Logged at debug only; the failed turn is reported once by the dialogue.
fn api_error(status: StatusCode, path: &str, body: &str) -> MoltinError {
    debug!(
        status = %status,
        path = %path,
        body = %body.chars().take(500).collect::<String>(),
        "Moltin API returned non-success status"
    );
    MoltinError::Api {
        status: status.as_u16(),
        body: body.chars().take(200).collect(),
    }
}

/// Percent-encode a path segment taken from callback data.
fn encode(segment: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(segment)
}
