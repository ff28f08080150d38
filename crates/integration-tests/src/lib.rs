//! Test harness for end-to-end dialogue scenarios.
//!
//! A [`TestContext`] wires the real [`DialogueEngine`] to an in-memory shop,
//! a sender that records every outbound action instead of calling Telegram,
//! and the in-memory session store. Nothing here needs a network.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopbot-integration-tests
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use shopbot::dialogue::DialogueEngine;
use shopbot::error::BotError;
use shopbot::moltin::{CommerceApi, MoltinError};
use shopbot::session::{InMemorySessionStore, SessionStore};
use shopbot::telegram::{ChatSender, TelegramError};
use shopbot_core::{
    Cart, CartEntry, CartItemId, CatalogEntry, ChatId, CustomerId, Email, InboundEvent, MessageId,
    OutboundAction, ProductDetail, ProductId, Sender, SessionState, UserId,
};
use tokio::sync::Mutex;

/// Engine type under test.
pub type TestEngine = DialogueEngine<FakeShop, RecordingSender, InMemorySessionStore>;

// =============================================================================
// Fake Shop
// =============================================================================

#[derive(Debug, Clone)]
struct Listing {
    detail: ProductDetail,
    unit_cents: u64,
    image_url: Option<String>,
}

#[derive(Debug, Clone)]
struct Line {
    item_id: CartItemId,
    product_id: ProductId,
    quantity: u32,
}

/// In-memory stand-in for the Moltin API.
///
/// Prices are whole cents and rendered like `$12.00`.
#[derive(Debug, Default)]
pub struct FakeShop {
    listings: Vec<Listing>,
    carts: Mutex<HashMap<ChatId, Vec<Line>>>,
    customers: Mutex<Vec<(String, Email)>>,
    next_item: AtomicU32,
    unavailable: AtomicBool,
}

impl FakeShop {
    /// A shop with two fish, both with pictures.
    #[must_use]
    pub fn with_fish() -> Self {
        Self::default()
            .product("salmon", "Salmon", 1200, Some("https://cdn.example.com/salmon.jpg"))
            .product("carp", "Carp", 450, Some("https://cdn.example.com/carp.jpg"))
    }

    /// Add a product to the catalog.
    #[must_use]
    pub fn product(mut self, id: &str, name: &str, unit_cents: u64, image_url: Option<&str>) -> Self {
        self.listings.push(Listing {
            detail: ProductDetail {
                id: ProductId::new(id),
                name: name.to_string(),
                description: format!("Fresh {}", name.to_lowercase()),
                price: Some(format_cents(unit_cents)),
                main_image_id: image_url.map(|_| format!("file-{id}")),
            },
            unit_cents,
            image_url: image_url.map(str::to_string),
        });
        self
    }

    /// Make every following call fail like an outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Customers created so far, as `(name, email)`.
    pub async fn customers(&self) -> Vec<(String, Email)> {
        self.customers.lock().await.clone()
    }

    fn check_available(&self) -> Result<(), MoltinError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(MoltinError::Api {
                status: 503,
                body: "Service Unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn listing(&self, product_id: &ProductId) -> Result<&Listing, MoltinError> {
        self.listings
            .iter()
            .find(|listing| &listing.detail.id == product_id)
            .ok_or_else(|| MoltinError::NotFound(format!("/v2/products/{product_id}")))
    }
}

impl CommerceApi for FakeShop {
    async fn list_products(&self) -> Result<Vec<CatalogEntry>, MoltinError> {
        self.check_available()?;
        Ok(self
            .listings
            .iter()
            .map(|listing| CatalogEntry {
                id: listing.detail.id.clone(),
                name: listing.detail.name.clone(),
            })
            .collect())
    }

    async fn get_product(&self, product_id: &ProductId) -> Result<ProductDetail, MoltinError> {
        self.check_available()?;
        Ok(self.listing(product_id)?.detail.clone())
    }

    async fn get_product_image_url(&self, product_id: &ProductId) -> Result<String, MoltinError> {
        self.check_available()?;
        self.listing(product_id)?
            .image_url
            .clone()
            .ok_or_else(|| MoltinError::NotFound(format!("Main image for product {product_id}")))
    }

    async fn add_to_cart(
        &self,
        cart: ChatId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), MoltinError> {
        self.check_available()?;
        self.listing(product_id)?;

        let mut carts = self.carts.lock().await;
        let lines = carts.entry(cart).or_default();
        if let Some(line) = lines.iter_mut().find(|line| &line.product_id == product_id) {
            line.quantity += quantity;
        } else {
            let n = self.next_item.fetch_add(1, Ordering::SeqCst) + 1;
            lines.push(Line {
                item_id: CartItemId::new(format!("item-{n}")),
                product_id: product_id.clone(),
                quantity,
            });
        }
        Ok(())
    }

    async fn get_cart(&self, cart: ChatId) -> Result<Cart, MoltinError> {
        self.check_available()?;

        let carts = self.carts.lock().await;
        let mut total = 0;
        let mut entries = Vec::new();
        for line in carts.get(&cart).into_iter().flatten() {
            let listing = self.listing(&line.product_id)?;
            let value = listing.unit_cents * u64::from(line.quantity);
            total += value;
            entries.push(CartEntry {
                item_id: line.item_id.clone(),
                product_id: line.product_id.clone(),
                name: listing.detail.name.clone(),
                description: listing.detail.description.clone(),
                quantity: line.quantity,
                price: format_cents(value),
            });
        }

        Ok(Cart {
            entries,
            total: format_cents(total),
        })
    }

    async fn remove_from_cart(&self, cart: ChatId, item_id: &CartItemId) -> Result<(), MoltinError> {
        self.check_available()?;

        let mut carts = self.carts.lock().await;
        let lines = carts.entry(cart).or_default();
        let before = lines.len();
        lines.retain(|line| &line.item_id != item_id);
        if lines.len() == before {
            return Err(MoltinError::NotFound(format!(
                "/v2/carts/{cart}/items/{item_id}"
            )));
        }
        Ok(())
    }

    async fn create_customer(&self, name: &str, email: &Email) -> Result<CustomerId, MoltinError> {
        self.check_available()?;

        let mut customers = self.customers.lock().await;
        customers.push((name.to_string(), email.clone()));
        Ok(CustomerId::new(format!("customer-{}", customers.len())))
    }
}

/// Render cents as `$x.yy`.
#[must_use]
pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

// =============================================================================
// Recording Sender
// =============================================================================

/// Chat sender that records actions instead of sending them.
#[derive(Debug, Default)]
pub struct RecordingSender {
    actions: Mutex<Vec<OutboundAction>>,
}

impl RecordingSender {
    /// Remove and return everything recorded so far.
    pub async fn take(&self) -> Vec<OutboundAction> {
        std::mem::take(&mut *self.actions.lock().await)
    }
}

impl ChatSender for RecordingSender {
    async fn perform(&self, action: &OutboundAction) -> Result<(), TelegramError> {
        self.actions.lock().await.push(action.clone());
        Ok(())
    }
}

// =============================================================================
// Test Context
// =============================================================================

/// Chat used by the scenarios unless a test needs a second one.
pub const CHAT: ChatId = ChatId::new(1001);

/// A dialogue engine with fake collaborators plus event builders.
#[derive(Debug)]
pub struct TestContext {
    /// Engine under test.
    pub engine: TestEngine,
    next_message: AtomicU32,
}

impl TestContext {
    /// Context with the default two-product shop.
    #[must_use]
    pub fn new() -> Self {
        Self::with_shop(FakeShop::with_fish())
    }

    /// Context around a specific shop.
    #[must_use]
    pub fn with_shop(shop: FakeShop) -> Self {
        Self {
            engine: DialogueEngine::new(shop, RecordingSender::default(), InMemorySessionStore::new()),
            next_message: AtomicU32::new(0),
        }
    }

    /// The fake shop.
    #[must_use]
    pub const fn shop(&self) -> &FakeShop {
        self.engine.commerce()
    }

    /// Actions sent since the last call.
    pub async fn sent(&self) -> Vec<OutboundAction> {
        self.engine.sender().take().await
    }

    /// State stored for `chat_id`.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory store fails, which it never does.
    pub async fn state(&self, chat_id: ChatId) -> Option<SessionState> {
        self.engine
            .sessions()
            .get(chat_id)
            .await
            .expect("in-memory store is infallible")
    }

    /// Put `chat_id` directly into `state`.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory store fails, which it never does.
    pub async fn park(&self, chat_id: ChatId, state: SessionState) {
        self.engine
            .sessions()
            .set(chat_id, state)
            .await
            .expect("in-memory store is infallible");
    }

    /// Send a text message from the default user.
    ///
    /// # Errors
    ///
    /// Whatever the turn fails with.
    pub async fn say(&self, chat_id: ChatId, text: &str) -> Result<SessionState, BotError> {
        self.engine.process(&self.text_event(chat_id, text)).await
    }

    /// A text message from the default user on a fresh message id.
    #[must_use]
    pub fn text_event(&self, chat_id: ChatId, text: &str) -> InboundEvent {
        InboundEvent::Message {
            chat_id,
            message_id: self.message_id(),
            sender: customer(),
            text: text.to_string(),
        }
    }

    /// A button press carrying `data` on a fresh message id.
    #[must_use]
    pub fn callback_event(&self, chat_id: ChatId, data: &str) -> InboundEvent {
        callback(chat_id, self.message_id(), data)
    }

    /// Press a button carrying `data` on message `message_id`.
    ///
    /// # Errors
    ///
    /// Whatever the turn fails with.
    pub async fn press(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        data: &str,
    ) -> Result<SessionState, BotError> {
        self.engine
            .process(&callback(chat_id, message_id, data))
            .await
    }

    /// Press a button on a fresh message id.
    ///
    /// # Errors
    ///
    /// Whatever the turn fails with.
    pub async fn tap(&self, chat_id: ChatId, data: &str) -> Result<SessionState, BotError> {
        self.press(chat_id, self.message_id(), data).await
    }

    fn message_id(&self) -> MessageId {
        let n = self.next_message.fetch_add(1, Ordering::SeqCst) + 1;
        MessageId::new(i32::try_from(n).unwrap_or(i32::MAX))
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn callback(chat_id: ChatId, message_id: MessageId, data: &str) -> InboundEvent {
    InboundEvent::Callback {
        callback_id: format!("cb-{}", message_id.get()),
        chat_id,
        message_id,
        sender: customer(),
        data: data.to_string(),
    }
}

/// The user driving the scenarios.
#[must_use]
pub fn customer() -> Sender {
    Sender {
        id: UserId::new(777),
        first_name: "Ann".to_string(),
    }
}
