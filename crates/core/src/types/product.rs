//! Catalog, cart and product shapes as the dialogue sees them.
//!
//! The commerce API returns differently shaped product records depending on
//! the endpoint. Each use site gets its own type instead of one partially
//! filled record.

use serde::{Deserialize, Serialize};

use super::id::{CartItemId, ProductId};

/// A product as listed in the catalog menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
}

/// One line of a customer's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Cart item ID (used to remove the line).
    pub item_id: CartItemId,
    /// Product the line refers to.
    pub product_id: ProductId,
    /// Product name.
    pub name: String,
    /// Product description.
    pub description: String,
    /// Number of units in the cart.
    pub quantity: u32,
    /// Formatted line price, tax included.
    pub price: String,
}

/// A customer's cart with its formatted total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart lines.
    pub entries: Vec<CartEntry>,
    /// Formatted cart total, tax included.
    pub total: String,
}

impl Cart {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Full product record shown on the product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Formatted unit price, tax included.
    pub price: Option<String>,
    /// File ID of the main product image.
    pub main_image_id: Option<String>,
}
