//! Moltin wire types and their conversion into dialogue shapes.
//!
//! Only the fields the bot reads are modelled; everything else in the
//! responses is ignored.

use serde::{Deserialize, Serialize};
use shopbot_core::{Cart, CartEntry, CartItemId, CatalogEntry, ProductDetail, ProductId};

/// `{"data": ...}` envelope used by every endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct Envelope<T> {
    pub data: T,
}

/// Cart listing envelope, which also carries the cart total.
#[derive(Debug, Deserialize)]
pub(super) struct CartEnvelope {
    pub data: Vec<CartItemData>,
    pub meta: CartMeta,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub meta: Option<ProductMeta>,
    #[serde(default)]
    pub relationships: Option<ProductRelationships>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductMeta {
    pub display_price: Option<DisplayPrice>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DisplayPrice {
    pub with_tax: FormattedAmount,
}

#[derive(Debug, Deserialize)]
pub(super) struct FormattedAmount {
    pub formatted: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductRelationships {
    pub main_image: Option<Relationship>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Relationship {
    pub data: Option<RelationshipData>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RelationshipData {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct FileData {
    pub link: FileLink,
}

#[derive(Debug, Deserialize)]
pub(super) struct FileLink {
    pub href: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CartItemData {
    pub id: String,
    #[serde(default)]
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub quantity: u32,
    pub meta: CartItemMeta,
}

#[derive(Debug, Deserialize)]
pub(super) struct CartItemMeta {
    pub display_price: CartItemDisplayPrice,
}

#[derive(Debug, Deserialize)]
pub(super) struct CartItemDisplayPrice {
    pub with_tax: CartItemAmounts,
}

#[derive(Debug, Deserialize)]
pub(super) struct CartItemAmounts {
    pub value: FormattedAmount,
}

#[derive(Debug, Deserialize)]
pub(super) struct CartMeta {
    pub display_price: DisplayPrice,
}

#[derive(Debug, Deserialize)]
pub(super) struct CustomerData {
    pub id: String,
}

/// Body of `POST /v2/carts/{ref}/items`.
#[derive(Debug, Serialize)]
pub(super) struct CartItemRequest<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub quantity: u32,
}

/// Body of `POST /v2/customers`.
#[derive(Debug, Serialize)]
pub(super) struct CustomerRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: &'a str,
    pub email: &'a str,
}

/// Request envelope mirroring [`Envelope`].
#[derive(Debug, Serialize)]
pub(super) struct RequestEnvelope<T> {
    pub data: T,
}

// =============================================================================
// Conversions
// =============================================================================

pub(super) fn convert_catalog_entry(data: ProductData) -> CatalogEntry {
    CatalogEntry {
        id: ProductId::from(data.id),
        name: data.name,
    }
}

pub(super) fn convert_product(data: ProductData) -> ProductDetail {
    let price = data
        .meta
        .and_then(|meta| meta.display_price)
        .map(|price| price.with_tax.formatted);
    let main_image_id = data
        .relationships
        .and_then(|rel| rel.main_image)
        .and_then(|image| image.data)
        .map(|image| image.id);

    ProductDetail {
        id: ProductId::from(data.id),
        name: data.name,
        description: data.description,
        price,
        main_image_id,
    }
}

pub(super) fn convert_cart(envelope: CartEnvelope) -> Cart {
    let entries = envelope
        .data
        .into_iter()
        .map(|item| CartEntry {
            item_id: CartItemId::from(item.id),
            product_id: ProductId::from(item.product_id),
            name: item.name,
            description: item.description,
            quantity: item.quantity,
            price: item.meta.display_price.with_tax.value.formatted,
        })
        .collect();

    Cart {
        entries,
        total: envelope.meta.display_price.with_tax.formatted,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PRODUCT_JSON: &str = r#"{
        "data": {
            "type": "product",
            "id": "9f5d-product",
            "name": "Salmon",
            "description": "Fresh Atlantic salmon",
            "sku": "salmon-1",
            "meta": {
                "display_price": {
                    "with_tax": {"amount": 1200, "currency": "USD", "formatted": "$12.00"},
                    "without_tax": {"amount": 1000, "currency": "USD", "formatted": "$10.00"}
                }
            },
            "relationships": {
                "main_image": {"data": {"type": "main_image", "id": "file-42"}}
            }
        }
    }"#;

    #[test]
    fn test_product_detail_conversion() {
        let envelope: Envelope<ProductData> = serde_json::from_str(PRODUCT_JSON).unwrap();
        let product = convert_product(envelope.data);

        assert_eq!(product.id, ProductId::new("9f5d-product"));
        assert_eq!(product.name, "Salmon");
        assert_eq!(product.description, "Fresh Atlantic salmon");
        assert_eq!(product.price.as_deref(), Some("$12.00"));
        assert_eq!(product.main_image_id.as_deref(), Some("file-42"));
    }

    #[test]
    fn test_product_without_image_or_price() {
        let envelope: Envelope<ProductData> =
            serde_json::from_str(r#"{"data": {"id": "p", "name": "Plain"}}"#).unwrap();
        let product = convert_product(envelope.data);

        assert!(product.price.is_none());
        assert!(product.main_image_id.is_none());
        assert!(product.description.is_empty());
    }

    #[test]
    fn test_catalog_listing() {
        let envelope: Envelope<Vec<ProductData>> = serde_json::from_str(
            r#"{"data": [{"id": "a", "name": "Carp"}, {"id": "b", "name": "Pike"}], "meta": {}}"#,
        )
        .unwrap();
        let catalog: Vec<_> = envelope.data.into_iter().map(convert_catalog_entry).collect();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[1].name, "Pike");
    }

    #[test]
    fn test_cart_conversion() {
        let json = r#"{
            "data": [{
                "id": "item-1",
                "type": "cart_item",
                "product_id": "9f5d-product",
                "name": "Salmon",
                "description": "Fresh Atlantic salmon",
                "quantity": 3,
                "meta": {
                    "display_price": {
                        "with_tax": {
                            "unit": {"amount": 1200, "formatted": "$12.00"},
                            "value": {"amount": 3600, "formatted": "$36.00"}
                        }
                    }
                }
            }],
            "meta": {
                "display_price": {
                    "with_tax": {"amount": 3600, "currency": "USD", "formatted": "$36.00"}
                }
            }
        }"#;
        let envelope: CartEnvelope = serde_json::from_str(json).unwrap();
        let cart = convert_cart(envelope);

        assert_eq!(cart.total, "$36.00");
        assert_eq!(cart.entries.len(), 1);
        let entry = &cart.entries[0];
        assert_eq!(entry.item_id, CartItemId::new("item-1"));
        assert_eq!(entry.product_id, ProductId::new("9f5d-product"));
        assert_eq!(entry.quantity, 3);
        assert_eq!(entry.price, "$36.00");
    }

    #[test]
    fn test_cart_item_request_shape() {
        let body = RequestEnvelope {
            data: CartItemRequest {
                id: "p-1",
                kind: "cart_item",
                quantity: 5,
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"data": {"id": "p-1", "type": "cart_item", "quantity": 5}})
        );
    }

    #[test]
    fn test_customer_request_shape() {
        let body = RequestEnvelope {
            data: CustomerRequest {
                kind: "customer",
                name: "Ann_tgid-7",
                email: "ann@example.com",
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "data": {"type": "customer", "name": "Ann_tgid-7", "email": "ann@example.com"}
            })
        );
    }
}
