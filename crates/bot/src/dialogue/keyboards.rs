//! Inline keyboards for each screen of the shopping flow.

use shopbot_core::callback::{BACK, CART, CHECKOUT, MENU, QUANTITY_OPTIONS};
use shopbot_core::{CallbackPayload, Cart, CatalogEntry, InlineButton, InlineKeyboard, ProductId};

/// Catalog menu: one button per product, then the cart.
#[must_use]
pub fn menu_keyboard(catalog: &[CatalogEntry]) -> InlineKeyboard {
    catalog
        .iter()
        .fold(InlineKeyboard::new(), |keyboard, product| {
            keyboard.row(vec![InlineButton::new(&product.name, product.id.as_str())])
        })
        .row(vec![InlineButton::new("Cart", CART)])
}

/// Cart: one remove button per line, then menu and checkout.
#[must_use]
pub fn cart_keyboard(cart: &Cart) -> InlineKeyboard {
    cart.entries
        .iter()
        .fold(InlineKeyboard::new(), |keyboard, entry| {
            keyboard.row(vec![InlineButton::new(
                format!("Remove {} from cart", entry.name),
                entry.item_id.as_str(),
            )])
        })
        .row(vec![
            InlineButton::new("Back to menu", MENU),
            InlineButton::new("Pay", CHECKOUT),
        ])
}

/// Product card: quantity options, back, cart.
#[must_use]
pub fn description_keyboard(product_id: &ProductId) -> InlineKeyboard {
    let quantities = QUANTITY_OPTIONS
        .iter()
        .map(|&quantity| {
            let label = if quantity == 1 {
                "1 pc.".to_string()
            } else {
                format!("{quantity} pcs.")
            };
            InlineButton::new(label, CallbackPayload::quantity(quantity, product_id))
        })
        .collect();

    InlineKeyboard::new()
        .row(quantities)
        .row(vec![InlineButton::new("Back", BACK)])
        .row(vec![InlineButton::new("Cart", CART)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopbot_core::{CartEntry, CartItemId};

    #[test]
    fn test_menu_keyboard() {
        let catalog = vec![
            CatalogEntry {
                id: ProductId::new("p-1"),
                name: "Salmon".to_string(),
            },
            CatalogEntry {
                id: ProductId::new("p-2"),
                name: "Trout".to_string(),
            },
        ];

        let keyboard = menu_keyboard(&catalog);

        assert_eq!(keyboard.rows.len(), 3);
        assert_eq!(keyboard.rows[0][0], InlineButton::new("Salmon", "p-1"));
        assert_eq!(keyboard.rows[2][0].data, "cart");
    }

    #[test]
    fn test_menu_keyboard_for_empty_catalog_still_has_cart() {
        let keyboard = menu_keyboard(&[]);
        assert_eq!(keyboard.rows, vec![vec![InlineButton::new("Cart", "cart")]]);
    }

    #[test]
    fn test_cart_keyboard() {
        let cart = Cart {
            entries: vec![CartEntry {
                item_id: CartItemId::new("item-1"),
                product_id: ProductId::new("p-1"),
                name: "Salmon".to_string(),
                description: String::new(),
                quantity: 3,
                price: "$36.00".to_string(),
            }],
            total: "$36.00".to_string(),
        };

        let keyboard = cart_keyboard(&cart);

        assert_eq!(
            keyboard.rows[0],
            vec![InlineButton::new("Remove Salmon from cart", "item-1")]
        );
        let last: Vec<_> = keyboard.rows[1].iter().map(|b| b.data.as_str()).collect();
        assert_eq!(last, vec!["menu", "email"]);
    }

    #[test]
    fn test_description_keyboard() {
        let keyboard = description_keyboard(&ProductId::new("p-1"));

        let quantities: Vec<_> = keyboard.rows[0].iter().map(|b| b.data.as_str()).collect();
        assert_eq!(quantities, vec!["1,p-1", "3,p-1", "5,p-1"]);
        assert_eq!(keyboard.rows[0][0].label, "1 pc.");
        assert_eq!(keyboard.rows[1][0].data, "back");
        assert_eq!(keyboard.rows[2][0].data, "cart");
    }
}
