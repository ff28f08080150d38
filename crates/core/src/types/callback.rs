//! Callback data grammar shared by keyboard builders and state handlers.
//!
//! Buttons carry either a bare command token (`cart`, `menu`, `email`,
//! `back`), a bare id, or a `"<quantity>,<productId>"` pair.

use super::id::{CartItemId, ProductId};

/// Callback data opening the cart.
pub const CART: &str = "cart";
/// Callback data returning to the catalog menu from the cart.
pub const MENU: &str = "menu";
/// Callback data starting checkout.
pub const CHECKOUT: &str = "email";
/// Callback data returning to the catalog menu from a product card.
pub const BACK: &str = "back";

/// Quantities offered on a product card.
pub const QUANTITY_OPTIONS: [u32; 3] = [1, 3, 5];

/// Callback data split into a command and an optional product id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackPayload<'a> {
    /// Everything before the first comma, or the whole payload.
    pub command: &'a str,
    /// Everything after the first comma, if there was one.
    pub product_id: Option<&'a str>,
}

impl<'a> CallbackPayload<'a> {
    /// Split callback data on its first comma.
    ///
    /// ```
    /// use shopbot_core::CallbackPayload;
    ///
    /// let payload = CallbackPayload::parse("3,abc123");
    /// assert_eq!(payload.command, "3");
    /// assert_eq!(payload.product_id, Some("abc123"));
    ///
    /// let payload = CallbackPayload::parse("back");
    /// assert_eq!(payload.command, "back");
    /// assert_eq!(payload.product_id, None);
    /// ```
    #[must_use]
    pub fn parse(data: &'a str) -> Self {
        match data.split_once(',') {
            Some((command, product_id)) => Self {
                command,
                product_id: Some(product_id),
            },
            None => Self {
                command: data,
                product_id: None,
            },
        }
    }

    /// Encode a quantity selection for a product.
    #[must_use]
    pub fn quantity(quantity: u32, product_id: &ProductId) -> String {
        format!("{quantity},{product_id}")
    }
}

/// What a button on a product card asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionCommand {
    /// Return to the catalog menu.
    Back,
    /// Open the cart.
    Cart,
    /// Put `quantity` units of a product into the cart.
    Add {
        /// One of [`QUANTITY_OPTIONS`].
        quantity: u32,
        /// Product to add; absent when the payload had no comma.
        product_id: Option<ProductId>,
    },
    /// Anything else.
    Unknown(String),
}

impl DescriptionCommand {
    /// Interpret callback data received on a product card.
    #[must_use]
    pub fn parse(data: &str) -> Self {
        let payload = CallbackPayload::parse(data);
        match payload.command {
            BACK => Self::Back,
            CART => Self::Cart,
            command => match QUANTITY_OPTIONS
                .into_iter()
                .find(|quantity| quantity.to_string() == command)
            {
                Some(quantity) => Self::Add {
                    quantity,
                    product_id: payload.product_id.map(ProductId::from),
                },
                None => Self::Unknown(command.to_owned()),
            },
        }
    }
}

/// What a button on the catalog menu asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuSelection {
    /// Open the cart.
    Cart,
    /// Show a product card.
    Product(ProductId),
}

impl MenuSelection {
    /// Interpret callback data received on the catalog menu.
    #[must_use]
    pub fn parse(data: &str) -> Self {
        if data == CART {
            Self::Cart
        } else {
            Self::Product(ProductId::from(data))
        }
    }
}

/// What a button on the cart asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartSelection {
    /// Return to the catalog menu.
    Menu,
    /// Ask for an email to check out.
    Checkout,
    /// Remove a cart line.
    Remove(CartItemId),
}

impl CartSelection {
    /// Interpret callback data received on the cart.
    #[must_use]
    pub fn parse(data: &str) -> Self {
        match data {
            MENU => Self::Menu,
            CHECKOUT => Self::Checkout,
            item_id => Self::Remove(CartItemId::from(item_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_without_comma() {
        let payload = CallbackPayload::parse("back");
        assert_eq!(payload.command, "back");
        assert_eq!(payload.product_id, None);
    }

    #[test]
    fn test_payload_splits_on_first_comma_only() {
        let payload = CallbackPayload::parse("3,abc,def");
        assert_eq!(payload.command, "3");
        assert_eq!(payload.product_id, Some("abc,def"));
    }

    #[test]
    fn test_quantity_encoding_parses_back() {
        let data = CallbackPayload::quantity(5, &ProductId::new("p-1"));
        assert_eq!(data, "5,p-1");
        assert_eq!(
            DescriptionCommand::parse(&data),
            DescriptionCommand::Add {
                quantity: 5,
                product_id: Some(ProductId::new("p-1")),
            }
        );
    }

    #[test]
    fn test_description_commands() {
        assert_eq!(DescriptionCommand::parse("back"), DescriptionCommand::Back);
        assert_eq!(DescriptionCommand::parse("cart"), DescriptionCommand::Cart);
        assert_eq!(
            DescriptionCommand::parse("1"),
            DescriptionCommand::Add {
                quantity: 1,
                product_id: None,
            }
        );
        assert_eq!(
            DescriptionCommand::parse("2,p-1"),
            DescriptionCommand::Unknown("2".to_string())
        );
        assert_eq!(
            DescriptionCommand::parse("03,p-1"),
            DescriptionCommand::Unknown("03".to_string())
        );
        assert_eq!(
            DescriptionCommand::parse("+5,p-1"),
            DescriptionCommand::Unknown("+5".to_string())
        );
        assert_eq!(
            DescriptionCommand::parse("checkout"),
            DescriptionCommand::Unknown("checkout".to_string())
        );
    }

    #[test]
    fn test_menu_and_cart_selections() {
        assert_eq!(MenuSelection::parse("cart"), MenuSelection::Cart);
        assert_eq!(
            MenuSelection::parse("p-9"),
            MenuSelection::Product(ProductId::new("p-9"))
        );
        assert_eq!(CartSelection::parse("menu"), CartSelection::Menu);
        assert_eq!(CartSelection::parse("email"), CartSelection::Checkout);
        assert_eq!(
            CartSelection::parse("item-4"),
            CartSelection::Remove(CartItemId::new("item-4"))
        );
    }
}
