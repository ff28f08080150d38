//! Message texts shown to customers.

use std::fmt::Write;

use shopbot_core::{Cart, Email, ProductDetail};

/// Heading above the catalog menu.
pub const MENU_PROMPT: &str = "Please choose:";
/// Prompt sent when checkout starts.
pub const EMAIL_PROMPT: &str = "Please send us your email address";
/// Toast shown after a quantity button is pressed.
pub const ADDED_TO_CART: &str = "Added to cart";

/// Render a cart: one block per line, then the total.
#[must_use]
pub fn cart_message(cart: &Cart) -> String {
    let mut message = String::new();
    if cart.is_empty() {
        message.push_str("Your cart is empty.\n\n");
    }
    for entry in &cart.entries {
        let _ = write!(
            message,
            "Product: {}\nDescription: {}\nAmount: {}\nPrice: {}\n\n",
            entry.name, entry.description, entry.quantity, entry.price
        );
    }
    let _ = write!(message, "Total: {}", cart.total);
    message
}

/// Render the caption of a product card.
#[must_use]
pub fn product_description(product: &ProductDetail) -> String {
    let mut message = format!("{}\n\n{}", product.name, product.description);
    if let Some(price) = &product.price {
        let _ = write!(message, "\nPrice: {price}");
    }
    message
}

/// Confirmation sent once an email address has been recorded.
#[must_use]
pub fn email_received(email: &Email) -> String {
    format!("You sent me this email: {email}\n\n{MENU_PROMPT}")
}

/// Reply to text that is not an email address.
#[must_use]
pub fn email_rejected(input: &str) -> String {
    format!("\"{}\" does not look like an email address. {EMAIL_PROMPT}", input.trim())
}
