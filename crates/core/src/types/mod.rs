//! Core types for the shop bot.
//!
//! This module provides type-safe wrappers for the dialogue's domain concepts.

pub mod callback;
pub mod chat;
pub mod email;
pub mod id;
pub mod product;
pub mod session;

pub use callback::{CallbackPayload, CartSelection, DescriptionCommand, MenuSelection};
pub use chat::{InboundEvent, InlineButton, InlineKeyboard, OutboundAction, Sender};
pub use email::{Email, EmailError};
pub use id::*;
pub use product::{Cart, CartEntry, CatalogEntry, ProductDetail};
pub use session::{SessionState, UnknownSessionState};
