//! Shopbot Core - Shared types library.
//!
//! This crate provides the types shared by the bot and its tests:
//! - session states and the callback payload grammar that drives the dialogue
//! - catalog, cart and product shapes as seen by the dialogue
//! - inbound chat events and the outbound actions a handler produces
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no Redis access, no HTTP
//! clients. Everything that talks to Telegram or the commerce API lives in
//! the `shopbot` crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, emails, session states, products, chat events

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
