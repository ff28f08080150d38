//! Telegram shop bot library.
//!
//! Exposes the dialogue engine and its collaborators so the binary and the
//! integration tests can assemble them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod dialogue;
pub mod error;
pub mod moltin;
pub mod session;
pub mod telegram;
pub mod telemetry;
