//! Newtype IDs for type-safe entity references.
//!
//! Telegram hands out integer ids of different widths for chats, users and
//! messages; the commerce API uses opaque strings for products and cart
//! items. Both flavours get their own wrappers so a chat id can never be
//! passed where a message id is expected.

/// Macro to define a type-safe integer ID wrapper.
///
/// Creates a newtype wrapper around the given integer type with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - `new()` and `get()`
/// - `Display` and `From` conversions in both directions
///
/// # Example
///
/// ```rust
/// # use shopbot_core::define_id;
/// define_id!(ThreadId, i64);
///
/// let id = ThreadId::new(42);
/// assert_eq!(id.get(), 42);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $inner:ty) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            /// Wrap a raw id.
            #[must_use]
            pub const fn new(id: $inner) -> Self {
                Self(id)
            }

            /// Get the underlying value.
            #[must_use]
            pub const fn get(&self) -> $inner {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(id: $inner) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $inner {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Macro to define a type-safe string key issued by a remote system.
#[macro_export]
macro_rules! define_key {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw key.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the key as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

// Telegram ids
define_id!(ChatId, i64);
define_id!(UserId, u64);
define_id!(MessageId, i32);

// Commerce API ids
define_key!(ProductId);
define_key!(CartItemId);
define_key!(CustomerId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_id_display_and_conversion() {
        let id = ChatId::new(-100_123);
        assert_eq!(id.to_string(), "-100123");
        assert_eq!(i64::from(id), -100_123);
    }

    #[test]
    fn test_string_keys_are_transparent() {
        let id = ProductId::new("8e3c-11aa");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"8e3c-11aa\"");
        let back: ProductId = serde_json::from_str("\"8e3c-11aa\"").unwrap();
        assert_eq!(back, id);
    }
}
