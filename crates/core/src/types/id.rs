//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_str_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Identities in this
//! domain are opaque strings minted elsewhere (the catalog feed, the commerce
//! backend), so the wrappers carry a `String` rather than an integer.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use clementine_core::define_str_id;
/// define_str_id!(SkuId);
/// define_str_id!(VendorId);
///
/// let sku = SkuId::new("sku-1");
/// let vendor = VendorId::new("vendor-1");
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = vendor;
/// ```
#[macro_export]
macro_rules! define_str_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

// Define standard entity IDs
define_str_id!(ProductId);
define_str_id!(OrderId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_round_trip() {
        let id = ProductId::new("prod-42");
        assert_eq!(id.as_str(), "prod-42");
        assert_eq!(id.to_string(), "prod-42");
        assert_eq!(ProductId::from("prod-42"), id);
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = OrderId::new("ord-7");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"ord-7\"");

        let back: OrderId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
