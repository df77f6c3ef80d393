//! Newtype identifiers for orders and stock-keeping units.
//!
//! Use the `define_id!` macro to create type-safe string identifiers that
//! prevent accidentally passing a SKU where an order id is expected.

/// Macro to define a type-safe string identifier.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>`, `From<String>`, `AsRef<str>` and `Borrow<str>`, so maps
///   keyed by the identifier can be queried with a plain `&str`
///
/// # Example
///
/// ```rust
/// # use fulfillment_core::define_id;
/// define_id!(ShipmentId);
/// define_id!(PackageId);
///
/// let shipment = ShipmentId::new("SHIP-1");
/// let package = PackageId::new("SHIP-1");
///
/// // These are different types, so this won't compile:
/// // let _: ShipmentId = package;
/// assert_eq!(shipment.as_str(), package.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the identifier and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
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

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ::std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(OrderId);
define_id!(Sku);

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_display_matches_inner_value() {
        let id = OrderId::new("extern_id_1154539615776");
        assert_eq!(id.to_string(), "extern_id_1154539615776");
    }

    #[test]
    fn test_map_lookup_by_str() {
        let mut levels = BTreeMap::new();
        levels.insert(Sku::from("GN-00-01A"), 202);

        assert_eq!(levels.get("GN-00-01A"), Some(&202));
        assert_eq!(levels.get("missing"), None);
    }

    #[test]
    fn test_serializes_transparently() {
        let json = serde_json::to_string(&Sku::new("SETTLERS1")).unwrap_or_default();
        assert_eq!(json, "\"SETTLERS1\"");
    }
}
