//! Newtype IDs for type-safe entity references.
//!
//! Fixture data identifies everything with strings (`"1"`, `"ORD-1247"`,
//! `"cheese"`), so every ID wraps a `String`. Use the `define_id!` macro to
//! create a wrapper that cannot be mixed up with IDs of other entities.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`
/// - `Display`, `From<&str>` and `From<String>` implementations
///
/// # Example
///
/// ```rust
/// # use wakalni_core::define_id;
/// define_id!(TableId);
/// define_id!(WaiterId);
///
/// let table = TableId::new("7");
/// let waiter = WaiterId::new("7");
/// assert_eq!(table.as_str(), waiter.as_str());
///
/// // These are different types, so this won't compile:
/// // let _: TableId = waiter;
/// ```
#[macro_export]
macro_rules! define_id {
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

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Catalog
define_id!(RestaurantId);
define_id!(MenuItemId);
define_id!(SupplementId);

// Cart
define_id!(LineId);

// Operations
define_id!(OrderId);
define_id!(InventoryItemId);
define_id!(TransactionId);
define_id!(PromotionId);
define_id!(DriverId);

// Accounts
define_id!(UserId);
define_id!(CustomerId);
define_id!(AdminId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_as_str() {
        let id = OrderId::new("ORD-1247");
        assert_eq!(id.as_str(), "ORD-1247");
        assert_eq!(id.to_string(), "ORD-1247");
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = SupplementId::from("cheese");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"cheese\"");

        let parsed: SupplementId = serde_json::from_str("\"olives\"").unwrap();
        assert_eq!(parsed, SupplementId::new("olives"));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut ids = vec![
            SupplementId::new("olives"),
            SupplementId::new("cheese"),
            SupplementId::new("mushrooms"),
        ];
        ids.sort();
        let sorted: Vec<&str> = ids.iter().map(SupplementId::as_str).collect();
        assert_eq!(sorted, ["cheese", "mushrooms", "olives"]);
    }
}
