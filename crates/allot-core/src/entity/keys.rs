//! String keys for entities.
//!
//! Every per-cargo or per-town mapping is keyed by one of these, never by
//! the entity value itself.

macro_rules! define_key_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Create a key from any string-like value.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }
    };
}

define_key_type!(
    /// Carrier identifier, unique within an inventory.
    CargoId
);
define_key_type!(
    /// Composite `city~town` identifier. Kept opaque inside the model.
    TownId
);
define_key_type!(
    /// Depot (inventory) identifier.
    DepotId
);
define_key_type!(
    /// Categorical town-group label such as `A`, `B` or `C`.
    TownGroup
);

impl DepotId {
    /// Identifier used when the input has no depot table.
    pub fn single() -> Self {
        Self::new("default")
    }
}
