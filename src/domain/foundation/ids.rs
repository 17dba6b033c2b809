//! Strongly-typed identifier value objects.
//!
//! Every identifier in the wizard comes from static page content or from the
//! remote store, so all of them wrap strings rather than UUIDs.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use super::ValidationError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier, rejecting blank values.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(value))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValidationError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

string_id!(
    /// Identifier of an option group within a step (e.g. brand group "1").
    GroupId,
    "group_id"
);

string_id!(
    /// Identifier of a selectable option within a group (e.g. "Toyota").
    OptionId,
    "option_id"
);

string_id!(
    /// Identifier of a recommendation item as issued by the remote store.
    ItemId,
    "item_id"
);
