//! Newtype identifiers for board entities.
//!
//! The remote API hands out opaque string identifiers for boards, fields,
//! options, board items, and the issues / pull requests placed on a board.
//! Each is a distinct newtype so that a board-item id can never be passed
//! where a content id is expected, even though both are strings on the wire.
//!
//! Empty strings are rejected at construction: an empty id returned by the
//! remote side is indistinguishable from a missing one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An identifier was built from an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("identifier must not be empty")]
pub struct EmptyIdentifier;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display, and a
// TryFrom<String> that deserialization goes through.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = EmptyIdentifier;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value).ok_or(EmptyIdentifier)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — remote-assigned opaque strings
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies a project board. Used as the target of every mutation.
    BoardId
}

string_id! {
    /// Identifies a configurable field on a board (e.g. the "Status" field).
    FieldId
}

string_id! {
    /// Identifies one option of a single-select field.
    OptionId
}

string_id! {
    /// Identifies the membership record of an item on a board.
    ///
    /// Distinct from [`ContentId`]: the same issue has one content id but a
    /// different board-item id on every board it belongs to.
    BoardItemId
}

string_id! {
    /// Identifies the issue or pull request itself (its global node id).
    ContentId
}

// ---------------------------------------------------------------------------
// Identifiers — integer-backed
// ---------------------------------------------------------------------------

/// The number of a board within its owner, as it appears in the board URL
/// (`.../projects/<number>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardNumber(u64);

impl BoardNumber {
    /// Creates a new board number from a raw integer.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for BoardNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_not_an_identifier() {
        assert!(BoardItemId::new("").is_none());
        assert!(ContentId::new(String::new()).is_none());
    }

    #[test]
    fn empty_identifier_does_not_deserialize() {
        let err = serde_json::from_str::<BoardItemId>(r#""""#).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
        assert!(serde_json::from_str::<ContentId>(r#""""#).is_err());
        assert_eq!(BoardItemId::try_from(String::new()), Err(EmptyIdentifier));
    }

    #[test]
    fn identifier_round_trips_as_a_plain_string() {
        let id: BoardItemId = serde_json::from_str(r#""PVTI_1""#).unwrap();
        assert_eq!(id.as_str(), "PVTI_1");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""PVTI_1""#);
    }

    #[test]
    fn identifier_displays_its_raw_value() {
        let id = BoardId::new("PVT_kwDOAB").unwrap();
        assert_eq!(id.as_str(), "PVT_kwDOAB");
        assert_eq!(id.to_string(), "PVT_kwDOAB");
        assert_eq!(BoardNumber::new(7).to_string(), "7");
    }
}
