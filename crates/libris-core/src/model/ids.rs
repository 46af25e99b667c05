//! Store-assigned entity identifiers
//!
//! Identifiers are SQLite rowids. On the wire they are JSON numbers, but a
//! numeric string (`"12"`) is also accepted because older clients send the
//! author reference of a book as text.

use crate::errors::LibrisError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Either wire shape of an integer field
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum IntOrText {
    Int(i64),
    Text(String),
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = LibrisError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| LibrisError::InvalidId {
                        entity: $entity,
                        raw: s.to_string(),
                    })
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match IntOrText::deserialize(deserializer)? {
                    IntOrText::Int(raw) => Ok(Self(raw)),
                    IntOrText::Text(text) => text.parse().map_err(serde::de::Error::custom),
                }
            }
        }
    };
}

entity_id!(
    /// Identifier of an `authors` row
    AuthorId,
    "author"
);

entity_id!(
    /// Identifier of a `books` row
    BookId,
    "book"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_segment() {
        assert_eq!("42".parse::<BookId>().unwrap(), BookId::new(42));
        assert_eq!(
            "forty-two".parse::<AuthorId>().unwrap_err(),
            LibrisError::InvalidId {
                entity: "author",
                raw: "forty-two".to_string()
            }
        );
    }

    #[test]
    fn test_deserialize_number_or_text() {
        let from_number: AuthorId = serde_json::from_str("7").unwrap();
        let from_text: AuthorId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(from_number, from_text);
        assert!(serde_json::from_str::<AuthorId>("\"seven\"").is_err());
        assert!(serde_json::from_str::<AuthorId>("true").is_err());
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&BookId::new(3)).unwrap(), "3");
    }
}
