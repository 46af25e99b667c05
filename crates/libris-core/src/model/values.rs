//! Boundary value types
//!
//! Publication years, ISBNs and birthdays are validated when a request body
//! is decoded, so the store only ever receives well-formed values.

use super::ids::IntOrText;
use crate::errors::LibrisError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ---------- Year ----------

/// Publication year, bounded to four digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Year(i32);

impl Year {
    pub const MIN: i32 = 0;
    pub const MAX: i32 = 9999;

    /// Build a year, rejecting values outside `MIN..=MAX`
    ///
    /// # Errors
    ///
    /// Returns `LibrisError::InvalidYear` when out of range.
    pub fn new(value: i64) -> Result<Self, LibrisError> {
        if value < i64::from(Self::MIN) || value > i64::from(Self::MAX) {
            return Err(LibrisError::InvalidYear {
                reason: format!("{} is outside {}..={}", value, Self::MIN, Self::MAX),
            });
        }
        // range checked above
        Ok(Self(value as i32))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Year {
    type Err = LibrisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<i64>().map_err(|_| LibrisError::InvalidYear {
            reason: format!("{:?} is not a number", s),
        })?;
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Year {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match IntOrText::deserialize(deserializer)? {
            IntOrText::Int(value) => Year::new(value),
            IntOrText::Text(text) => text.parse(),
        }
        .map_err(serde::de::Error::custom)
    }
}

// ---------- ISBN ----------

/// ISBN-10 or ISBN-13 with a valid check digit, held in compact form
///
/// Hyphens and spaces are accepted on input and dropped; a lowercase `x`
/// check digit is normalized to `X`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Isbn(String);

impl Isbn {
    /// Parse and checksum-validate an ISBN
    ///
    /// # Errors
    ///
    /// Returns `LibrisError::InvalidIsbn` on a bad length, character or check digit.
    pub fn parse(raw: &str) -> Result<Self, LibrisError> {
        let compact: String = raw
            .chars()
            .filter(|c| *c != '-' && !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let valid = match compact.len() {
            10 => isbn10_checksum_ok(&compact)?,
            13 => isbn13_checksum_ok(&compact)?,
            n => {
                return Err(LibrisError::InvalidIsbn {
                    reason: format!("expected 10 or 13 digits, got {}", n),
                })
            }
        };

        if !valid {
            return Err(LibrisError::InvalidIsbn {
                reason: format!("check digit mismatch in {}", compact),
            });
        }
        Ok(Self(compact))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

fn bad_char(c: char) -> LibrisError {
    LibrisError::InvalidIsbn {
        reason: format!("unexpected character {:?}", c),
    }
}

fn isbn10_checksum_ok(compact: &str) -> Result<bool, LibrisError> {
    let mut sum = 0u32;
    for (i, c) in compact.chars().enumerate() {
        let value = match c {
            'X' if i == 9 => 10,
            _ => c.to_digit(10).ok_or_else(|| bad_char(c))?,
        };
        sum += value * (10 - i as u32);
    }
    Ok(sum % 11 == 0)
}

fn isbn13_checksum_ok(compact: &str) -> Result<bool, LibrisError> {
    let mut sum = 0u32;
    for (i, c) in compact.chars().enumerate() {
        let digit = c.to_digit(10).ok_or_else(|| bad_char(c))?;
        sum += if i % 2 == 0 { digit } else { digit * 3 };
    }
    Ok(sum % 10 == 0)
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Isbn {
    type Err = LibrisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Isbn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Isbn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Isbn::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------- Birthday ----------

/// Calendar date without time, written as `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Birthday(NaiveDate);

impl Birthday {
    pub const FORMAT: &'static str = "%Y-%m-%d";
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for Birthday {
    type Err = LibrisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        // chrono's %Y also takes signed and five-digit years
        if !is_iso_date_shape(text) {
            return Err(LibrisError::InvalidBirthday {
                reason: format!("{:?}: expected YYYY-MM-DD", s),
            });
        }
        NaiveDate::parse_from_str(text, Self::FORMAT)
            .map(Self)
            .map_err(|e| LibrisError::InvalidBirthday {
                reason: format!("{:?}: {}", s, e),
            })
    }
}

fn is_iso_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

impl Serialize for Birthday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Birthday {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
