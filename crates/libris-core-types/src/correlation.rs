//! Correlation types for request tracking
//!
//! A `RequestId` is minted for every inbound HTTP request (or accepted from
//! the caller's `x-request-id` header) and attached to the request span so
//! that store and engine events can be tied back to the request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum accepted length of a caller-supplied request id
const MAX_EXTERNAL_LEN: usize = 128;

/// Unique identifier for a single request or operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accept a caller-supplied id if it is printable ASCII and reasonably short
    pub fn from_external(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.len() > MAX_EXTERNAL_LEN
            || !trimmed.bytes().all(|b| b.is_ascii_graphic())
        {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
