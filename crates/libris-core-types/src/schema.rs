//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical across the store, engine and
//! server logs.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_AUTHOR_ID: &str = "author_id";
pub const FIELD_BOOK_ID: &str = "book_id";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

/// HTTP header carrying the request correlation id
pub const HEADER_REQUEST_ID: &str = "x-request-id";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_header_is_lowercase() {
        // http::HeaderName::from_static rejects uppercase input
        assert_eq!(HEADER_REQUEST_ID, HEADER_REQUEST_ID.to_ascii_lowercase());
    }
}
