//! Server errors
//!
//! `ServerError` covers startup and shutdown. `ApiError` is the per-request
//! error; it alone decides the HTTP status of a failed request.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use libris_core::{ExError, ExErrorKind, LibrisError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store error: {0}")]
    Store(#[from] ExError),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Error body for every non-404 failure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

/// A failed request
#[derive(Debug)]
pub struct ApiError(ExError);

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// 400 with the given message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(ExError::new(ExErrorKind::InvalidInput).with_message(message))
    }

    pub fn kind(&self) -> ExErrorKind {
        self.0.kind()
    }

    pub fn status_code(&self) -> StatusCode {
        match self.0.kind() {
            ExErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ExErrorKind::NotFound => StatusCode::NOT_FOUND,
            ExErrorKind::ConstraintViolation => StatusCode::CONFLICT,
            ExErrorKind::Concurrency => StatusCode::SERVICE_UNAVAILABLE,
            ExErrorKind::Persistence
            | ExErrorKind::Serialization
            | ExErrorKind::Io
            | ExErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ExError> for ApiError {
    fn from(err: ExError) -> Self {
        Self(err)
    }
}

impl From<LibrisError> for ApiError {
    fn from(err: LibrisError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::NOT_FOUND {
            return status.into_response();
        }
        if status.is_server_error() {
            tracing::warn!(err_code = self.0.code(), err = %self.0, "Request failed");
        }

        let message = if self.0.message().is_empty() {
            self.0.to_string()
        } else {
            self.0.message().to_string()
        };
        let body = ErrorResponse {
            error: message,
            code: self.0.code(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ExErrorKind::InvalidInput, StatusCode::BAD_REQUEST),
            (ExErrorKind::NotFound, StatusCode::NOT_FOUND),
            (ExErrorKind::ConstraintViolation, StatusCode::CONFLICT),
            (ExErrorKind::Concurrency, StatusCode::SERVICE_UNAVAILABLE),
            (ExErrorKind::Persistence, StatusCode::INTERNAL_SERVER_ERROR),
            (ExErrorKind::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (kind, status) in cases {
            assert_eq!(ApiError::from(ExError::new(kind)).status_code(), status);
        }
    }

    #[test]
    fn test_domain_errors_map_through_kind() {
        let missing = ApiError::from(LibrisError::AuthorNotFound { author_id: 3 });
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let bad_id = ApiError::from(LibrisError::InvalidId {
            entity: "book",
            raw: "abc".to_string(),
        });
        assert_eq!(bad_id.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_not_found_has_empty_body() {
        let response = ApiError::from(ExError::new(ExErrorKind::NotFound)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_error_body_carries_message_and_code() {
        let response = ApiError::bad_request("bad year").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "bad year");
        assert_eq!(json["code"], "ERR_INVALID_INPUT");
    }
}
