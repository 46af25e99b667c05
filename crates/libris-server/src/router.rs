use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, put};
use axum::Router;
use libris_core_types::schema::HEADER_REQUEST_ID;
use libris_core_types::RequestId;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::handlers;
use crate::state::AppState;

/// Build the axum router with every Libris endpoint
///
/// Catalog routes live under `api_prefix`; `/health` stays at the root.
pub fn build_router(state: AppState, api_prefix: &str) -> Router {
    let api = Router::new()
        .route(
            "/authors",
            get(handlers::list_authors).post(handlers::create_author),
        )
        .route(
            "/authors/:id",
            get(handlers::get_author)
                .put(handlers::update_author)
                .delete(handlers::delete_author),
        )
        .route(
            "/books",
            get(handlers::list_books).post(handlers::create_book),
        )
        .route(
            "/books/:id",
            get(handlers::get_book)
                .put(handlers::update_book)
                .delete(handlers::delete_book),
        )
        .route(
            "/books/:id/authors/:author_id",
            put(handlers::update_book_with_author),
        );

    let root = Router::new().route("/health", get(handlers::health));
    let app = match normalize_prefix(api_prefix) {
        Some(prefix) => root.nest(&prefix, api),
        None => root.merge(api),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    app.with_state(state)
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(propagate_request_id))
}

/// `"api/v1/"` -> `Some("/api/v1")`; empty or `"/"` means no prefix
fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{}", trimmed))
    }
}

/// Reuse a well-formed inbound `x-request-id` or mint one, and echo it back
async fn propagate_request_id(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(HEADER_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .and_then(RequestId::from_external)
        .unwrap_or_default();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(HEADER_REQUEST_ID, value);
    }
    response
}
