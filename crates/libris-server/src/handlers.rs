//! Request handlers
//!
//! Each handler parses its path and body, then runs one engine command on a
//! pooled connection inside `spawn_blocking`. Malformed ids and bodies never
//! reach the store.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use libris_core::model::{
    Author, AuthorChanges, AuthorId, Book, BookChanges, BookId, NewAuthor, NewBook,
};
use libris_core::{ExError, ExErrorKind};
use libris_engine::commands::{author, book};
use libris_engine::{update_book_and_author, JointUpdate};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Body of the joint update; an omitted half changes nothing on that row
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct JointUpdateRequest {
    pub book: BookChanges,
    pub author: AuthorChanges,
}

/// Run `f` on a pooled connection off the async runtime
///
/// The request span follows the work onto the blocking thread.
async fn run_blocking<T, F>(state: &AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&mut Connection) -> libris_store::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        store.with_conn(f)
    })
    .await
    .map_err(|e| {
        ApiError::from(
            ExError::new(ExErrorKind::Internal)
                .with_op("spawn_blocking")
                .with_message(e.to_string()),
        )
    })?
    .map_err(ApiError::from)
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload.map(|Json(value)| value).map_err(ApiError::from)
}

fn deleted(id: impl Serialize) -> Json<Value> {
    Json(json!({ "id": id, "deleted": true }))
}

/// Liveness plus a round trip to the store
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    run_blocking(&state, |conn| {
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(libris_store::errors::from_rusqlite)
    })
    .await?;
    Ok(Json(json!({ "status": "ok" })))
}

// ---------- authors ----------

pub async fn list_authors(State(state): State<AppState>) -> ApiResult<Json<Vec<Author>>> {
    let authors = run_blocking(&state, |conn| author::author_list(conn)).await?;
    Ok(Json(authors))
}

pub async fn get_author(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Author>> {
    let id: AuthorId = raw_id.parse()?;
    let found = run_blocking(&state, move |conn| author::author_get(conn, id)).await?;
    Ok(Json(found))
}

pub async fn create_author(
    State(state): State<AppState>,
    payload: Result<Json<NewAuthor>, JsonRejection>,
) -> ApiResult<Json<Author>> {
    let draft = body(payload)?;
    let created = run_blocking(&state, move |conn| author::author_create(conn, &draft)).await?;
    Ok(Json(created))
}

pub async fn update_author(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<AuthorChanges>, JsonRejection>,
) -> ApiResult<Json<Author>> {
    let id: AuthorId = raw_id.parse()?;
    let changes = body(payload)?;
    let updated =
        run_blocking(&state, move |conn| author::author_update(conn, id, &changes)).await?;
    Ok(Json(updated))
}

pub async fn delete_author(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id: AuthorId = raw_id.parse()?;
    run_blocking(&state, move |conn| author::author_delete(conn, id)).await?;
    Ok(deleted(id))
}

// ---------- books ----------

pub async fn list_books(State(state): State<AppState>) -> ApiResult<Json<Vec<Book>>> {
    let books = run_blocking(&state, |conn| book::book_list(conn)).await?;
    Ok(Json(books))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Book>> {
    let id: BookId = raw_id.parse()?;
    let found = run_blocking(&state, move |conn| book::book_get(conn, id)).await?;
    Ok(Json(found))
}

pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> ApiResult<Json<Book>> {
    let draft = body(payload)?;
    let created = run_blocking(&state, move |conn| book::book_create(conn, &draft)).await?;
    Ok(Json(created))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<BookChanges>, JsonRejection>,
) -> ApiResult<Json<Book>> {
    let id: BookId = raw_id.parse()?;
    let changes = body(payload)?;
    let updated = run_blocking(&state, move |conn| book::book_update(conn, id, &changes)).await?;
    Ok(Json(updated))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id: BookId = raw_id.parse()?;
    run_blocking(&state, move |conn| book::book_delete(conn, id)).await?;
    Ok(deleted(id))
}

// ---------- joint ----------

pub async fn update_book_with_author(
    State(state): State<AppState>,
    Path((raw_book_id, raw_author_id)): Path<(String, String)>,
    payload: Result<Json<JointUpdateRequest>, JsonRejection>,
) -> ApiResult<Json<JointUpdate>> {
    let book_id: BookId = raw_book_id.parse()?;
    let author_id: AuthorId = raw_author_id.parse()?;
    let request = body(payload)?;
    let policy = state.author_link_policy;

    let updated = run_blocking(&state, move |conn| {
        update_book_and_author(
            conn,
            book_id,
            author_id,
            &request.book,
            &request.author,
            policy,
        )
    })
    .await?;
    Ok(Json(updated))
}
