//! Atomic joint update of a book and an author.
//!
//! ## Pipeline (in order):
//! 1. Begin an IMMEDIATE transaction (write lock taken up front)
//! 2. Author-link check (only under `AuthorLinkPolicy::RequireLinked`)
//! 3. Book update; no row is `NotFound`
//! 4. Author update; no row is `NotFound`
//! 5. Commit
//!
//! The `RETURNING` rows of steps 3 and 4 are the in-transaction re-read.
//! Any early return drops the transaction, which rolls it back; readers
//! never observe one half of the update.

#![allow(clippy::result_large_err)]

use super::finish;
use libris_core::log_op_start;
use libris_core::model::{Author, AuthorChanges, AuthorId, Book, BookChanges, BookId};
use libris_core::{ExError, LibrisError};
use libris_store::errors::from_rusqlite;
use libris_store::{AuthorRepo, BookRepo, Result};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Instant;

const OP: &str = "update_book_and_author";

/// Whether the supplied author id must match the book's stored author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorLinkPolicy {
    /// Update whichever author the caller names
    #[default]
    TrustCaller,
    /// Refuse the update unless the book references `author_id`
    RequireLinked,
}

impl FromStr for AuthorLinkPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trust-caller" | "trust_caller" => Ok(AuthorLinkPolicy::TrustCaller),
            "require-linked" | "require_linked" => Ok(AuthorLinkPolicy::RequireLinked),
            other => Err(format!("unknown author link policy: {}", other)),
        }
    }
}

/// Both rows as committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JointUpdate {
    pub book: Book,
    pub author: Author,
}

/// Update a book and an author in one transaction
///
/// Book first, then author. Either both changes commit or neither does.
/// Contention on the store write lock waits up to the connection's busy
/// timeout and then fails; there is no retry.
///
/// # Errors
///
/// - `NotFound`: either row is missing (`entity_id` names which)
/// - `ConstraintViolation`: the store rejected a value, or the book is
///   linked to another author under `RequireLinked`
/// - `Concurrency`: the store stayed locked past the busy timeout
/// - `Persistence`: any other store failure
pub fn update_book_and_author(
    conn: &mut Connection,
    book_id: BookId,
    author_id: AuthorId,
    book_changes: &BookChanges,
    author_changes: &AuthorChanges,
    policy: AuthorLinkPolicy,
) -> Result<JointUpdate> {
    log_op_start!(
        OP,
        book_id = book_id.get(),
        author_id = author_id.get(),
        policy = ?policy
    );
    let start = Instant::now();

    let result = joint_update_impl(
        conn,
        book_id,
        author_id,
        book_changes,
        author_changes,
        policy,
    );
    finish(OP, start, result)
}

fn joint_update_impl(
    conn: &mut Connection,
    book_id: BookId,
    author_id: AuthorId,
    book_changes: &BookChanges,
    author_changes: &AuthorChanges,
    policy: AuthorLinkPolicy,
) -> Result<JointUpdate> {
    if book_changes.is_empty() && author_changes.is_empty() {
        tracing::debug!("Joint update carries no changes; rows are re-read only");
    }

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite)?;

    if policy == AuthorLinkPolicy::RequireLinked {
        check_author_link(&tx, book_id, author_id)?;
    }

    let book = BookRepo::update(&tx, book_id, book_changes)?.ok_or_else(|| {
        ExError::from(LibrisError::BookNotFound {
            book_id: book_id.get(),
        })
    })?;

    let author = AuthorRepo::update(&tx, author_id, author_changes)?.ok_or_else(|| {
        ExError::from(LibrisError::AuthorNotFound {
            author_id: author_id.get(),
        })
    })?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(
        book_id = book.id.get(),
        author_id = author.id.get(),
        "Committed joint update"
    );
    Ok(JointUpdate { book, author })
}

fn check_author_link(tx: &Transaction<'_>, book_id: BookId, author_id: AuthorId) -> Result<()> {
    match BookRepo::author_of(tx, book_id)? {
        None => Err(LibrisError::BookNotFound {
            book_id: book_id.get(),
        }
        .into()),
        Some(actual) if actual == Some(author_id) => Ok(()),
        Some(actual) => Err(LibrisError::AuthorLinkMismatch {
            book_id: book_id.get(),
            supplied: author_id.get(),
            actual: actual.map(AuthorId::get),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_defaults_to_trust_caller() {
        assert_eq!(AuthorLinkPolicy::default(), AuthorLinkPolicy::TrustCaller);
    }

    #[test]
    fn test_policy_kebab_case_names() {
        let parsed: AuthorLinkPolicy = serde_json::from_str("\"require-linked\"").unwrap();
        assert_eq!(parsed, AuthorLinkPolicy::RequireLinked);
        assert_eq!(
            serde_json::to_string(&AuthorLinkPolicy::TrustCaller).unwrap(),
            "\"trust-caller\""
        );
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "Require_Linked".parse::<AuthorLinkPolicy>(),
            Ok(AuthorLinkPolicy::RequireLinked)
        );
        assert!("sometimes".parse::<AuthorLinkPolicy>().is_err());
    }
}
