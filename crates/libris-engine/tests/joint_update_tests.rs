// Test suite for the joint book/author update
// Covers read-your-writes, rollback on either half failing, the author-link
// policy, and concurrent callers

use libris_core::model::{AuthorChanges, AuthorId, BookChanges, BookId, NewAuthor, NewBook};
use libris_core::ExErrorKind;
use libris_engine::{update_book_and_author, AuthorLinkPolicy};
use libris_store::{AuthorRepo, BookRepo, PoolConfig, StoreHandle};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

fn setup_store() -> (TempDir, StoreHandle) {
    let dir = TempDir::new().unwrap();
    let store = StoreHandle::open(dir.path().join("library.db"), PoolConfig::default()).unwrap();
    (dir, store)
}

/// Seed one author and one book linked to it; returns (book_id, author_id)
fn seed_pair(store: &StoreHandle, title: &str, name: &str) -> (BookId, AuthorId) {
    store
        .with_conn(|conn| {
            let author = AuthorRepo::create(
                conn,
                &NewAuthor {
                    name: name.to_string(),
                    ..NewAuthor::default()
                },
            )?;
            let book = BookRepo::create(
                conn,
                &NewBook {
                    title: title.to_string(),
                    author_id: Some(author.id),
                    ..NewBook::default()
                },
            )?;
            Ok((book.id, author.id))
        })
        .unwrap()
}

fn author_named(name: &str) -> AuthorChanges {
    AuthorChanges {
        name: Some(name.to_string()),
        ..AuthorChanges::default()
    }
}

fn book_title(store: &StoreHandle, id: BookId) -> String {
    store
        .with_conn(|conn| BookRepo::get(conn, id))
        .unwrap()
        .unwrap()
        .title
}

fn author_name(store: &StoreHandle, id: AuthorId) -> String {
    store
        .with_conn(|conn| AuthorRepo::get(conn, id))
        .unwrap()
        .unwrap()
        .name
}

#[test]
fn test_joint_update_visible_to_later_reads() {
    // Given: A linked book/author pair
    let (_dir, store) = setup_store();
    let (book_id, author_id) = seed_pair(&store, "A", "Jules");

    // When: Both are updated jointly
    let updated = store
        .with_conn(|conn| {
            update_book_and_author(
                conn,
                book_id,
                author_id,
                &BookChanges::title("B"),
                &author_named("Gabriel"),
                AuthorLinkPolicy::TrustCaller,
            )
        })
        .unwrap();

    // Then: The returned rows carry the new values
    assert_eq!(updated.book.title, "B");
    assert_eq!(updated.author.name, "Gabriel");

    // And: Independent reads on another connection agree
    assert_eq!(book_title(&store, book_id), "B");
    assert_eq!(author_name(&store, author_id), "Gabriel");
}

#[test]
fn test_missing_author_rolls_back_book_update() {
    // Given: Book 1 titled "A" and no author 999
    let (_dir, store) = setup_store();
    let (book_id, _) = seed_pair(&store, "A", "Jules");
    let missing = AuthorId::new(999);

    // When: A joint update targets book 1 and author 999
    let err = store
        .with_conn(|conn| {
            update_book_and_author(
                conn,
                book_id,
                missing,
                &BookChanges::title("B"),
                &author_named("Nobody"),
                AuthorLinkPolicy::TrustCaller,
            )
        })
        .unwrap_err();

    // Then: The author half reports not-found
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.entity_id(), Some("author:999"));
    assert_eq!(err.op(), Some("update_book_and_author"));

    // And: The book update already executed inside the transaction is gone
    assert_eq!(book_title(&store, book_id), "A");
}

#[test]
fn test_missing_book_leaves_author_untouched() {
    let (_dir, store) = setup_store();
    let (_, author_id) = seed_pair(&store, "A", "Jules");

    let err = store
        .with_conn(|conn| {
            update_book_and_author(
                conn,
                BookId::new(404),
                author_id,
                &BookChanges::title("B"),
                &author_named("Gabriel"),
                AuthorLinkPolicy::TrustCaller,
            )
        })
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.entity_id(), Some("book:404"));
    assert_eq!(author_name(&store, author_id), "Jules");
}

#[test]
fn test_store_failure_on_author_half_rolls_back_book() {
    // Given: A pair, and a trigger that makes every author update abort
    let (_dir, store) = setup_store();
    let (book_id, author_id) = seed_pair(&store, "A", "Jules");
    store
        .with_conn(|conn| {
            conn.execute_batch(
                "CREATE TRIGGER authors_frozen BEFORE UPDATE ON authors
                 BEGIN SELECT RAISE(ABORT, 'authors are frozen'); END;",
            )
            .map_err(libris_store::errors::from_rusqlite)
        })
        .unwrap();

    // When: A joint update runs
    let err = store
        .with_conn(|conn| {
            update_book_and_author(
                conn,
                book_id,
                author_id,
                &BookChanges::title("B"),
                &author_named("Gabriel"),
                AuthorLinkPolicy::TrustCaller,
            )
        })
        .unwrap_err();

    // Then: The store's rejection surfaces and nothing is committed
    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    assert_eq!(book_title(&store, book_id), "A");
    assert_eq!(author_name(&store, author_id), "Jules");
}

#[test]
fn test_trust_caller_updates_unrelated_author() {
    // Given: Two pairs
    let (_dir, store) = setup_store();
    let (book_id, _) = seed_pair(&store, "A", "Jules");
    let (_, other_author) = seed_pair(&store, "C", "Victor");

    // When: The book is paired with an author it does not reference
    let result = store.with_conn(|conn| {
        update_book_and_author(
            conn,
            book_id,
            other_author,
            &BookChanges::title("B"),
            &author_named("Hugo"),
            AuthorLinkPolicy::TrustCaller,
        )
    });

    // Then: The default policy applies both halves anyway
    assert!(result.is_ok());
    assert_eq!(author_name(&store, other_author), "Hugo");
}

#[test]
fn test_require_linked_rejects_unrelated_author() {
    let (_dir, store) = setup_store();
    let (book_id, _) = seed_pair(&store, "A", "Jules");
    let (_, other_author) = seed_pair(&store, "C", "Victor");

    let err = store
        .with_conn(|conn| {
            update_book_and_author(
                conn,
                book_id,
                other_author,
                &BookChanges::title("B"),
                &author_named("Hugo"),
                AuthorLinkPolicy::RequireLinked,
            )
        })
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    assert_eq!(book_title(&store, book_id), "A");
    assert_eq!(author_name(&store, other_author), "Victor");
}

#[test]
fn test_require_linked_accepts_linked_author() {
    let (_dir, store) = setup_store();
    let (book_id, author_id) = seed_pair(&store, "A", "Jules");

    let updated = store
        .with_conn(|conn| {
            update_book_and_author(
                conn,
                book_id,
                author_id,
                &BookChanges::title("B"),
                &author_named("Gabriel"),
                AuthorLinkPolicy::RequireLinked,
            )
        })
        .unwrap();

    assert_eq!(updated.book.author_id, Some(author_id));
    assert_eq!(updated.author.name, "Gabriel");
}

#[test]
fn test_concurrent_updates_to_same_pair_do_not_mix() {
    // Given: One pair and two writers that each stamp both rows with their tag
    let (_dir, store) = setup_store();
    let (book_id, author_id) = seed_pair(&store, "A", "A");
    let barrier = Arc::new(Barrier::new(2));

    let writers: Vec<_> = ["X", "Y"]
        .into_iter()
        .map(|tag| {
            let store = store.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..20 {
                    store.with_conn(|conn| {
                        update_book_and_author(
                            conn,
                            book_id,
                            author_id,
                            &BookChanges::title(tag),
                            &author_named(tag),
                            AuthorLinkPolicy::TrustCaller,
                        )
                    })?;
                }
                Ok::<_, libris_core::ExError>(())
            })
        })
        .collect();

    // When: Both finish
    for writer in writers {
        writer.join().unwrap().unwrap();
    }

    // Then: Both rows carry the same caller's tag
    let title = book_title(&store, book_id);
    let name = author_name(&store, author_id);
    assert!(title == "X" || title == "Y");
    assert_eq!(title, name);
}

#[test]
fn test_concurrent_updates_to_disjoint_pairs_both_succeed() {
    let (_dir, store) = setup_store();
    let first = seed_pair(&store, "A", "Jules");
    let second = seed_pair(&store, "C", "Victor");
    let barrier = Arc::new(Barrier::new(2));

    let writers: Vec<_> = [(first, "first"), (second, "second")]
        .into_iter()
        .map(|((book_id, author_id), tag)| {
            let store = store.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                store.with_conn(|conn| {
                    update_book_and_author(
                        conn,
                        book_id,
                        author_id,
                        &BookChanges::title(tag),
                        &author_named(tag),
                        AuthorLinkPolicy::TrustCaller,
                    )
                })
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap().unwrap();
    }

    assert_eq!(book_title(&store, first.0), "first");
    assert_eq!(author_name(&store, first.1), "first");
    assert_eq!(book_title(&store, second.0), "second");
    assert_eq!(author_name(&store, second.1), "second");
}
