// Test suite for single-entity commands
// Not-found outcomes become NotFound errors; successes pass repository rows through

use libris_core::model::{AuthorChanges, AuthorId, BookChanges, BookId, NewAuthor, NewBook};
use libris_core::ExErrorKind;
use libris_engine::commands::author::{
    author_create, author_delete, author_get, author_list, author_update,
};
use libris_engine::commands::book::{book_create, book_delete, book_get, book_list, book_update};
use libris_store::StoreHandle;

#[test]
fn test_author_lifecycle() {
    // Given: An in-memory store
    let store = StoreHandle::open_in_memory().unwrap();
    let conn = store.acquire().unwrap();

    // When: An author is created, renamed and deleted
    let created = author_create(
        &conn,
        &NewAuthor {
            name: "Jules".to_string(),
            surname: "Verne".to_string(),
            ..NewAuthor::default()
        },
    )
    .unwrap();
    let renamed = author_update(
        &conn,
        created.id,
        &AuthorChanges {
            surname: Some("Gabriel Verne".to_string()),
            ..AuthorChanges::default()
        },
    )
    .unwrap();
    assert_eq!(author_get(&conn, created.id).unwrap(), renamed);
    assert_eq!(author_list(&conn).unwrap().len(), 1);
    author_delete(&conn, created.id).unwrap();

    // Then: It is gone and a second delete reports not-found
    assert_eq!(
        author_get(&conn, created.id).unwrap_err().kind(),
        ExErrorKind::NotFound
    );
    assert_eq!(
        author_delete(&conn, created.id).unwrap_err().kind(),
        ExErrorKind::NotFound
    );
}

#[test]
fn test_missing_author_errors_name_the_entity() {
    let store = StoreHandle::open_in_memory().unwrap();
    let conn = store.acquire().unwrap();

    let err = author_update(&conn, AuthorId::new(5), &AuthorChanges::default()).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.entity_id(), Some("author:5"));
    assert_eq!(err.op(), Some("author_update"));
}

#[test]
fn test_book_lifecycle() {
    let store = StoreHandle::open_in_memory().unwrap();
    let conn = store.acquire().unwrap();

    let created = book_create(
        &conn,
        &NewBook {
            title: "Michel Strogoff".to_string(),
            year: Some("1876".parse().unwrap()),
            ..NewBook::default()
        },
    )
    .unwrap();
    let updated = book_update(&conn, created.id, &BookChanges::title("Michael Strogoff")).unwrap();

    assert_eq!(updated.year, created.year);
    assert_eq!(book_get(&conn, created.id).unwrap().title, "Michael Strogoff");
    assert_eq!(book_list(&conn).unwrap(), vec![updated]);

    book_delete(&conn, created.id).unwrap();
    assert!(book_list(&conn).unwrap().is_empty());
}

#[test]
fn test_missing_book_errors() {
    let store = StoreHandle::open_in_memory().unwrap();
    let conn = store.acquire().unwrap();
    let missing = BookId::new(77);

    for err in [
        book_get(&conn, missing).unwrap_err(),
        book_update(&conn, missing, &BookChanges::title("x")).unwrap_err(),
        book_delete(&conn, missing).unwrap_err(),
    ] {
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.entity_id(), Some("book:77"));
    }
}
