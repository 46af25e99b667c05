//! Entity records and boundary value types

pub mod author;
pub mod book;
pub mod ids;
pub mod values;

pub use author::{Author, AuthorChanges, NewAuthor};
pub use book::{Book, BookChanges, NewBook};
pub use ids::{AuthorId, BookId};
pub use values::{Birthday, Isbn, Year};
