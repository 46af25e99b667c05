use serde::{Deserialize, Serialize};

use super::ids::{AuthorId, BookId};
use super::values::{Isbn, Year};

/// Book - a row of the `books` table
///
/// `author_id` is a soft reference: nothing in the store guarantees the
/// author still exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier, never reused
    pub id: BookId,

    pub title: String,

    #[serde(rename = "authorid")]
    pub author_id: Option<AuthorId>,

    pub isbn: Option<Isbn>,

    pub year: Option<Year>,
}

/// Fields for a new book
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewBook {
    pub title: String,
    #[serde(rename = "authorid")]
    pub author_id: Option<AuthorId>,
    pub isbn: Option<Isbn>,
    pub year: Option<Year>,
}

/// Caller-supplied fields to overwrite on an existing book
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "authorid", skip_serializing_if = "Option::is_none")]
    pub author_id: Option<AuthorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<Isbn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<Year>,
}

impl BookChanges {
    /// Change set touching only the title
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author_id.is_none()
            && self.isbn.is_none()
            && self.year.is_none()
    }
}
