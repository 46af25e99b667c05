use serde::{Deserialize, Serialize};

use super::ids::AuthorId;
use super::values::Birthday;

/// Author - a row of the `authors` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Store-assigned identifier, never reused
    pub id: AuthorId,

    pub name: String,

    pub surname: String,

    /// Free text
    pub biography: String,

    pub birthday: Option<Birthday>,
}

/// Fields for a new author; missing text fields default to empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewAuthor {
    pub name: String,
    pub surname: String,
    pub biography: String,
    pub birthday: Option<Birthday>,
}

/// Caller-supplied fields to overwrite on an existing author
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<Birthday>,
}

impl AuthorChanges {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.biography.is_none()
            && self.birthday.is_none()
    }
}
