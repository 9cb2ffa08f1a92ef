//! Domain model that mirrors the `notes` table. Notes are plain data holders;
//! the store decides identity and the UI decides presentation.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A single title/body record.
pub struct Note {
    /// Application-assigned identifier. Zero marks a draft that has never been
    /// written; the store replaces it before the first insert.
    pub id: i64,
    /// Title shown in the list. Only empty while a draft is being composed.
    pub title: String,
    /// Free-form, possibly multi-line body.
    pub body: String,
}

impl Note {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Whether this note has never been persisted.
    pub fn is_draft(&self) -> bool {
        self.id == 0
    }

    /// Single-line preview of the body: newlines are dropped and the result is
    /// cut to `max_chars` characters without an ellipsis.
    pub fn preview(&self, max_chars: usize) -> String {
        self.body
            .chars()
            .filter(|ch| *ch != '\n' && *ch != '\r')
            .take(max_chars)
            .collect()
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
