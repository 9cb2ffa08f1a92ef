use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by [`NoteStore`](super::NoteStore). Each variant maps to
/// one stage of the store lifecycle so callers can decide which ones are fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be opened or the schema could not be ensured.
    #[error("notes storage at {path} is unavailable: {reason}")]
    StorageUnavailable {
        path: PathBuf,
        reason: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Reading the note list failed. No partial results are returned.
    #[error("failed to read notes")]
    QueryFailed(#[source] rusqlite::Error),

    /// Inserting or updating a note failed.
    #[error("failed to save note {id}")]
    WriteFailed {
        id: i64,
        #[source]
        source: rusqlite::Error,
    },

    /// Every identifier up to `i64::MAX` has been issued or stored, so a new
    /// note cannot be given a unique id.
    #[error("no unused note ids remain")]
    IdSpaceExhausted,
}

impl StoreError {
    pub(crate) fn unavailable<E>(path: impl Into<PathBuf>, reason: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::StorageUnavailable {
            path: path.into(),
            reason: reason.to_string(),
            source: Box::new(source),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
