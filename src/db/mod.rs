//! Persistence for notes: one SQLite table, upsert-by-id writes, and
//! store-owned identifier generation.

mod connection;
mod error;
mod notes;

pub use error::{StoreError, StoreResult};
pub use notes::NoteStore;
