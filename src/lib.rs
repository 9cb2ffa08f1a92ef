//! Library surface for the notes terminal app. The binary wires these pieces
//! together; tests and other tooling can reuse them directly.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod ui;

/// Persistence layer: one SQLite-backed store with typed failures.
pub use db::{NoteStore, StoreError};

pub use config::{Config, SaveErrorPolicy};
pub use models::Note;

/// The interactive state machine and its terminal driver.
pub use ui::{run_app, App, Screen};
