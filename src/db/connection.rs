use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use super::error::{StoreError, StoreResult};

/// Path label used in errors for in-memory connections.
pub(crate) const IN_MEMORY: &str = ":memory:";

/// Ensure the parent directory exists, open the SQLite file, and make sure the
/// schema is in place. Safe to call on every startup.
pub(crate) fn open_connection(path: &Path) -> StoreResult<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                StoreError::unavailable(path, "failed to create data directory", err)
            })?;
        }
    }

    let conn = Connection::open(path)
        .map_err(|err| StoreError::unavailable(path, "failed to open SQLite database", err))?;
    ensure_schema(&conn)
        .map_err(|err| StoreError::unavailable(path, "failed to create notes table", err))?;

    info!(path = %path.display(), "notes store opened");
    Ok(conn)
}

/// In-memory variant of [`open_connection`]; contents vanish with the handle.
pub(crate) fn open_memory_connection() -> StoreResult<Connection> {
    let conn = Connection::open_in_memory()
        .map_err(|err| StoreError::unavailable(IN_MEMORY, "failed to open SQLite database", err))?;
    ensure_schema(&conn)
        .map_err(|err| StoreError::unavailable(IN_MEMORY, "failed to create notes table", err))?;
    Ok(conn)
}

/// Idempotent schema creation. There are no migrations: the table layout has
/// not changed since the first release.
pub(crate) fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS notes (
            id INTEGER NOT NULL PRIMARY KEY,
            title TEXT NOT NULL,
            body TEXT NOT NULL
        )",
        [],
    )?;
    debug!("notes schema ensured");
    Ok(())
}
