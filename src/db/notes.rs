use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection};
use tracing::{debug, info};

use super::connection::{open_connection, open_memory_connection, IN_MEMORY};
use super::error::{StoreError, StoreResult};
use crate::models::Note;

/// Durable note storage backed by a single SQLite connection held for the
/// lifetime of the process.
///
/// The store owns identifier generation: drafts (`id == 0`) receive an id
/// that is strictly greater than anything issued or stored before, seeded from
/// the wall clock so ids stay roughly chronological.
pub struct NoteStore {
    conn: Connection,
    last_id: i64,
}

impl NoteStore {
    /// Open (or create) the database file at `path` and ensure the schema.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = open_connection(path)?;
        Self::from_connection(conn, path)
    }

    /// Open a private in-memory database. Nothing survives the handle.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = open_memory_connection()?;
        Self::from_connection(conn, Path::new(IN_MEMORY))
    }

    fn from_connection(conn: Connection, path: &Path) -> StoreResult<Self> {
        let last_id = conn
            .query_row("SELECT COALESCE(MAX(id), 0) FROM notes", [], |row| {
                row.get::<_, i64>(0)
            })
            .map_err(|err| StoreError::unavailable(path, "failed to read highest note id", err))?;
        debug!(last_id, "id allocator seeded");
        Ok(Self { conn, last_id })
    }

    /// Every stored note in id order, which is also insertion order. A single
    /// unreadable row fails the whole call.
    pub fn all(&self) -> StoreResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, body FROM notes ORDER BY id")
            .map_err(StoreError::QueryFailed)?;

        let notes = stmt
            .query_map([], |row| {
                Ok(Note {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    body: row.get(2)?,
                })
            })
            .map_err(StoreError::QueryFailed)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::QueryFailed)?;

        debug!(count = notes.len(), "notes loaded");
        Ok(notes)
    }

    /// Insert or update `note`, assigning a fresh id first when it is a draft.
    /// Returns the note as it now exists on disk.
    pub fn save(&mut self, note: &Note) -> StoreResult<Note> {
        let is_new = note.is_draft();
        let id = if is_new { self.next_id()? } else { note.id };

        self.conn
            .execute(
                "INSERT INTO notes (id, title, body) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET title = excluded.title, body = excluded.body",
                params![id, note.title, note.body],
            )
            .map_err(|source| StoreError::WriteFailed { id, source })?;

        self.last_id = self.last_id.max(id);
        info!(id, is_new, "note saved");

        Ok(Note {
            id,
            title: note.title.clone(),
            body: note.body.clone(),
        })
    }

    /// Hand out the next identifier. The clock only seeds the value; ordering
    /// against previously issued ids is what guarantees uniqueness. Once
    /// `i64::MAX` is taken there is nothing left to issue.
    fn next_id(&mut self) -> StoreResult<i64> {
        let after_last = self
            .last_id
            .checked_add(1)
            .ok_or(StoreError::IdSpaceExhausted)?;
        let id = unix_nanos().max(after_last);
        self.last_id = id;
        Ok(id)
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn unix_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> NoteStore {
        NoteStore::open_in_memory().unwrap()
    }

    #[test]
    fn empty_store_returns_empty_list() {
        assert!(store().all().unwrap().is_empty());
    }

    #[test]
    fn saved_note_is_returned_exactly_once() {
        let mut store = store();
        let saved = store.save(&Note::new("Groceries", "Milk\nEggs")).unwrap();

        let notes = store.all().unwrap();
        assert_eq!(notes, vec![saved.clone()]);
        assert_ne!(saved.id, 0);
    }

    #[test]
    fn saving_same_id_twice_keeps_one_row_with_latest_values() {
        let mut store = store();
        let first = store.save(&Note::new("Draft", "one")).unwrap();

        let edited = Note {
            title: "Final".into(),
            body: "two".into(),
            ..first.clone()
        };
        let second = store.save(&edited).unwrap();
        assert_eq!(second.id, first.id);

        let notes = store.all().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Final");
        assert_eq!(notes[0].body, "two");
    }

    #[test]
    fn drafts_get_distinct_nonzero_ids() {
        let mut store = store();
        let draft = Note::new("Same", "Same");
        let a = store.save(&draft).unwrap();
        let b = store.save(&draft).unwrap();

        assert_ne!(a.id, 0);
        assert_ne!(b.id, 0);
        assert!(b.id > a.id);
        assert_eq!(store.all().unwrap().len(), 2);
    }

    #[test]
    fn rapid_saves_never_collide() {
        let mut store = store();
        let ids: Vec<i64> = (0..200)
            .map(|i| store.save(&Note::new(format!("n{i}"), "")).unwrap().id)
            .collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(store.all().unwrap().len(), 200);
    }

    #[test]
    fn upsert_with_unknown_id_inserts() {
        let mut store = store();
        let note = Note {
            id: 42,
            title: "Imported".into(),
            body: String::new(),
        };
        store.save(&note).unwrap();
        assert_eq!(store.all().unwrap(), vec![note]);
    }

    #[test]
    fn new_ids_stay_above_stored_maximum() {
        let store = store();
        let far_future = i64::MAX / 2;
        store
            .connection()
            .execute(
                "INSERT INTO notes (id, title, body) VALUES (?1, 'future', '')",
                [far_future],
            )
            .unwrap();
        // Re-seed the allocator the way a fresh open would.
        let mut store = NoteStore::from_connection(store.conn, Path::new(IN_MEMORY)).unwrap();
        let saved = store.save(&Note::new("next", "")).unwrap();
        assert!(saved.id > far_future);
    }

    #[test]
    fn draft_after_max_id_is_rejected_instead_of_overwriting() {
        let mut store = store();
        let last = Note {
            id: i64::MAX,
            title: "Last".into(),
            body: "keep me".into(),
        };
        store.save(&last).unwrap();

        let err = store.save(&Note::new("Overflow", "")).unwrap_err();
        assert!(matches!(err, StoreError::IdSpaceExhausted));
        assert_eq!(store.all().unwrap(), vec![last]);
    }

    #[test]
    fn all_is_ordered_by_id() {
        let mut store = store();
        for id in [30, 10, 20] {
            store
                .save(&Note {
                    id,
                    title: format!("n{id}"),
                    body: String::new(),
                })
                .unwrap();
        }
        let ids: Vec<i64> = store.all().unwrap().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn malformed_row_fails_whole_read() {
        let mut store = store();
        store.save(&Note::new("fine", "ok")).unwrap();
        store
            .connection()
            .execute(
                "INSERT INTO notes (id, title, body) VALUES (1, 'broken', X'FF00')",
                [],
            )
            .unwrap();

        let err = store.all().unwrap_err();
        assert!(matches!(err, StoreError::QueryFailed(_)));
    }

    #[test]
    fn write_failure_is_reported() {
        let mut store = store();
        store.connection().execute("DROP TABLE notes", []).unwrap();

        let err = store.save(&Note::new("lost", "")).unwrap_err();
        assert!(matches!(err, StoreError::WriteFailed { .. }));
    }
}
