// ABOUTME: SQLite-backed EntryDao storing one JSON document per entry.
// ABOUTME: Sort, time-filter, and count run store-native over indexed columns.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use guestbook_core::{Entry, Id};
use rusqlite::{Connection, params};

use crate::dao::{EntryDao, StoreError};

/// Durable entry store backed by an embedded SQLite database.
///
/// Each entry is one row: the serialized JSON document plus indexed
/// `author_id` and `entered` (unix milliseconds) columns so that
/// `load_all`, `count_newer_than`, and `load_authored_by` run as native
/// queries. The row key is the entry id's string, so the mapping between
/// store key and domain [`Id`] round-trips exactly.
pub struct SqliteEntryDao {
    conn: Mutex<Connection>,
}

impl SqliteEntryDao {
    /// Open or create an entry database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init(conn)
    }

    /// Open a fresh in-memory database, for tests and embedding.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS entries (
                id TEXT PRIMARY KEY,
                doc TEXT NOT NULL,
                author_id TEXT NOT NULL,
                entered INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_entries_entered ON entries(entered);
            CREATE INDEX IF NOT EXISTS idx_entries_author ON entries(author_id);",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl EntryDao for SqliteEntryDao {
    fn add(&self, entry: Entry) -> Result<(), StoreError> {
        let doc = serde_json::to_string(&entry)?;
        let conn = self.conn.lock().expect("lock poisoned");

        let result = conn.execute(
            "INSERT INTO entries (id, doc, author_id, entered) VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.id.as_str(),
                doc,
                entry.author_id.as_str(),
                entry.entered.timestamp_millis(),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::DuplicateId(entry.id))
            }
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }

    fn load(&self, id: &Id) -> Result<Option<Entry>, StoreError> {
        if !id.is_valid() {
            // A real driver would reject the key shape; resolve to absence.
            tracing::debug!("lookup with malformed id {:?}, resolving to none", id.as_str());
            return Ok(None);
        }

        let conn = self.conn.lock().expect("lock poisoned");
        let result = conn.query_row(
            "SELECT doc FROM entries WHERE id = ?1",
            params![id.as_str()],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }

    fn remove(&self, id: &Id) -> Result<(), StoreError> {
        let conn = self.conn.lock().expect("lock poisoned");
        conn.execute("DELETE FROM entries WHERE id = ?1", params![id.as_str()])?;
        Ok(())
    }

    fn update_text(&self, id: &Id, text: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().expect("lock poisoned");
        let tx = conn.transaction()?;

        let result = tx.query_row(
            "SELECT doc FROM entries WHERE id = ?1",
            params![id.as_str()],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(doc) => {
                let mut entry: Entry = serde_json::from_str(&doc)?;
                entry.text = text.to_string();
                let doc = serde_json::to_string(&entry)?;
                tx.execute(
                    "UPDATE entries SET doc = ?1 WHERE id = ?2",
                    params![doc, id.as_str()],
                )?;
            }
            // Missing id is a no-op; never insert.
            Err(rusqlite::Error::QueryReturnedNoRows) => {}
            Err(e) => return Err(StoreError::Sqlite(e)),
        }

        tx.commit()?;
        Ok(())
    }

    fn count(&self) -> Result<u64, StoreError> {
        let conn = self.conn.lock().expect("lock poisoned");
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    fn load_all(&self) -> Result<Vec<Entry>, StoreError> {
        let conn = self.conn.lock().expect("lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT doc FROM entries ORDER BY entered DESC, id ASC",
        )?;

        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut entries = Vec::new();
        for doc in rows {
            entries.push(serde_json::from_str(&doc?)?);
        }
        Ok(entries)
    }

    fn count_newer_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let conn = self.conn.lock().expect("lock poisoned");
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE entered > ?1",
            params![cutoff.timestamp_millis()],
            |row| row.get(0),
        )?;
        Ok(n as u64)
    }

    fn load_authored_by(&self, author: &Id) -> Result<Vec<Entry>, StoreError> {
        let conn = self.conn.lock().expect("lock poisoned");
        let mut stmt = conn.prepare("SELECT doc FROM entries WHERE author_id = ?1")?;

        let rows = stmt.query_map(params![author.as_str()], |row| row.get::<_, String>(0))?;

        let mut entries = Vec::new();
        for doc in rows {
            entries.push(serde_json::from_str(&doc?)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn entries_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("entries.db");

        let entry = Entry::dated(
            "durable",
            Id::generate(),
            Utc.with_ymd_and_hms(2014, 2, 10, 9, 15, 0).unwrap(),
        );
        let id = entry.id.clone();

        {
            let dao = SqliteEntryDao::open(&db_path).unwrap();
            dao.add(entry.clone()).unwrap();
        }

        let dao = SqliteEntryDao::open(&db_path).unwrap();
        let loaded = dao.load(&id).unwrap().expect("entry should persist");
        assert_eq!(loaded, entry);
        assert_eq!(dao.count().unwrap(), 1);
    }

    #[test]
    fn duplicate_insert_maps_to_duplicate_id() {
        let dao = SqliteEntryDao::open_in_memory().unwrap();
        let entry = Entry::new("first", Id::generate());
        let dup = Entry {
            text: "second".to_string(),
            ..entry.clone()
        };

        dao.add(entry.clone()).unwrap();
        let err = dao.add(dup).unwrap_err();

        assert!(matches!(err, StoreError::DuplicateId(id) if id == entry.id));
        // The original row is untouched.
        assert_eq!(dao.load(&entry.id).unwrap().unwrap().text, "first");
    }

    #[test]
    fn row_key_round_trips_the_domain_id() {
        let dao = SqliteEntryDao::open_in_memory().unwrap();
        let entry = Entry::new("key check", Id::generate());
        let id = entry.id.clone();
        dao.add(entry).unwrap();

        // Reparse the stored key through a fresh Id value.
        let reparsed = Id::from(id.as_str());
        assert_eq!(dao.load(&reparsed).unwrap().unwrap().id, id);
    }
}
