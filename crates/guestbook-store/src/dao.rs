// ABOUTME: Defines the EntryDao trait, the storage contract every backend must satisfy.
// ABOUTME: Also defines StoreError, the shared error type for backend failures.

use chrono::{DateTime, Utc};
use guestbook_core::{Entry, Id};
use thiserror::Error;

/// Errors a storage backend can raise.
///
/// Absence is never an error: a missing id yields `Ok(None)`, an empty
/// `Vec`, or a silent no-op depending on the operation. Only duplicate
/// inserts, driver failures, and corrupt stored documents surface here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate entry id: {0}")]
    DuplicateId(Id),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("malformed stored document: {0}")]
    Document(#[from] serde_json::Error),
}

/// Storage contract for guestbook entries.
///
/// All implementations must satisfy the same observable semantics:
/// - `load_all` returns entries sorted by `entered` descending, ties broken
///   ascending by id, so repeated calls with no intervening mutation return
///   the identical order.
/// - `count_newer_than` uses an exclusive lower bound at millisecond
///   resolution: an entry entered exactly at the cutoff does not count.
/// - Missing or malformed ids resolve to absence, never to an error.
/// - Implementations are safe for concurrent callers sharing one instance;
///   racing updates on the same id are last-write-wins.
pub trait EntryDao: Send + Sync {
    /// Insert a new entry.
    ///
    /// Returns [`StoreError::DuplicateId`] if an entry with the same id is
    /// already stored; the existing entry is left untouched.
    fn add(&self, entry: Entry) -> Result<(), StoreError>;

    /// Look up an entry by id.
    ///
    /// Returns `Ok(None)` for a missing id, including ids that fail the
    /// 24-hex shape check.
    fn load(&self, id: &Id) -> Result<Option<Entry>, StoreError>;

    /// Delete the entry with the given id. A no-op if it does not exist.
    fn remove(&self, id: &Id) -> Result<(), StoreError>;

    /// Replace the text of an existing entry, leaving `id`, `author_id`,
    /// and `entered` unchanged. A no-op if the id does not exist; never
    /// creates an entry.
    fn update_text(&self, id: &Id, text: &str) -> Result<(), StoreError>;

    /// Total number of stored entries.
    fn count(&self) -> Result<u64, StoreError>;

    /// Every stored entry, newest first.
    fn load_all(&self) -> Result<Vec<Entry>, StoreError>;

    /// Number of entries whose `entered` is strictly after the cutoff.
    fn count_newer_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;

    /// All entries by the given author, in unspecified order. Returns an
    /// empty `Vec` for an author with no entries.
    fn load_authored_by(&self, author: &Id) -> Result<Vec<Entry>, StoreError>;
}
