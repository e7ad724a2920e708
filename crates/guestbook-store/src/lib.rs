// ABOUTME: Storage layer for guestbook, defining the EntryDao contract and its backends.
// ABOUTME: Provides the in-memory reference implementation and the SQLite document store.

pub mod dao;
pub mod memory;
pub mod sqlite;

pub use dao::{EntryDao, StoreError};
pub use memory::MemoryEntryDao;
pub use sqlite::SqliteEntryDao;
