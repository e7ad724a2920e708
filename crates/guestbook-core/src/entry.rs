// ABOUTME: Defines the Entry struct, a timestamped, authored text record.
// ABOUTME: Entries are immutable values; only a store's update operation may replace the text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::Id;

/// A single guestbook entry. The `entered` timestamp carries millisecond
/// precision: constructors truncate to whole milliseconds so the value
/// survives the durable document mapping exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Id,
    pub text: String,
    pub author_id: Id,
    pub entered: DateTime<Utc>,
}

impl Entry {
    /// Create a new Entry with a fresh id, stamped with the current time.
    pub fn new(text: impl Into<String>, author_id: Id) -> Self {
        Self::dated(text, author_id, Utc::now())
    }

    /// Create a new Entry with a fresh id and an explicit `entered` time.
    pub fn dated(text: impl Into<String>, author_id: Id, entered: DateTime<Utc>) -> Self {
        Self {
            id: Id::generate(),
            text: text.into(),
            author_id,
            entered: truncate_to_millis(entered),
        }
    }
}

fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_generates_id_and_stamps_now() {
        let author = Id::generate();
        let entry = Entry::new("hello", author.clone());

        assert!(entry.id.is_valid());
        assert_eq!(entry.text, "hello");
        assert_eq!(entry.author_id, author);
        assert!(entry.entered <= Utc::now());
    }

    #[test]
    fn distinct_entries_get_distinct_ids() {
        let author = Id::generate();
        let a = Entry::new("one", author.clone());
        let b = Entry::new("two", author);

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn entered_is_truncated_to_whole_milliseconds() {
        let with_micros = Utc
            .with_ymd_and_hms(2014, 2, 10, 12, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(1500))
            .unwrap();
        let entry = Entry::dated("sub-ms", Id::generate(), with_micros);

        assert_eq!(entry.entered.timestamp_subsec_micros() % 1000, 0);
        assert_eq!(entry.entered.timestamp_millis(), with_micros.timestamp_millis());
    }

    #[test]
    fn entry_document_round_trip() {
        let entry = Entry::dated(
            "persist me",
            Id::generate(),
            Utc.with_ymd_and_hms(2014, 2, 7, 8, 30, 5).unwrap(),
        );

        let doc = serde_json::to_string(&entry).expect("serialize");
        let back: Entry = serde_json::from_str(&doc).expect("deserialize");

        assert_eq!(back, entry);
    }
}
