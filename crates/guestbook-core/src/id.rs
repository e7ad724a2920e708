// ABOUTME: Defines Id, the 24-hex-character object identifier used for entries and authors.
// ABOUTME: Ids are lenient to construct; malformed values never match anything in a store.

use std::fmt;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An opaque object identifier: 24 hexadecimal characters (12 bytes).
///
/// Equality, ordering, and hashing are by string value. Construction from
/// arbitrary strings is deliberately allowed so lookups never fail at the
/// type level; a value that does not pass [`Id::is_valid`] simply never
/// matches a stored entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Length in characters of a well-formed identifier.
    pub const LEN: usize = 24;

    /// Generate a fresh identifier: 4 bytes of unix seconds followed by
    /// 8 random bytes, hex-encoded lowercase.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 12];
        let secs = Utc::now().timestamp() as u32;
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        rand::thread_rng().fill(&mut bytes[4..]);
        Id(hex::encode(bytes))
    }

    /// Whether this value has the 24-hex-character shape. Either hex case
    /// is accepted; comparison is still by exact string value.
    pub fn is_valid(&self) -> bool {
        self.0.len() == Self::LEN && self.0.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id(value.to_string())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
