// ABOUTME: Core library for guestbook, containing the domain types shared by all backends.
// ABOUTME: Defines the Entry record and the 24-hex Id identifier type.

pub mod entry;
pub mod id;

pub use entry::Entry;
pub use id::Id;
