pub mod journal;
/// YAML snapshots of the book and member mappings.
pub mod snapshot;

pub use journal::{Journal, JournalError};
pub use snapshot::{LoadError, SaveError, SnapshotStore};
