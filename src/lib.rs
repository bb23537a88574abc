//! Plain-text Library Management
//!
//! Books and members are tracked in memory and persisted as YAML snapshots
//! alongside an append-only transaction journal.

pub mod domain;
pub use domain::{Book, Config, Library, LibraryError, Member};

/// Snapshot persistence and the transaction journal.
pub mod storage;
pub use storage::{Journal, SnapshotStore};
