//! Domain models for library management.
//!
//! This module contains the core domain types: books, members, the library
//! that owns them, and the on-disk configuration.

/// Book domain model.
pub mod book;
pub use book::Book;

/// Member domain model.
pub mod member;
pub use member::{MAX_ISSUED_BOOKS, Member};

mod config;
pub use config::Config;

/// The library registry and its checkout rules.
pub mod library;
pub use library::{Library, LibraryError};
