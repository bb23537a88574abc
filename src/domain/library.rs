//! The in-memory registry of books and members.
//!
//! The [`Library`] owns every [`Book`] and [`Member`] and enforces the
//! checkout rules between them. Persistence is delegated to a
//! [`SnapshotStore`] and every successful change is recorded in a
//! [`Journal`].

use std::{collections::BTreeMap, path::Path};

use thiserror::Error;
use tracing::instrument;

use crate::{
    domain::{Book, Config, Member},
    storage::{Journal, LoadError, SaveError, SnapshotStore},
};

/// Errors that can occur when changing the library.
///
/// None of these leave the library partially modified.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LibraryError {
    /// A book with this id is already catalogued.
    #[error("book {0} already exists")]
    DuplicateBook(String),
    /// A member with this id is already registered.
    #[error("member {0} already exists")]
    DuplicateMember(String),
    /// No member has this id.
    #[error("member {0} not found")]
    MemberNotFound(String),
    /// No book has this id.
    #[error("book {0} not found")]
    BookNotFound(String),
    /// Every copy of the book is out on loan.
    #[error("no copies of book {0} are available")]
    NoCopiesAvailable(String),
    /// The member already holds the maximum number of books.
    #[error("member {0} has reached the borrowing limit")]
    BorrowLimitReached(String),
    /// The member does not hold the book being returned.
    #[error("book {book} is not issued to member {member}")]
    NotIssued {
        /// The member returning the book.
        member: String,
        /// The book being returned.
        book: String,
    },
}

/// A library of books and members.
///
/// Entities are kept in id order, which is the order [`Library::books`] and
/// [`Library::members`] yield them in.
#[derive(Debug)]
pub struct Library {
    books: BTreeMap<String, Book>,
    members: BTreeMap<String, Member>,
    store: SnapshotStore,
    journal: Journal,
}

impl Library {
    /// Creates an empty library over the given collaborators.
    ///
    /// Nothing is read from the store until [`Library::load_state`] is called.
    #[must_use]
    pub const fn new(store: SnapshotStore, journal: Journal) -> Self {
        Self {
            books: BTreeMap::new(),
            members: BTreeMap::new(),
            store,
            journal,
        }
    }

    /// Opens the library rooted at `root` and loads any saved state.
    #[must_use]
    pub fn open(root: &Path, config: &Config) -> Self {
        let store = SnapshotStore::new(config.books_path(root), config.members_path(root));
        let journal = Journal::new(config.journal_path(root));

        let mut library = Self::new(store, journal);
        library.load_state();
        library
    }

    /// Catalogue a new book.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::DuplicateBook`] if the id is taken. The existing
    /// book is left unchanged.
    #[instrument(level = "debug", skip(self, book), fields(id = book.id()))]
    pub fn add_book(&mut self, book: Book) -> Result<(), LibraryError> {
        if self.books.contains_key(book.id()) {
            return Err(LibraryError::DuplicateBook(book.id().to_string()));
        }
        self.log(&format!("Added Book: {book}"));
        self.books.insert(book.id().to_string(), book);
        Ok(())
    }

    /// Register a new member.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::DuplicateMember`] if the id is taken. The
    /// existing member is left unchanged.
    #[instrument(level = "debug", skip(self, member), fields(id = member.id()))]
    pub fn add_member(&mut self, member: Member) -> Result<(), LibraryError> {
        if self.members.contains_key(member.id()) {
            return Err(LibraryError::DuplicateMember(member.id().to_string()));
        }
        self.log(&format!("Added Member: {member}"));
        self.members.insert(member.id().to_string(), member);
        Ok(())
    }

    /// Lend a copy of a book to a member.
    ///
    /// The copy is taken off the shelf before the loan is recorded against the
    /// member. If the member is already at the borrowing limit the copy is put
    /// back, so a failed issue leaves both sides as they were.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::MemberNotFound`] / [`LibraryError::BookNotFound`] if
    ///   either id is unknown
    /// - [`LibraryError::NoCopiesAvailable`] if every copy is out
    /// - [`LibraryError::BorrowLimitReached`] if the member holds too many books
    #[instrument(level = "debug", skip(self))]
    pub fn issue_book(&mut self, member_id: &str, book_id: &str) -> Result<(), LibraryError> {
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| LibraryError::MemberNotFound(member_id.to_string()))?;
        let book = self
            .books
            .get_mut(book_id)
            .ok_or_else(|| LibraryError::BookNotFound(book_id.to_string()))?;

        if !book.issue() {
            return Err(LibraryError::NoCopiesAvailable(book_id.to_string()));
        }

        if !member.borrow(book_id) {
            book.receive();
            tracing::debug!(book_id, "returned copy to shelf after failed borrow");
            return Err(LibraryError::BorrowLimitReached(member_id.to_string()));
        }

        self.log(&format!("Issued: Book {book_id} to Member {member_id}"));
        Ok(())
    }

    /// Take a book back from a member.
    ///
    /// The copy goes back on the shelf as long as the member held it, even if
    /// the book already shows every copy as available.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::MemberNotFound`] / [`LibraryError::BookNotFound`] if
    ///   either id is unknown
    /// - [`LibraryError::NotIssued`] if the member does not hold the book; the
    ///   book is left untouched
    #[instrument(level = "debug", skip(self))]
    pub fn return_book(&mut self, member_id: &str, book_id: &str) -> Result<(), LibraryError> {
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| LibraryError::MemberNotFound(member_id.to_string()))?;
        let book = self
            .books
            .get_mut(book_id)
            .ok_or_else(|| LibraryError::BookNotFound(book_id.to_string()))?;

        if !member.give_back(book_id) {
            return Err(LibraryError::NotIssued {
                member: member_id.to_string(),
                book: book_id.to_string(),
            });
        }

        if !book.receive() {
            tracing::warn!(book_id, "returned book was already fully available");
        }

        self.log(&format!("Returned: Book {book_id} by Member {member_id}"));
        Ok(())
    }

    /// Look up a book by id.
    #[must_use]
    pub fn book(&self, id: &str) -> Option<&Book> {
        self.books.get(id)
    }

    /// Look up a member by id.
    #[must_use]
    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.get(id)
    }

    /// All books, in id order.
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// All members, in id order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// All books sorted by title, ignoring case.
    ///
    /// Books with equal titles stay in id order.
    #[must_use]
    pub fn sorted_books(&self) -> Vec<&Book> {
        let mut books: Vec<_> = self.books().collect();
        books.sort_by(|a, b| a.cmp_by_title(b));
        books
    }

    /// All members sorted by name, ignoring case.
    ///
    /// Members with equal names stay in id order.
    #[must_use]
    pub fn sorted_members(&self) -> Vec<&Member> {
        let mut members: Vec<_> = self.members().collect();
        members.sort_by(|a, b| a.cmp_by_name(b));
        members
    }

    /// Write both mappings to the snapshot store.
    ///
    /// Both snapshots are attempted and the save is journaled whatever the
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns the first snapshot that failed to write.
    #[instrument(level = "debug", skip(self))]
    pub fn save_state(&self) -> Result<(), SaveError> {
        let books = self.store.save_books(self.books.values());
        let members = self.store.save_members(self.members.values());

        for error in [books.as_ref().err(), members.as_ref().err()].into_iter().flatten() {
            tracing::warn!("{error}");
        }

        self.log("State Saved");
        books.and(members)
    }

    /// Replace both mappings with the saved snapshots.
    ///
    /// A snapshot that is missing or cannot be read leaves its mapping empty.
    #[instrument(level = "debug", skip(self))]
    pub fn load_state(&mut self) {
        self.books = self.store.load_books().unwrap_or_else(|e| {
            report_load_failure("books", self.store.books_path(), &e);
            BTreeMap::new()
        });
        self.members = self.store.load_members().unwrap_or_else(|e| {
            report_load_failure("members", self.store.members_path(), &e);
            BTreeMap::new()
        });
    }

    /// The journal this library records transactions in.
    #[must_use]
    pub const fn journal(&self) -> &Journal {
        &self.journal
    }

    fn log(&self, message: &str) {
        if let Err(e) = self.journal.record(message) {
            tracing::debug!("Failed to write journal entry: {e}");
        }
    }
}

// A missing snapshot is an ordinary first run; anything else is worth a warning.
fn report_load_failure(what: &str, path: &Path, error: &LoadError) {
    if error.is_missing() {
        tracing::debug!("No {what} snapshot at {}", path.display());
    } else {
        tracing::warn!("Failed to load {what} from {}: {error}", path.display());
    }
}
