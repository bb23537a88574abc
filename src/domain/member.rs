use std::{cmp::Ordering, fmt};

use crate::domain::book::cmp_ignore_case;

/// The most books a member may hold at once.
pub const MAX_ISSUED_BOOKS: usize = 5;

/// A registered library member.
///
/// Issued books are tracked by book id in the order they were borrowed.
/// The same id may appear more than once; no duplicate check is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    id: String,
    name: String,
    issued_books: Vec<String>,
}

impl Member {
    /// Construct a new [`Member`] holding no books.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            issued_books: Vec::new(),
        }
    }

    /// Rebuild a member from a persisted issued-books sequence.
    ///
    /// Returns `None` if the sequence exceeds [`MAX_ISSUED_BOOKS`].
    #[must_use]
    pub fn restore(id: String, name: String, issued_books: Vec<String>) -> Option<Self> {
        (issued_books.len() <= MAX_ISSUED_BOOKS).then_some(Self {
            id,
            name,
            issued_books,
        })
    }

    /// The unique identifier of this member.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The member's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ids of the books currently held, in borrowing order.
    #[must_use]
    pub fn issued_books(&self) -> &[String] {
        &self.issued_books
    }

    /// Record a borrowed book.
    ///
    /// Returns `false` if the member already holds [`MAX_ISSUED_BOOKS`].
    pub fn borrow(&mut self, book_id: impl Into<String>) -> bool {
        if self.issued_books.len() >= MAX_ISSUED_BOOKS {
            return false;
        }
        self.issued_books.push(book_id.into());
        true
    }

    /// Remove the first record of `book_id`.
    ///
    /// Returns `false` if the member does not hold that book.
    pub fn give_back(&mut self, book_id: &str) -> bool {
        let Some(pos) = self.issued_books.iter().position(|id| id == book_id) else {
            return false;
        };
        self.issued_books.remove(pos);
        true
    }

    /// Compare two members by name, ignoring case.
    #[must_use]
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        cmp_ignore_case(&self.name, &other.name)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Member[{}] {} | Books issued: {}",
            self.id,
            self.name,
            self.issued_books.len()
        )
    }
}
