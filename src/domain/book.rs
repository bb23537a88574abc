use std::{cmp::Ordering, fmt};

/// A catalogued title and its copy counts.
///
/// The library holds `total` copies of a book, of which `available` are
/// currently on the shelf. The availability count only moves through
/// [`Book::issue`] and [`Book::receive`], so it always stays within
/// `0..=total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id: String,
    title: String,
    author: String,
    total: u32,
    available: u32,
}

impl Book {
    /// Construct a new [`Book`] with every copy available.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        total: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            total,
            available: total,
        }
    }

    /// Rebuild a book from persisted counts.
    ///
    /// Returns `None` if `available` exceeds `total`.
    #[must_use]
    pub fn restore(
        id: String,
        title: String,
        author: String,
        total: u32,
        available: u32,
    ) -> Option<Self> {
        (available <= total).then_some(Self {
            id,
            title,
            author,
            total,
            available,
        })
    }

    /// The unique identifier of this book.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The title of the book.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The author of the book.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// The number of copies the library owns.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// The number of copies currently on the shelf.
    #[must_use]
    pub const fn available(&self) -> u32 {
        self.available
    }

    /// The number of copies currently out on loan.
    #[must_use]
    pub const fn issued(&self) -> u32 {
        self.total - self.available
    }

    /// Take a copy off the shelf.
    ///
    /// Returns `false`, leaving the count untouched, if no copies are
    /// available.
    pub const fn issue(&mut self) -> bool {
        if self.available > 0 {
            self.available -= 1;
            true
        } else {
            false
        }
    }

    /// Put a copy back on the shelf.
    ///
    /// Returns `false`, leaving the count untouched, if every copy is
    /// already on the shelf.
    pub const fn receive(&mut self) -> bool {
        if self.available < self.total {
            self.available += 1;
            true
        } else {
            false
        }
    }

    /// Compare two books by title, ignoring case.
    #[must_use]
    pub fn cmp_by_title(&self, other: &Self) -> Ordering {
        cmp_ignore_case(&self.title, &other.title)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Book[{}] \"{}\" by {} | {}/{} available",
            self.id, self.title, self.author, self.available, self.total
        )
    }
}

/// Case-insensitive lexicographic comparison.
pub(crate) fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
