use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::domain::{Book, Member};

/// A pair of YAML snapshot files holding the book and member mappings.
///
/// Each file is a versioned document wrapping a map keyed by entity id.
/// Both files are read and written whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotStore {
    books_path: PathBuf,
    members_path: PathBuf,
}

/// Errors that can occur when loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The snapshot file was not found.
    #[error("snapshot file not found")]
    NotFound,
    /// An I/O error occurred.
    #[error("failed to read snapshot")]
    Io(#[from] io::Error),
    /// The YAML could not be parsed.
    #[error("malformed snapshot")]
    Yaml(#[from] serde_yaml::Error),
    /// A record violates an entity invariant.
    #[error("inconsistent record '{0}'")]
    Inconsistent(String),
}

impl LoadError {
    /// Whether the snapshot simply has not been written yet.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Errors that can occur when saving a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// An I/O error occurred.
    #[error("failed to write snapshot {}", .path.display())]
    Io {
        /// The snapshot path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The mapping could not be serialized.
    #[error("failed to serialize snapshot {}", .path.display())]
    Yaml {
        /// The snapshot path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_yaml::Error,
    },
}

impl SnapshotStore {
    /// A store reading from and writing to the given files.
    #[must_use]
    pub const fn new(books_path: PathBuf, members_path: PathBuf) -> Self {
        Self {
            books_path,
            members_path,
        }
    }

    /// The path of the book snapshot.
    #[must_use]
    pub fn books_path(&self) -> &Path {
        &self.books_path
    }

    /// The path of the member snapshot.
    #[must_use]
    pub fn members_path(&self) -> &Path {
        &self.members_path
    }

    /// Load the book mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, malformed, or holds
    /// a book whose availability exceeds its total.
    pub fn load_books(&self) -> Result<BTreeMap<String, Book>, LoadError> {
        let BooksFile::V1 { books } = read_yaml::<BooksFile<String>>(&self.books_path)?;
        books
            .into_iter()
            .map(|(id, record)| -> Result<_, LoadError> {
                let book = Book::restore(
                    id.clone(),
                    record.title,
                    record.author,
                    record.total,
                    record.available,
                )
                .ok_or_else(|| LoadError::Inconsistent(id.clone()))?;
                Ok((id, book))
            })
            .collect()
    }

    /// Load the member mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, malformed, or holds
    /// a member over the borrowing cap.
    pub fn load_members(&self) -> Result<BTreeMap<String, Member>, LoadError> {
        let MembersFile::V1 { members } = read_yaml::<MembersFile<String>>(&self.members_path)?;
        members
            .into_iter()
            .map(|(id, record)| -> Result<_, LoadError> {
                let member = Member::restore(id.clone(), record.name, record.issued_books)
                    .ok_or_else(|| LoadError::Inconsistent(id.clone()))?;
                Ok((id, member))
            })
            .collect()
    }

    /// Save the book mapping, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save_books<'a>(
        &self,
        books: impl IntoIterator<Item = &'a Book>,
    ) -> Result<(), SaveError> {
        let books = books
            .into_iter()
            .map(|book| (book.id(), BookRecord::from(book)))
            .collect();
        write_yaml(&self.books_path, &BooksFile::V1 { books })
    }

    /// Save the member mapping, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save_members<'a>(
        &self,
        members: impl IntoIterator<Item = &'a Member>,
    ) -> Result<(), SaveError> {
        let members = members
            .into_iter()
            .map(|member| (member.id(), MemberRecord::from(member)))
            .collect();
        write_yaml(&self.members_path, &MembersFile::V1 { members })
    }
}

fn read_yaml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, LoadError> {
    let file = File::open(path).map_err(|io_error| match io_error.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound,
        _ => LoadError::Io(io_error),
    })?;

    Ok(serde_yaml::from_reader(BufReader::new(file))?)
}

fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<(), SaveError> {
    let io_error = |source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    };

    // serialize first; a failure must leave the previous snapshot untouched
    let content = serde_yaml::to_string(value).map_err(|source| SaveError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes()).map_err(io_error)?;
    writer.flush().map_err(io_error)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum BooksFile<K: Ord> {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        books: BTreeMap<K, BookRecord>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct BookRecord {
    title: String,
    author: String,
    total: u32,
    available: u32,
}

impl From<&Book> for BookRecord {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title().to_string(),
            author: book.author().to_string(),
            total: book.total(),
            available: book.available(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum MembersFile<K: Ord> {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        members: BTreeMap<K, MemberRecord>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct MemberRecord {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    issued_books: Vec<String>,
}

impl From<&Member> for MemberRecord {
    fn from(member: &Member) -> Self {
        Self {
            name: member.name().to_string(),
            issued_books: member.issued_books().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{LoadError, SaveError, SnapshotStore};
    use crate::domain::{Book, Member};

    fn store_in(dir: &std::path::Path) -> SnapshotStore {
        SnapshotStore::new(dir.join("books.yaml"), dir.join("members.yaml"))
    }

    #[test]
    fn books_survive_a_save_and_load() {
        let tmp = tempdir().unwrap();
        let store = store_in(tmp.path());

        let mut dune = Book::new("B1", "Dune", "Herbert", 3);
        dune.issue();
        let emma = Book::new("B2", "Emma", "Austen", 1);

        store.save_books([&dune, &emma]).unwrap();
        let loaded = store.load_books().unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["B1"], dune);
        assert_eq!(loaded["B2"], emma);
    }

    #[test]
    fn members_keep_issued_order() {
        let tmp = tempdir().unwrap();
        let store = store_in(tmp.path());

        let mut alice = Member::new("M1", "Alice");
        alice.borrow("B2");
        alice.borrow("B1");
        alice.borrow("B2");
        let bob = Member::new("M2", "Bob");

        store.save_members([&alice, &bob]).unwrap();
        let loaded = store.load_members().unwrap();

        assert_eq!(loaded["M1"].issued_books(), ["B2", "B1", "B2"]);
        assert_eq!(loaded["M2"], bob);
    }

    #[test]
    fn missing_snapshot_is_not_found() {
        let tmp = tempdir().unwrap();
        let store = store_in(tmp.path());

        assert!(matches!(store.load_books(), Err(LoadError::NotFound)));
        assert!(matches!(store.load_members(), Err(LoadError::NotFound)));
        assert!(store.load_books().unwrap_err().is_missing());
    }

    #[test]
    fn garbage_snapshot_is_malformed() {
        let tmp = tempdir().unwrap();
        let store = store_in(tmp.path());
        std::fs::write(store.books_path(), "\u{0}\u{1}not yaml: [").unwrap();

        let err = store.load_books().unwrap_err();
        assert!(matches!(err, LoadError::Yaml(_)));
        assert!(!err.is_missing());
    }

    #[test]
    fn mismatched_snapshot_is_malformed() {
        let tmp = tempdir().unwrap();
        let store = store_in(tmp.path());
        // a member file where books are expected
        std::fs::write(
            store.books_path(),
            "_version: '1'\nbooks:\n  M1:\n    name: Alice\n",
        )
        .unwrap();

        assert!(matches!(store.load_books(), Err(LoadError::Yaml(_))));
    }

    #[test]
    fn unknown_version_is_malformed() {
        let tmp = tempdir().unwrap();
        let store = store_in(tmp.path());
        std::fs::write(store.members_path(), "_version: '2'\nmembers: {}\n").unwrap();

        assert!(matches!(store.load_members(), Err(LoadError::Yaml(_))));
    }

    #[test]
    fn overfull_book_is_inconsistent() {
        let tmp = tempdir().unwrap();
        let store = store_in(tmp.path());
        std::fs::write(
            store.books_path(),
            "_version: '1'\nbooks:\n  B1:\n    title: Dune\n    author: Herbert\n    total: 1\n    available: 2\n",
        )
        .unwrap();

        match store.load_books() {
            Err(LoadError::Inconsistent(id)) => assert_eq!(id, "B1"),
            other => panic!("expected inconsistent record, got {other:?}"),
        }
    }

    #[test]
    fn empty_mapping_round_trips() {
        let tmp = tempdir().unwrap();
        let store = store_in(tmp.path());

        store.save_books([]).unwrap();
        store.save_members([]).unwrap();

        assert!(store.load_books().unwrap().is_empty());
        assert!(store.load_members().unwrap().is_empty());
    }

    #[test]
    fn save_creates_parent_directories() {
        let tmp = tempdir().unwrap();
        let nested = tmp.path().join("data").join("snapshots");
        let store = store_in(&nested);

        store.save_books([&Book::new("B1", "Dune", "Herbert", 1)]).unwrap();

        assert!(store.books_path().exists());
    }

    #[test]
    fn save_into_a_file_path_fails() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = store_in(&blocker);

        let err = store.save_members([]).unwrap_err();
        assert!(matches!(err, SaveError::Io { .. }));
    }
}
