//! An append-only transaction journal.
//!
//! Each entry is a single line of the form `<YYYY-MM-DD> - <message>`.

use std::{
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate};

/// A journal backed by a text file.
///
/// The file is opened in append mode for every entry and closed again
/// straight after, so nothing is held open between transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journal {
    path: PathBuf,
}

/// Errors that can occur when writing to or reading from the journal.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// The journal file could not be opened, written, or read.
    #[error("journal I/O failed at {path}")]
    Io {
        /// The journal path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

impl Journal {
    /// A journal writing to the file at `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The path of the journal file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry stamped with today's local date.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal file cannot be opened or written.
    pub fn record(&self, message: &str) -> Result<(), JournalError> {
        self.record_on(Local::now().date_naive(), message)
    }

    /// Append an entry stamped with the given date.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal file cannot be opened or written.
    pub fn record_on(&self, date: NaiveDate, message: &str) -> Result<(), JournalError> {
        self.append(&format_entry(date, message))
            .map_err(|source| self.io_error(source))
    }

    /// Read back every entry in the journal, oldest first.
    ///
    /// A journal that has never been written reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal file exists but cannot be read.
    pub fn entries(&self) -> Result<Vec<String>, JournalError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        BufReader::new(file)
            .lines()
            .collect::<Result<_, _>>()
            .map_err(|source| self.io_error(source))
    }

    fn append(&self, line: &str) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{line}")?;
        writer.flush()
    }

    fn io_error(&self, source: io::Error) -> JournalError {
        JournalError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn format_entry(date: NaiveDate, message: &str) -> String {
    format!("{} - {message}", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDate};
    use tempfile::tempdir;

    use super::{Journal, JournalError, format_entry};

    #[test]
    fn entries_use_iso_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(format_entry(date, "State Saved"), "2024-03-09 - State Saved");
    }

    #[test]
    fn record_appends_lines() {
        let tmp = tempdir().unwrap();
        let journal = Journal::new(tmp.path().join("transactions.log"));
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        journal.record_on(date, "first").unwrap();
        journal.record_on(date, "second").unwrap();

        assert_eq!(
            journal.entries().unwrap(),
            ["2024-01-02 - first", "2024-01-02 - second"]
        );

        let raw = std::fs::read_to_string(journal.path()).unwrap();
        assert!(raw.ends_with('\n'));
    }

    #[test]
    fn record_preserves_existing_content() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("transactions.log");
        std::fs::write(&path, "2023-12-31 - older\n").unwrap();

        let journal = Journal::new(path);
        journal.record("newer").unwrap();

        let entries = journal.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], "2023-12-31 - older");
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(entries[1], format!("{today} - newer"));
    }

    #[test]
    fn missing_journal_reads_as_empty() {
        let tmp = tempdir().unwrap();
        let journal = Journal::new(tmp.path().join("never-written.log"));
        assert!(journal.entries().unwrap().is_empty());
    }

    #[test]
    fn unwritable_journal_reports_error() {
        let tmp = tempdir().unwrap();
        let journal = Journal::new(tmp.path().join("missing-dir").join("transactions.log"));

        let err = journal.record("lost").unwrap_err();
        assert!(matches!(err, JournalError::Io { .. }));
    }
}
