use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for a library data directory.
///
/// This struct names the files the library persists to. Relative paths are
/// resolved against the library root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The snapshot file holding the book mapping.
    pub books: PathBuf,

    /// The snapshot file holding the member mapping.
    pub members: PathBuf,

    /// The append-only transaction journal.
    pub journal: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            books: default_books_file(),
            members: default_members_file(),
            journal: default_journal_file(),
        }
    }
}

impl Config {
    /// The name of the configuration file within a library root.
    pub const FILE_NAME: &'static str = "library.toml";

    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration from a library root, falling back to the
    /// defaults if none can be read.
    #[must_use]
    pub fn load_or_default(root: &Path) -> Self {
        let path = root.join(Self::FILE_NAME);
        Self::load(&path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The book snapshot path, resolved against `root`.
    #[must_use]
    pub fn books_path(&self, root: &Path) -> PathBuf {
        root.join(&self.books)
    }

    /// The member snapshot path, resolved against `root`.
    #[must_use]
    pub fn members_path(&self, root: &Path) -> PathBuf {
        root.join(&self.members)
    }

    /// The journal path, resolved against `root`.
    #[must_use]
    pub fn journal_path(&self, root: &Path) -> PathBuf {
        root.join(&self.journal)
    }
}

fn default_books_file() -> PathBuf {
    PathBuf::from("books.yaml")
}

fn default_members_file() -> PathBuf {
    PathBuf::from("members.yaml")
}

fn default_journal_file() -> PathBuf {
    PathBuf::from("transactions.log")
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_books_file")]
        books_file: PathBuf,

        #[serde(default = "default_members_file")]
        members_file: PathBuf,

        #[serde(default = "default_journal_file")]
        journal_file: PathBuf,
    },
}

impl From<Versions> for super::Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                books_file,
                members_file,
                journal_file,
            } => Self {
                books: books_file,
                members: members_file,
                journal: journal_file,
            },
        }
    }
}

impl From<super::Config> for Versions {
    fn from(config: super::Config) -> Self {
        Self::V1 {
            books_file: config.books,
            members_file: config.members,
            journal_file: config.journal,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write, path::Path};

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nbooks_file = \"data/books.yaml\"\nmembers_file = \"data/members.yaml\"\njournal_file = \"audit.log\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.books, Path::new("data/books.yaml"));
        assert_eq!(config.members, Path::new("data/members.yaml"));
        assert_eq!(config.journal, Path::new("audit.log"));
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nbooks_file = 3\n").unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(Config::FILE_NAME);
        let config = Config {
            journal: "audit.log".into(),
            ..Config::default()
        };

        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_or_default(tmp.path()), Config::default());
    }

    #[test]
    fn paths_resolve_against_root() {
        let config = Config::default();
        let root = Path::new("/srv/library");
        assert_eq!(config.books_path(root), root.join("books.yaml"));
        assert_eq!(config.members_path(root), root.join("members.yaml"));
        assert_eq!(config.journal_path(root), root.join("transactions.log"));
    }
}
