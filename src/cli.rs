use std::path::{Path, PathBuf};

mod circulation;
mod list;
mod shell;
mod terminal;
mod transactions;

use circulation::{AddBook, AddMember, Issue, Return};
use clap::ArgAction;
use list::{Books, Members};
use shelf::{Config, Library};
use tracing::instrument;
use transactions::Transactions;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the library data directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or(Command::Shell)
            .run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Run the interactive menu (default)
    Shell,

    /// Initialize a new library data directory
    Init,

    /// Catalogue a new book
    AddBook(AddBook),

    /// Register a new member
    AddMember(AddMember),

    /// Issue a book to a member
    Issue(Issue),

    /// Return a book from a member
    Return(Return),

    /// List all books
    Books(Books),

    /// List all members
    Members(Members),

    /// Show recent transactions
    Log(Transactions),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Shell => shell::run(root)?,
            Self::Init => Init::run(root)?,
            Self::AddBook(command) => command.run(root)?,
            Self::AddMember(command) => command.run(root)?,
            Self::Issue(command) => command.run(root)?,
            Self::Return(command) => command.run(root)?,
            Self::Books(command) => command.run(root)?,
            Self::Members(command) => command.run(root)?,
            Self::Log(command) => command.run(root)?,
        }
        Ok(())
    }
}

/// Open the library at `root` using its configuration, if any.
fn open_library(root: &Path) -> Library {
    let config = Config::load_or_default(root);
    Library::open(root, &config)
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(Config::FILE_NAME);
        if config_path.exists() {
            anyhow::bail!(
                "Library already initialized (found existing {})",
                Config::FILE_NAME
            );
        }

        std::fs::create_dir_all(root)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", root.display()))?;

        Config::default()
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", Config::FILE_NAME))?;

        println!("Initialized library in {}", root.display());
        println!("  Created: {}", Config::FILE_NAME);
        println!();
        println!("Next steps:");
        println!("  shelf add-book B1 \"Dune\" \"Frank Herbert\" 2");
        println!("  shelf add-member M1 \"Alice\"");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use shelf::Config;
    use tempfile::tempdir;

    use super::Init;

    #[test]
    fn init_writes_default_config() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("library");

        Init::run(&root).unwrap();

        let config = Config::load(&root.join(Config::FILE_NAME)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let tmp = tempdir().unwrap();
        Init::run(tmp.path()).unwrap();

        let err = Init::run(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("already initialized"));
    }
}
