use std::path::Path;

use clap::Parser;
use tracing::instrument;

use super::open_library;

/// Command arguments for `shelf log`.
#[derive(Debug, Parser)]
pub struct Transactions {
    /// Show only the most recent N entries.
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

impl Transactions {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let library = open_library(root);
        let journal = library.journal();
        let entries = journal.entries()?;

        if entries.is_empty() {
            println!("No transactions recorded in {}.", journal.path().display());
            return Ok(());
        }

        for entry in tail(&entries, self.limit) {
            println!("{entry}");
        }
        Ok(())
    }
}

fn tail<T>(items: &[T], limit: usize) -> &[T] {
    &items[items.len().saturating_sub(limit)..]
}

#[cfg(test)]
mod tests {
    use super::tail;

    #[test]
    fn tail_keeps_most_recent() {
        let entries = ["a", "b", "c", "d"];
        assert_eq!(tail(&entries, 2), ["c", "d"]);
        assert_eq!(tail(&entries, 10), entries);
        assert!(tail(&entries, 0).is_empty());
    }
}
