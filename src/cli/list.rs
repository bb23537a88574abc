use std::path::Path;

use clap::{Parser, ValueEnum};
use serde_json::json;
use shelf::{Book, Member};
use tracing::instrument;

use super::{
    open_library,
    terminal::{Tone, is_narrow},
};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Command arguments for `shelf books`.
#[derive(Debug, Parser)]
pub struct Books {
    /// Sort by title (case-insensitive) instead of id.
    #[arg(long)]
    sort: bool,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Books {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let library = open_library(root);
        let books = if self.sort {
            library.sorted_books()
        } else {
            library.books().collect()
        };

        match self.output {
            OutputFormat::Table => print_books(&books),
            OutputFormat::Json => println!("{}", books_json(&books)?),
        }
        Ok(())
    }
}

/// Command arguments for `shelf members`.
#[derive(Debug, Parser)]
pub struct Members {
    /// Sort by name (case-insensitive) instead of id.
    #[arg(long)]
    sort: bool,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Members {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let library = open_library(root);
        let members = if self.sort {
            library.sorted_members()
        } else {
            library.members().collect()
        };

        match self.output {
            OutputFormat::Table => print_members(&members),
            OutputFormat::Json => println!("{}", members_json(&members)?),
        }
        Ok(())
    }
}

pub fn print_books(books: &[&Book]) {
    if books.is_empty() {
        println!("No books.");
        return;
    }

    if is_narrow() {
        for book in books {
            println!("{book}");
        }
        return;
    }

    let header = format!(
        "{:<10} {:<32} {:<24} {:<10} On loan",
        "ID", "Title", "Author", "Available"
    );
    println!("{}", Tone::Muted.paint(&header));
    for book in books {
        let counts = format!("{}/{}", book.available(), book.total());
        println!(
            "{:<10} {:<32} {:<24} {counts:<10} {}",
            book.id(),
            book.title(),
            book.author(),
            book.issued()
        );
    }
}

pub fn print_members(members: &[&Member]) {
    if members.is_empty() {
        println!("No members.");
        return;
    }

    if is_narrow() {
        for member in members {
            println!("{member}");
        }
        return;
    }

    let header = format!("{:<10} {:<32} Issued", "ID", "Name");
    println!("{}", Tone::Muted.paint(&header));
    for member in members {
        println!(
            "{:<10} {:<32} {}",
            member.id(),
            member.name(),
            member.issued_books().join(", ")
        );
    }
}

fn books_json(books: &[&Book]) -> serde_json::Result<String> {
    let books: Vec<_> = books
        .iter()
        .map(|book| {
            json!({
                "id": book.id(),
                "title": book.title(),
                "author": book.author(),
                "total": book.total(),
                "available": book.available(),
                "issued": book.issued(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&books)
}

fn members_json(members: &[&Member]) -> serde_json::Result<String> {
    let members: Vec<_> = members
        .iter()
        .map(|member| {
            json!({
                "id": member.id(),
                "name": member.name(),
                "issued_books": member.issued_books(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&members)
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use shelf::{Book, Member};

    use super::{books_json, members_json};

    #[test]
    fn books_json_lists_counts() {
        let mut dune = Book::new("B1", "Dune", "Herbert", 2);
        dune.issue();

        let value: Value = serde_json::from_str(&books_json(&[&dune]).unwrap()).unwrap();

        assert_eq!(value[0]["id"], "B1");
        assert_eq!(value[0]["total"], 2);
        assert_eq!(value[0]["available"], 1);
        assert_eq!(value[0]["issued"], 1);
    }

    #[test]
    fn members_json_keeps_issue_order() {
        let mut alice = Member::new("M1", "Alice");
        alice.borrow("B2");
        alice.borrow("B1");

        let value: Value = serde_json::from_str(&members_json(&[&alice]).unwrap()).unwrap();

        assert_eq!(value[0]["name"], "Alice");
        assert_eq!(value[0]["issued_books"], serde_json::json!(["B2", "B1"]));
    }

    #[test]
    fn empty_listing_is_an_empty_array() {
        assert_eq!(books_json(&[]).unwrap(), "[]");
        assert_eq!(members_json(&[]).unwrap(), "[]");
    }
}
