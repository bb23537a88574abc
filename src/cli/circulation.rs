//! Commands that change the catalogue or the loans on it.
//!
//! Each command loads the library, applies one change, and saves the
//! library again if the change was accepted.

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use shelf::{Book, Library, Member};
use tracing::instrument;

use super::{open_library, terminal::Tone};

#[derive(Debug, Parser)]
pub struct AddBook {
    /// Unique id of the book
    id: String,

    /// Title of the book
    title: String,

    /// Author of the book
    author: String,

    /// Number of copies the library owns
    copies: u32,
}

impl AddBook {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let book = Book::new(self.id, self.title, self.author, self.copies);
        apply(root, |library| library.add_book(book), "Book added.")
    }
}

#[derive(Debug, Parser)]
pub struct AddMember {
    /// Unique id of the member
    id: String,

    /// Name of the member
    name: String,
}

impl AddMember {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let member = Member::new(self.id, self.name);
        apply(root, |library| library.add_member(member), "Member added.")
    }
}

#[derive(Debug, Parser)]
pub struct Issue {
    /// The member borrowing the book
    member: String,

    /// The book being borrowed
    book: String,
}

impl Issue {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        apply(
            root,
            |library| library.issue_book(&self.member, &self.book),
            "Issued.",
        )
    }
}

#[derive(Debug, Parser)]
pub struct Return {
    /// The member returning the book
    member: String,

    /// The book being returned
    book: String,
}

impl Return {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        apply(
            root,
            |library| library.return_book(&self.member, &self.book),
            "Returned.",
        )
    }
}

fn apply<F>(root: &Path, change: F, success: &str) -> anyhow::Result<()>
where
    F: FnOnce(&mut Library) -> Result<(), shelf::LibraryError>,
{
    let mut library = open_library(root);
    change(&mut library)?;
    library
        .save_state()
        .context("change applied but the library could not be saved")?;

    println!("{}", Tone::Success.paint(&format!("✔ {success}")));
    Ok(())
}
