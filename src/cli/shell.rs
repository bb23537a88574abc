//! The interactive menu.
//!
//! Changes are held in memory for the whole session and only written out by
//! the "Save & Exit" entry.

use std::{fmt, path::Path};

use dialoguer::{Input, Select};
use shelf::{Book, Library, Member};
use tracing::instrument;

use super::{
    list::{print_books, print_members},
    open_library,
    terminal::outcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    AddBook,
    AddMember,
    IssueBook,
    ReturnBook,
    ShowBooks,
    ShowMembers,
    SortBooks,
    SortMembers,
    SaveAndExit,
}

impl MenuItem {
    const ALL: [Self; 9] = [
        Self::AddBook,
        Self::AddMember,
        Self::IssueBook,
        Self::ReturnBook,
        Self::ShowBooks,
        Self::ShowMembers,
        Self::SortBooks,
        Self::SortMembers,
        Self::SaveAndExit,
    ];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AddBook => "Add Book",
            Self::AddMember => "Add Member",
            Self::IssueBook => "Issue Book",
            Self::ReturnBook => "Return Book",
            Self::ShowBooks => "Show All Books",
            Self::ShowMembers => "Show All Members",
            Self::SortBooks => "Sort Books (by Title)",
            Self::SortMembers => "Sort Members (by Name)",
            Self::SaveAndExit => "Save & Exit",
        };
        f.write_str(label)
    }
}

/// Run the menu until the user picks "Save & Exit".
#[instrument(level = "debug")]
pub fn run(root: &Path) -> anyhow::Result<()> {
    let mut library = open_library(root);

    println!("\n=== Library Management ===");

    loop {
        let selection = Select::new()
            .with_prompt("Choose an action")
            .items(MenuItem::ALL)
            .default(0)
            .interact()?;
        let Some(&item) = MenuItem::ALL.get(selection) else {
            continue;
        };

        match item {
            MenuItem::AddBook => {
                let book = prompt_book()?;
                println!("{}", outcome(&library.add_book(book), "Book added."));
            }
            MenuItem::AddMember => {
                let member = prompt_member()?;
                println!("{}", outcome(&library.add_member(member), "Member added."));
            }
            MenuItem::IssueBook => {
                let (member, book) = prompt_loan()?;
                println!("{}", outcome(&library.issue_book(&member, &book), "Issued."));
            }
            MenuItem::ReturnBook => {
                let (member, book) = prompt_loan()?;
                println!("{}", outcome(&library.return_book(&member, &book), "Returned."));
            }
            MenuItem::ShowBooks => print_books(&library.books().collect::<Vec<_>>()),
            MenuItem::ShowMembers => print_members(&library.members().collect::<Vec<_>>()),
            MenuItem::SortBooks => print_books(&library.sorted_books()),
            MenuItem::SortMembers => print_members(&library.sorted_members()),
            MenuItem::SaveAndExit => {
                save_and_exit(&library);
                return Ok(());
            }
        }
    }
}

fn prompt_book() -> anyhow::Result<Book> {
    let id: String = Input::new().with_prompt("Book ID").interact_text()?;
    let title: String = Input::new().with_prompt("Title").interact_text()?;
    let author: String = Input::new().with_prompt("Author").interact_text()?;
    let copies: u32 = Input::new().with_prompt("Total copies").interact_text()?;
    Ok(Book::new(id, title, author, copies))
}

fn prompt_member() -> anyhow::Result<Member> {
    let id: String = Input::new().with_prompt("Member ID").interact_text()?;
    let name: String = Input::new().with_prompt("Name").interact_text()?;
    Ok(Member::new(id, name))
}

fn prompt_loan() -> anyhow::Result<(String, String)> {
    let member: String = Input::new().with_prompt("Member ID").interact_text()?;
    let book: String = Input::new().with_prompt("Book ID").interact_text()?;
    Ok((member, book))
}

fn save_and_exit(library: &Library) {
    println!("{}", outcome(&library.save_state(), "Saved."));
    println!("Exiting...");
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::MenuItem;

    #[test]
    fn menu_lists_every_action_once() {
        let labels: Vec<_> = MenuItem::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(labels.first().map(String::as_str), Some("Add Book"));
        assert_eq!(labels.last().map(String::as_str), Some("Save & Exit"));

        let unique: HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), labels.len());
    }
}
