// FILE: crates/cli/src/shell.rs
//! Interactive menu over a catalog
//!
//! Reads commands line by line. Errors from a single action are printed and
//! the session continues; end of input ends the session.

use crate::commands::{
    print_added, print_books, print_removed, print_search_results, print_status_result,
};
use anyhow::Result;
use console::style;
use libraring_core::{validation, BookStatus};
use libraring_library::{Catalog, SearchQuery};
use std::io::{BufRead, Write};

/// What the loop does after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Search criteria offered by the find action, keyed by menu number
const CRITERIA: [(&str, &str); 3] = [("1", "title"), ("2", "author"), ("3", "year")];

pub struct Shell<'a, R, W> {
    catalog: &'a mut Catalog,
    input: R,
    output: W,
    banner: String,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(catalog: &'a mut Catalog, input: R, output: W) -> Self {
        Self {
            catalog,
            input,
            output,
            banner: String::new(),
        }
    }

    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = banner.into();
        self
    }

    /// Runs until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        if !self.banner.is_empty() {
            writeln!(self.output, "{}", style(&self.banner).bold().cyan())?;
        }

        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("Enter command number: ")? else {
                break;
            };

            let outcome = match choice.as_str() {
                "1" => self.add_book(),
                "2" => self.remove_book(),
                "3" => self.find_books(),
                "4" => self.list_books(),
                "5" => self.change_status(),
                "6" => {
                    writeln!(self.output, "Goodbye!")?;
                    Ok(Flow::Exit)
                }
                _ => {
                    writeln!(self.output, "Unknown command. Try again.")?;
                    Ok(Flow::Continue)
                }
            };

            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) => {
                    log::error!("Action failed: {:#}", e);
                    writeln!(self.output, "{} {:#}", style("Error:").red().bold(), e)?;
                }
            }
        }

        self.output.flush()?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\nChoose an action:")?;
        writeln!(self.output, "1. Add a book")?;
        writeln!(self.output, "2. Remove a book")?;
        writeln!(self.output, "3. Find books")?;
        writeln!(self.output, "4. Show all books")?;
        writeln!(self.output, "5. Change book status")?;
        writeln!(self.output, "6. Exit")?;
        Ok(())
    }

    fn add_book(&mut self) -> Result<Flow> {
        let Some(title) = self.prompt_valid("Title: ", validation::validate_title)? else {
            return Ok(Flow::Exit);
        };
        let Some(author) = self.prompt_valid("Author: ", validation::validate_author)? else {
            return Ok(Flow::Exit);
        };
        let Some(year) = self.prompt_valid("Year: ", validation::validate_year)? else {
            return Ok(Flow::Exit);
        };

        let book = self.catalog.add(&title, &author, year)?;
        print_added(&book, &mut self.output)?;
        Ok(Flow::Continue)
    }

    fn remove_book(&mut self) -> Result<Flow> {
        let Some(id) = self.prompt_valid("ID of the book to remove: ", validation::validate_id)?
        else {
            return Ok(Flow::Exit);
        };

        let removed = self.catalog.remove(id)?;
        print_removed(id, removed, &mut self.output)?;
        Ok(Flow::Continue)
    }

    fn find_books(&mut self) -> Result<Flow> {
        writeln!(
            self.output,
            "\nSearch by (several numbers may be given, separated by spaces):"
        )?;
        for (key, label) in CRITERIA {
            writeln!(self.output, "{}. {}", key, label)?;
        }

        let Some(line) = self.prompt("Criteria: ")? else {
            return Ok(Flow::Exit);
        };

        let mut query = SearchQuery::new();
        let mut seen = Vec::new();
        for choice in line.split_whitespace() {
            if seen.contains(&choice) {
                continue;
            }
            seen.push(choice);

            let value = match choice {
                "1" => self.prompt_valid("Title: ", validation::validate_title)?.map(|t| query.title = Some(t)),
                "2" => self.prompt_valid("Author: ", validation::validate_author)?.map(|a| query.author = Some(a)),
                "3" => self.prompt_valid("Year: ", validation::validate_year)?.map(|y| query.year = Some(y)),
                other => {
                    writeln!(self.output, "Ignoring unknown criterion '{}'.", other)?;
                    Some(())
                }
            };
            if value.is_none() {
                return Ok(Flow::Exit);
            }
        }

        if query.is_empty() {
            writeln!(self.output, "No criteria selected, showing every book.")?;
        }

        let results = self.catalog.find(&query);
        print_search_results(&results, &mut self.output)?;
        Ok(Flow::Continue)
    }

    fn list_books(&mut self) -> Result<Flow> {
        writeln!(self.output, "\nAll books:")?;
        if self.catalog.is_empty() {
            writeln!(self.output, "The library is empty.")?;
        } else {
            print_books(self.catalog.list().iter(), &mut self.output)?;
        }
        Ok(Flow::Continue)
    }

    fn change_status(&mut self) -> Result<Flow> {
        let Some(id) = self.prompt_valid("Book ID: ", validation::validate_id)? else {
            return Ok(Flow::Exit);
        };

        let Some(current) = self.catalog.find_by_id(id).map(|b| b.status) else {
            writeln!(self.output, "Book with ID {} not found.", id)?;
            return Ok(Flow::Continue);
        };

        // Only the status the book is not in right now is offered
        let offered = current.opposite();
        let Some(answer) = self.prompt(&format!("New status ['{}']: ", offered))? else {
            return Ok(Flow::Exit);
        };

        match answer.parse::<BookStatus>() {
            Ok(status) if status == offered => {
                let found = self.catalog.update_status(id, status)?;
                print_status_result(self.catalog, id, found, &mut self.output)?;
            }
            _ => {
                writeln!(
                    self.output,
                    "Invalid status. Allowed value: '{}'.",
                    offered
                )?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Reads one trimmed line; `None` at end of input
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompts until `validate` accepts the answer; `None` at end of input
    fn prompt_valid<T>(
        &mut self,
        text: &str,
        validate: impl Fn(&str) -> libraring_core::Result<T>,
    ) -> Result<Option<T>> {
        loop {
            let Some(answer) = self.prompt(text)? else {
                return Ok(None);
            };
            match validate(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "Error: {} Try again.", e.user_message())?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libraring_core::BookId;
    use libraring_library::CatalogOptions;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn setup_catalog() -> (Catalog, TempDir) {
        console::set_colors_enabled(false);
        let temp_dir = TempDir::new().unwrap();
        let catalog =
            Catalog::open(CatalogOptions::new(temp_dir.path().join("library.json"))).unwrap();
        (catalog, temp_dir)
    }

    fn run_session(catalog: &mut Catalog, input: &str) -> String {
        let mut output = Vec::new();
        Shell::new(catalog, Cursor::new(input.as_bytes()), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_add_list_and_exit() {
        let (mut catalog, _temp) = setup_catalog();

        let output = run_session(&mut catalog, "1\nDune\nFrank Herbert\n1965\n4\n6\n");

        assert!(output.contains("Book added: Dune (ID: 1)"));
        assert!(output.contains("ID: 1 | Dune | Frank Herbert | 1965 | available | copies: 1"));
        assert!(output.contains("Goodbye!"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let (mut catalog, _temp) = setup_catalog();

        let output = run_session(&mut catalog, "4\n");

        assert!(output.contains("The library is empty."));
        assert!(!output.contains("Goodbye!"));
    }

    #[test]
    fn test_end_of_input_mid_prompt() {
        let (mut catalog, _temp) = setup_catalog();

        run_session(&mut catalog, "1\nDune\n");

        assert!(catalog.is_empty());
    }

    #[test]
    fn test_invalid_answers_are_asked_again() {
        let (mut catalog, _temp) = setup_catalog();

        let output = run_session(
            &mut catalog,
            "1\n\nDune\nFrank Herbert 2\nFrank Herbert\nsoon\n99999\n1965\n6\n",
        );

        assert_eq!(output.matches("Try again.").count(), 4);
        let book = catalog.find_by_id(BookId::new(1)).unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.year, 1965);
    }

    #[test]
    fn test_unknown_command() {
        let (mut catalog, _temp) = setup_catalog();

        let output = run_session(&mut catalog, "9\n6\n");

        assert!(output.contains("Unknown command. Try again."));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn test_remove() {
        let (mut catalog, _temp) = setup_catalog();
        catalog.add("Dune", "Frank Herbert", 1965).unwrap();

        let output = run_session(&mut catalog, "2\n1\n2\n1\n6\n");

        assert!(output.contains("Book with ID 1 removed."));
        assert!(output.contains("Book with ID 1 not found."));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_find_with_several_criteria() {
        let (mut catalog, _temp) = setup_catalog();
        catalog.add("Emma", "Jane Austen", 1815).unwrap();
        catalog.add("Persuasion", "Jane Austen", 1817).unwrap();
        catalog.add("Emma", "Someone Else", 1815).unwrap();

        let output = run_session(&mut catalog, "3\n1 2\nEMMA\njane austen\n6\n");

        assert!(output.contains("1 Books found"));
        assert!(output.contains("ID: 1 | Emma | Jane Austen"));
        assert!(!output.contains("Someone Else"));
    }

    #[test]
    fn test_find_without_criteria_shows_all() {
        let (mut catalog, _temp) = setup_catalog();
        catalog.add("Emma", "Jane Austen", 1815).unwrap();
        catalog.add("Dune", "Frank Herbert", 1965).unwrap();

        let output = run_session(&mut catalog, "3\n\n6\n");

        assert!(output.contains("No criteria selected"));
        assert!(output.contains("2 Books found"));
    }

    #[test]
    fn test_change_status_offers_only_other_status() {
        let (mut catalog, _temp) = setup_catalog();
        catalog.add("Dune", "Frank Herbert", 1965).unwrap();

        let output = run_session(&mut catalog, "5\n1\navailable\n5\n1\nвыдана\n6\n");

        assert!(output.contains("New status ['checked out']"));
        assert!(output.contains("Invalid status. Allowed value: 'checked out'."));
        assert!(output.contains("Book with ID 1 is now checked out (0 copies on shelf)."));

        let book = catalog.find_by_id(BookId::new(1)).unwrap();
        assert_eq!(book.status, BookStatus::CheckedOut);
        assert_eq!(book.count, 0);
    }

    #[test]
    fn test_change_status_unknown_book() {
        let (mut catalog, _temp) = setup_catalog();

        let output = run_session(&mut catalog, "5\n3\n6\n");

        assert!(output.contains("Book with ID 3 not found."));
    }

    #[test]
    fn test_failed_save_keeps_session_alive() {
        console::set_colors_enabled(false);
        let temp_dir = TempDir::new().unwrap();
        let blocked = temp_dir.path().join("shelf");
        let mut catalog =
            Catalog::open(CatalogOptions::new(blocked.join("library.json"))).unwrap();
        std::fs::write(&blocked, "not a directory").unwrap();

        let output = run_session(&mut catalog, "1\nDune\nFrank Herbert\n1965\n6\n");

        assert!(output.contains("Error:"));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn test_banner_printed_once() {
        let (mut catalog, _temp) = setup_catalog();
        let mut output = Vec::new();

        Shell::new(&mut catalog, Cursor::new("6\n".as_bytes()), &mut output)
            .with_banner("Home library")
            .run()
            .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.matches("Home library").count(), 1);
    }
}
