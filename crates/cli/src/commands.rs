// FILE: crates/cli/src/commands.rs

use anyhow::{Context, Result};
use clap::ArgMatches;
use console::style;
use libraring_config::{Config, ConfigManager, SETTING_KEYS};
use libraring_core::{validation, BookId, BookRecord, BookStatus};
use libraring_library::{Catalog, SearchQuery};
use std::io::Write;

/// List all books in the catalog
pub fn list_books(catalog: &Catalog, out: &mut impl Write) -> Result<()> {
    if catalog.is_empty() {
        writeln!(out, "The library is empty. Use 'add' to catalog a book.")?;
        return Ok(());
    }

    writeln!(out, "\n{} Books in Library", style(catalog.len()).bold().cyan())?;
    writeln!(out, "{}", "=".repeat(80))?;
    print_books(catalog.list().iter(), out)
}

/// Add a book, or another copy of one already cataloged
pub fn add_book(catalog: &mut Catalog, matches: &ArgMatches, out: &mut impl Write) -> Result<()> {
    let title = validation::validate_title(required(matches, "title")?)?;
    let author = validation::validate_author(required(matches, "author")?)?;
    let year = validation::validate_year(required(matches, "year")?)?;

    let book = catalog
        .add(&title, &author, year)
        .context("Failed to add book")?;
    print_added(&book, out)
}

/// Remove a book by id
pub fn remove_book(catalog: &mut Catalog, matches: &ArgMatches, out: &mut impl Write) -> Result<()> {
    let id = validation::validate_id(required(matches, "id")?)?;
    print_removed(id, catalog.remove(id).context("Failed to remove book")?, out)
}

/// Search by title, author and/or year
pub fn find_books(catalog: &Catalog, matches: &ArgMatches, out: &mut impl Write) -> Result<()> {
    let mut query = SearchQuery::new();
    if let Some(title) = matches.get_one::<String>("title") {
        query = query.title(validation::validate_title(title)?);
    }
    if let Some(author) = matches.get_one::<String>("author") {
        query = query.author(validation::validate_author(author)?);
    }
    if let Some(year) = matches.get_one::<String>("year") {
        query = query.year(validation::validate_year(year)?);
    }

    print_search_results(&catalog.find(&query), out)
}

/// Check out or return a copy
pub fn change_status(catalog: &mut Catalog, matches: &ArgMatches, out: &mut impl Write) -> Result<()> {
    let id = validation::validate_id(required(matches, "id")?)?;
    let status: BookStatus = required(matches, "status")?.parse()?;

    let found = catalog
        .update_status(id, status)
        .context("Failed to update book status")?;
    print_status_result(catalog, id, found, out)
}

/// Show catalog statistics
pub fn show_stats(catalog: &Catalog, out: &mut impl Write) -> Result<()> {
    let stats = catalog.stats();

    writeln!(out, "\n{}", style("Library Statistics").bold().cyan())?;
    writeln!(out, "{}", "=".repeat(80))?;
    writeln!(out, "Catalog file: {}", catalog.path().display())?;
    writeln!(out, "Titles: {}", style(stats.titles).bold())?;
    writeln!(out, "Copies on shelf: {}", style(stats.total_copies).bold())?;
    writeln!(out, "Available titles: {}", stats.available_titles)?;
    writeln!(out, "Checked out titles: {}", stats.checked_out_titles)?;
    writeln!(out, "Authors: {}", stats.unique_authors)?;
    Ok(())
}

/// Write a default config file unless one exists
pub fn init_config(manager: &ConfigManager, out: &mut impl Write) -> Result<()> {
    let path = manager.config_path().display();
    if manager.initialize().context("Failed to write default config")? {
        writeln!(out, "{} Config file created at {}", style("✓").green().bold(), path)?;
    } else {
        writeln!(out, "Config file already exists at {}", path)?;
    }
    Ok(())
}

/// `config show` and `config set`
pub fn config(
    manager: &ConfigManager,
    effective: &Config,
    matches: &ArgMatches,
    out: &mut impl Write,
) -> Result<()> {
    match matches.subcommand() {
        Some(("set", sub_matches)) => {
            let key = required(sub_matches, "key")?;
            let value = required(sub_matches, "value")?;
            let saved = manager
                .set(key, value)
                .with_context(|| format!("Failed to set {}", key))?;
            writeln!(
                out,
                "{} {} = {}",
                style("✓").green().bold(),
                key,
                saved.get(key)?
            )?;
            Ok(())
        }
        _ => show_config(manager, effective, out),
    }
}

fn show_config(manager: &ConfigManager, effective: &Config, out: &mut impl Write) -> Result<()> {
    let path = manager.config_path();
    let origin = if path.exists() { "" } else { " (not created, defaults)" };
    writeln!(out, "Config file: {}{}", path.display(), origin)?;
    for key in SETTING_KEYS {
        writeln!(out, "{} = {}", style(key).bold(), effective.get(key)?)?;
    }
    Ok(())
}

pub(crate) fn print_added(book: &BookRecord, out: &mut impl Write) -> Result<()> {
    if book.count > 1 {
        writeln!(
            out,
            "{} Another copy of '{}' added (ID: {}, copies: {})",
            style("✓").green().bold(),
            book.title,
            book.id,
            book.count
        )?;
    } else {
        writeln!(
            out,
            "{} Book added: {} (ID: {})",
            style("✓").green().bold(),
            book.title,
            book.id
        )?;
    }
    Ok(())
}

pub(crate) fn print_removed(id: BookId, removed: bool, out: &mut impl Write) -> Result<()> {
    if removed {
        writeln!(out, "{} Book with ID {} removed.", style("✓").green().bold(), id)?;
    } else {
        writeln!(out, "Book with ID {} not found.", id)?;
    }
    Ok(())
}

pub(crate) fn print_search_results(books: &[&BookRecord], out: &mut impl Write) -> Result<()> {
    if books.is_empty() {
        writeln!(out, "No books found.")?;
        return Ok(());
    }

    writeln!(out, "\n{} Books found", style(books.len()).bold().cyan())?;
    print_books(books.iter().copied(), out)
}

pub(crate) fn print_status_result(
    catalog: &Catalog,
    id: BookId,
    found: bool,
    out: &mut impl Write,
) -> Result<()> {
    match catalog.find_by_id(id).filter(|_| found) {
        Some(book) => writeln!(
            out,
            "{} Book with ID {} is now {} ({} copies on shelf).",
            style("✓").green().bold(),
            id,
            book.status,
            book.count
        )?,
        None => writeln!(out, "Book with ID {} not found.", id)?,
    }
    Ok(())
}

pub(crate) fn print_books<'a>(
    books: impl Iterator<Item = &'a BookRecord>,
    out: &mut impl Write,
) -> Result<()> {
    for book in books {
        let status = if book.is_available() {
            style(book.status.to_string()).green()
        } else {
            style(book.status.to_string()).yellow()
        };
        writeln!(
            out,
            "ID: {} | {} | {} | {} | {} | copies: {}",
            book.id,
            style(&book.title).bold(),
            book.author,
            book.year,
            status,
            book.count
        )?;
    }
    Ok(())
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow::anyhow!("Argument '{}' is required", name))
}
