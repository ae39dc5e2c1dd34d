//! In-memory book catalog backed by a JSON file
//!
//! Every mutating operation ends by rewriting the file, so after a successful
//! call the list in memory and the list on disk are the same. Ids come from a
//! counter seeded with `max(id) + 1` at open time and are never handed out
//! twice during one process lifetime, even after removals.

use crate::error::{LibraryError, Result};
use crate::store::{CatalogStore, LoadWarning};
use crate::CatalogOptions;
use libraring_core::{eq_ignore_case, BookId, BookRecord, BookStatus};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::Path;

/// Optional filters for [`Catalog::find`], combined with AND
///
/// Title and author must match the whole value, ignoring case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// True when no filter is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.year.is_none()
    }

    pub fn matches(&self, book: &BookRecord) -> bool {
        self.title
            .as_deref()
            .is_none_or(|title| eq_ignore_case(&book.title, title))
            && self
                .author
                .as_deref()
                .is_none_or(|author| eq_ignore_case(&book.author, author))
            && self.year.is_none_or(|year| book.year == year)
    }
}

/// Summary figures for the whole catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub titles: usize,
    pub total_copies: u64,
    pub available_titles: usize,
    pub checked_out_titles: usize,
    pub unique_authors: usize,
}

/// The book collection
pub struct Catalog {
    store: CatalogStore,
    books: Vec<BookRecord>,
    /// `None` once `u64::MAX` has been handed out
    next_id: Option<BookId>,
    save_on_noop: bool,
    load_warning: Option<LoadWarning>,
}

impl Catalog {
    /// Opens the catalog at `options.path`
    ///
    /// A missing file gives an empty catalog. A blank or malformed file also
    /// gives an empty catalog; see [`Catalog::load_warning`]. Records whose
    /// status disagrees with their count are corrected, and records with id 0
    /// or an id seen earlier in the file get fresh ids.
    pub fn open(options: CatalogOptions) -> Result<Self> {
        info!("Opening catalog: {}", options.path.display());

        let store = CatalogStore::new(&options.path).with_backup(options.backup_on_save);
        let snapshot = store.load()?;

        let mut books = snapshot.records;
        for book in &mut books {
            if book.reconcile() {
                warn!(
                    "Book {} had status inconsistent with {} copies, corrected to '{}'",
                    book.id, book.count, book.status
                );
            }
        }

        let next_id = match books.iter().map(|b| b.id).max() {
            Some(max) => max.next(),
            None => Some(BookId::FIRST),
        };

        if let Some(warning) = &snapshot.warning {
            warn!("{}", warning);
        }

        let mut catalog = Self {
            store,
            books,
            next_id,
            save_on_noop: options.save_on_noop,
            load_warning: snapshot.warning,
        };

        let reassigned = catalog.reassign_bad_ids()?;
        if reassigned > 0 {
            catalog.load_warning = Some(LoadWarning::IdsReassigned { count: reassigned });
        }

        Ok(catalog)
    }

    /// Problem found while loading, if any
    pub fn load_warning(&self) -> Option<&LoadWarning> {
        self.load_warning.as_ref()
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Adds a book, or one more copy of a book already in the catalog
    ///
    /// An existing record with the same title, author (both ignoring case) and
    /// year gets `count + 1` and becomes available; otherwise a new record with
    /// a fresh id and one copy is appended. Inputs are expected to be validated.
    pub fn add(&mut self, title: &str, author: &str, year: i32) -> Result<BookRecord> {
        let book = match self.books.iter_mut().find(|b| b.matches(title, author, year)) {
            Some(existing) => {
                existing.return_copy();
                debug!("Added a copy of book {}, now {}", existing.id, existing.count);
                existing.clone()
            }
            None => {
                let id = self.allocate_id()?;
                let book = BookRecord::new(id, title, author, year);
                info!("Added book {}: {}", id, book.title);
                self.books.push(book.clone());
                book
            }
        };

        self.persist()?;
        Ok(book)
    }

    /// Removes the book with `id`
    ///
    /// Returns false if there was no such book.
    pub fn remove(&mut self, id: BookId) -> Result<bool> {
        let Some(index) = self.books.iter().position(|b| b.id == id) else {
            debug!("Remove: no book with id {}", id);
            self.persist_noop()?;
            return Ok(false);
        };

        let removed = self.books.remove(index);
        info!("Removed book {}: {}", removed.id, removed.title);
        self.persist()?;
        Ok(true)
    }

    pub fn find_by_id(&self, id: BookId) -> Option<&BookRecord> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Books matching every filter in `query`, in insertion order
    pub fn find(&self, query: &SearchQuery) -> Vec<&BookRecord> {
        self.books.iter().filter(|b| query.matches(b)).collect()
    }

    /// Checks a copy out or returns one
    ///
    /// `CheckedOut` takes one copy if any are left; `Available` always adds one.
    /// Returns false only when no book has `id`. Checking out a book with no
    /// copies left still returns true and changes nothing; existing callers rely on that.
    pub fn update_status(&mut self, id: BookId, status: BookStatus) -> Result<bool> {
        let Some(book) = self.books.iter_mut().find(|b| b.id == id) else {
            debug!("Status change: no book with id {}", id);
            self.persist_noop()?;
            return Ok(false);
        };

        let changed = match status {
            BookStatus::CheckedOut => book.check_out(),
            BookStatus::Available => {
                book.return_copy();
                true
            }
        };

        if changed {
            info!(
                "Book {} is now '{}' with {} copies",
                book.id, book.status, book.count
            );
            self.persist()?;
        } else {
            debug!("Book {} has no copies left to check out", id);
            self.persist_noop()?;
        }
        Ok(true)
    }

    /// Like [`Catalog::update_status`], parsing the status literal first
    ///
    /// An unknown literal is an error and leaves the catalog untouched.
    pub fn update_status_literal(&mut self, id: BookId, status: &str) -> Result<bool> {
        let status: BookStatus = status.parse()?;
        self.update_status(id, status)
    }

    /// All books in insertion order
    pub fn list(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        let available_titles = self.books.iter().filter(|b| b.is_available()).count();
        let unique_authors = self
            .books
            .iter()
            .map(|b| b.author.to_lowercase())
            .collect::<HashSet<_>>()
            .len();

        CatalogStats {
            titles: self.books.len(),
            total_copies: self.books.iter().map(|b| u64::from(b.count)).sum(),
            available_titles,
            checked_out_titles: self.books.len() - available_titles,
            unique_authors,
        }
    }

    fn allocate_id(&mut self) -> Result<BookId> {
        let id = self.next_id.ok_or_else(|| LibraryError::IdsExhausted {
            last: self.books.iter().map(|b| b.id).max().unwrap_or(BookId::FIRST),
        })?;
        self.next_id = id.next();
        Ok(id)
    }

    /// Gives a fresh id to every record with id 0 or a repeated id
    ///
    /// The first record holding an id keeps it. Returns how many were changed.
    fn reassign_bad_ids(&mut self) -> Result<usize> {
        let mut seen = HashSet::new();
        let bad: Vec<usize> = self
            .books
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.id.is_valid() || !seen.insert(b.id))
            .map(|(index, _)| index)
            .collect();

        for &index in &bad {
            let id = self.allocate_id()?;
            let book = &mut self.books[index];
            warn!(
                "Book '{}' had id {} which is invalid or already taken, now {}",
                book.title, book.id, id
            );
            book.id = id;
        }
        Ok(bad.len())
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.books)
    }

    /// Saves after an operation that changed nothing, if configured to
    fn persist_noop(&self) -> Result<()> {
        if self.save_on_noop {
            self.persist()
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_catalog() -> (TempDir, Catalog) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let options = CatalogOptions::new(temp_dir.path().join("library.json"));
        let catalog = Catalog::open(options).expect("Failed to open catalog");
        (temp_dir, catalog)
    }

    fn seeded() -> (TempDir, Catalog) {
        let (temp, mut catalog) = setup_catalog();
        catalog.add("Book 1", "Author I", 2000).unwrap();
        catalog.add("Book 2", "Author II", 2010).unwrap();
        catalog.add("Book 3", "Author II", 2012).unwrap();
        catalog.add("Book 4", "Author III", 2020).unwrap();
        (temp, catalog)
    }

    fn assert_consistent(catalog: &Catalog) {
        for book in catalog.list() {
            assert_eq!(
                book.count == 0,
                book.status == BookStatus::CheckedOut,
                "inconsistent record: {}",
                book
            );
        }
    }

    #[test]
    fn test_open_empty() {
        let (_temp, catalog) = setup_catalog();
        assert!(catalog.is_empty());
        assert!(catalog.load_warning().is_none());
        assert!(!catalog.path().exists());
    }

    #[test]
    fn test_add_new_book() {
        let (_temp, mut catalog) = setup_catalog();
        let book = catalog.add("Dune", "Frank Herbert", 1965).unwrap();

        assert_eq!(book.id, BookId::new(1));
        assert_eq!(book.count, 1);
        assert_eq!(book.status, BookStatus::Available);
        assert_eq!(catalog.list(), &[book]);
        assert!(catalog.path().exists());
    }

    #[test]
    fn test_add_duplicate_increments_count() {
        let (_temp, mut catalog) = seeded();
        let again = catalog.add("book 4", "AUTHOR III", 2020).unwrap();

        assert_eq!(again.id, BookId::new(4));
        assert_eq!(again.count, 2);
        assert_eq!(again.title, "Book 4");
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_add_partial_match_creates_new_record() {
        let (_temp, mut catalog) = seeded();
        let book = catalog.add("Book", "Author I", 2000).unwrap();
        assert_eq!(book.id, BookId::new(5));

        let book = catalog.add("Book 1", "Author I", 2001).unwrap();
        assert_eq!(book.id, BookId::new(6));
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn test_add_to_exhausted_record_makes_it_available() {
        let (_temp, mut catalog) = setup_catalog();
        let id = catalog.add("Dune", "Frank Herbert", 1965).unwrap().id;
        catalog.update_status(id, BookStatus::CheckedOut).unwrap();

        let book = catalog.add("Dune", "Frank Herbert", 1965).unwrap();
        assert_eq!(book.count, 1);
        assert_eq!(book.status, BookStatus::Available);
    }

    #[test]
    fn test_ids_are_not_reused_after_remove() {
        let (_temp, mut catalog) = seeded();
        assert!(catalog.remove(BookId::new(4)).unwrap());

        let book = catalog.add("Book 5", "Author V", 2021).unwrap();
        assert_eq!(book.id, BookId::new(5));
    }

    #[test]
    fn test_remove() {
        let (_temp, mut catalog) = seeded();
        assert!(catalog.remove(BookId::new(1)).unwrap());
        assert_eq!(catalog.len(), 3);
        assert!(catalog.find_by_id(BookId::new(1)).is_none());

        assert!(!catalog.remove(BookId::new(999)).unwrap());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_find_by_id() {
        let (_temp, catalog) = seeded();
        assert_eq!(catalog.find_by_id(BookId::new(3)).unwrap().title, "Book 3");
        assert!(catalog.find_by_id(BookId::new(42)).is_none());
    }

    #[test]
    fn test_find_by_author() {
        let (_temp, catalog) = seeded();
        let books = catalog.find(&SearchQuery::new().author("Author II"));
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Book 2", "Book 3"]);
    }

    #[test]
    fn test_find_is_whole_value() {
        let (_temp, catalog) = seeded();
        assert!(catalog.find(&SearchQuery::new().title("Book")).is_empty());
        assert_eq!(catalog.find(&SearchQuery::new().title("BOOK 1")).len(), 1);
    }

    #[test]
    fn test_find_by_year() {
        let (_temp, catalog) = seeded();
        let books = catalog.find(&SearchQuery::new().year(2012));
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Book 3");
    }

    #[test]
    fn test_find_all_filters() {
        let (_temp, catalog) = seeded();
        let query = SearchQuery::new().title("Book 3").author("Author II").year(2012);
        let books = catalog.find(&query);
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, BookId::new(3));

        let query = SearchQuery::new().title("Book 3").year(2010);
        assert!(catalog.find(&query).is_empty());
    }

    #[test]
    fn test_find_without_filters_returns_everything() {
        let (_temp, catalog) = seeded();
        let query = SearchQuery::new();
        assert!(query.is_empty());
        let all: Vec<BookRecord> = catalog.find(&query).into_iter().cloned().collect();
        assert_eq!(all, catalog.list());
    }

    #[test]
    fn test_check_out_and_return() {
        let (_temp, mut catalog) = seeded();
        let id = BookId::new(1);

        assert!(catalog.update_status(id, BookStatus::CheckedOut).unwrap());
        let book = catalog.find_by_id(id).unwrap();
        assert_eq!(book.count, 0);
        assert_eq!(book.status, BookStatus::CheckedOut);

        assert!(catalog.update_status(id, BookStatus::Available).unwrap());
        let book = catalog.find_by_id(id).unwrap();
        assert_eq!(book.count, 1);
        assert_eq!(book.status, BookStatus::Available);
        assert_consistent(&catalog);
    }

    #[test]
    fn test_check_out_exhausted_still_reports_success() {
        let (_temp, mut catalog) = seeded();
        let id = BookId::new(2);
        catalog.update_status(id, BookStatus::CheckedOut).unwrap();

        assert!(catalog.update_status(id, BookStatus::CheckedOut).unwrap());
        assert_eq!(catalog.find_by_id(id).unwrap().count, 0);
        assert_consistent(&catalog);
    }

    #[test]
    fn test_return_always_increments() {
        let (_temp, mut catalog) = seeded();
        let id = BookId::new(3);
        for expected in 2..=4 {
            catalog.update_status(id, BookStatus::Available).unwrap();
            assert_eq!(catalog.find_by_id(id).unwrap().count, expected);
        }
    }

    #[test]
    fn test_update_status_unknown_id() {
        let (_temp, mut catalog) = seeded();
        assert!(!catalog
            .update_status(BookId::new(99), BookStatus::CheckedOut)
            .unwrap());
    }

    #[test]
    fn test_update_status_literal() {
        let (_temp, mut catalog) = seeded();
        assert!(catalog.update_status_literal(BookId::new(1), "выдана").unwrap());
        assert_eq!(
            catalog.find_by_id(BookId::new(1)).unwrap().status,
            BookStatus::CheckedOut
        );

        let err = catalog
            .update_status_literal(BookId::new(2), "lost")
            .unwrap_err();
        assert!(err.is_user_error());
        assert_eq!(catalog.find_by_id(BookId::new(2)).unwrap().count, 1);
    }

    #[test]
    fn test_stats() {
        let (_temp, mut catalog) = seeded();
        catalog.add("Book 1", "author i", 2000).unwrap();
        catalog
            .update_status(BookId::new(2), BookStatus::CheckedOut)
            .unwrap();

        let stats = catalog.stats();
        assert_eq!(
            stats,
            CatalogStats {
                titles: 4,
                total_copies: 4,
                available_titles: 3,
                checked_out_titles: 1,
                unique_authors: 3,
            }
        );
    }

    #[test]
    fn test_invariant_holds_across_operations() {
        let (_temp, mut catalog) = seeded();
        let ops = [
            (1, BookStatus::CheckedOut),
            (1, BookStatus::CheckedOut),
            (2, BookStatus::Available),
            (2, BookStatus::CheckedOut),
            (2, BookStatus::CheckedOut),
            (3, BookStatus::Available),
            (1, BookStatus::Available),
        ];
        for (id, status) in ops {
            catalog.update_status(BookId::new(id), status).unwrap();
            assert_consistent(&catalog);
        }
    }
}
