//! Book query/business-rule service.
//!
//! # Responsibility
//! - Translate library questions ("is this title available?", "how many
//!   books of this genre are on the shelves?") into `BookQuery` values.
//! - Perform the supported mutations: add, remove and year update.
//!
//! # Invariants
//! - A book is in the library exactly when `user_id` is `None`.
//! - Absence is data (`None`, empty `Vec`, `Availability::Unknown`); only
//!   id-keyed mutations report `RepoError::NotFound`.
//! - Genre range queries read the `genre_books` join table while in-library
//!   genre counts read `books.genre_id`. The two can disagree and are
//!   deliberately not reconciled here.
//! - No caching, locking or versioning: concurrent writers to the same book
//!   are unsupported and the last committed write wins.

use crate::model::book::{Book, BookId};
use crate::model::catalog::{Author, Genre, User};
use crate::query::book_query::{BookFilter, BookQuery};
use crate::repo::book_repo::{BookRepository, RepoError, RepoResult};
use log::{info, warn};

/// Tri-state answer of `availability_by_author_and_title`.
///
/// The boolean polarity mirrors the catalog's historic contract: the flag
/// reads `false` while any matching copy sits in the library and `true` once
/// every matching copy is checked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// No book with that title by that author exists.
    Unknown,
    /// At least one matching copy is in the library. Flag: `false`.
    Unavailable,
    /// Every matching copy is checked out. Flag: `true`.
    Available,
}

impl Availability {
    /// Returns the nullable flag form: `None`, `Some(false)` or `Some(true)`.
    pub fn as_flag(self) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::Unavailable => Some(false),
            Self::Available => Some(true),
        }
    }
}

/// Query/mutation facade over a book repository.
pub struct BookQueryService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookQueryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Gets one book by id; a missing id is `Ok(None)`.
    pub fn find_by_id(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.repo.get_book(id)
    }

    /// Every book in storage order.
    pub fn list_all(&self) -> RepoResult<Vec<Book>> {
        self.run(&BookQuery::all())
    }

    /// Runs any query against current committed state.
    pub fn run(&self, query: &BookQuery) -> RepoResult<Vec<Book>> {
        self.repo.list_books(query)
    }

    /// Deletes `book` and commits. Fails with `NotFound` when the store does
    /// not know its id.
    pub fn remove(&mut self, book: &Book) -> RepoResult<()> {
        match self.repo.remove_book(book.id) {
            Ok(()) => {
                info!(
                    "event=book_remove module=service status=ok book_id={}",
                    book.id
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=book_remove module=service status=error book_id={} error={}",
                    book.id, err
                );
                Err(err)
            }
        }
    }

    /// Inserts `book` with its caller-supplied id and commits.
    ///
    /// A duplicate id or a dangling genre/author/user reference surfaces as
    /// `RepoError::Conflict`.
    pub fn add(&mut self, book: &Book) -> RepoResult<BookId> {
        match self.repo.add_book(book) {
            Ok(id) => {
                info!(
                    "event=book_add module=service status=ok book_id={} author_count={}",
                    id,
                    book.author_ids.len()
                );
                Ok(id)
            }
            Err(err) => {
                warn!(
                    "event=book_add module=service status=error book_id={} error={}",
                    book.id, err
                );
                Err(err)
            }
        }
    }

    /// Looks the book up and overwrites its publish year.
    ///
    /// Read-modify-write without a version check; a missing id fails with
    /// `NotFound` before anything is written.
    pub fn update_year_by_id(&mut self, id: BookId, year: i32) -> RepoResult<()> {
        let Some(book) = self.find_by_id(id)? else {
            warn!("event=book_update_year module=service status=not_found book_id={id}");
            return Err(RepoError::NotFound(id));
        };

        self.repo.update_publish_year(book.id, Some(year))?;
        info!(
            "event=book_update_year module=service status=ok book_id={} year={}",
            book.id, year
        );
        Ok(())
    }

    /// Books published in `[year_from, year_to]` that carry a genre join
    /// record for `genre`. A book whose direct genre matches but has no join
    /// record is excluded.
    pub fn books_by_genre_years(
        &self,
        genre: &Genre,
        year_from: i32,
        year_to: i32,
    ) -> RepoResult<Vec<Book>> {
        self.run(&BookQuery::by_genre_years(genre.id, year_from, year_to))
    }

    /// In-library books whose direct genre reference is `genre`.
    pub fn count_in_library_by_genre(&self, genre: &Genre) -> RepoResult<u64> {
        self.repo
            .count_books(&BookQuery::in_library_by_genre(genre.id))
    }

    /// In-library books that list `author` among their authors.
    pub fn count_in_library_by_author(&self, author: &Author) -> RepoResult<u64> {
        self.repo
            .count_books(&BookQuery::in_library_by_author(author.id))
    }

    /// Reports whether copies titled like `book` and written by `author` are
    /// all checked out. See [`Availability`] for the flag polarity.
    pub fn availability_by_author_and_title(
        &self,
        author: &Author,
        book: &Book,
    ) -> RepoResult<Availability> {
        let matching = BookQuery::by_title_and_author(book.name.as_str(), author.id);
        if self.repo.count_books(&matching)? == 0 {
            return Ok(Availability::Unknown);
        }

        let on_shelf = matching.filter(BookFilter::InLibrary);
        if self.repo.count_books(&on_shelf)? > 0 {
            Ok(Availability::Unavailable)
        } else {
            Ok(Availability::Available)
        }
    }

    /// `book` itself, only while somebody holds it.
    pub fn books_currently_held(&self, book: &Book) -> RepoResult<Vec<Book>> {
        self.run(&BookQuery::held_copies_of(book.id))
    }

    /// Books currently checked out by `user`.
    pub fn count_held_by_user(&self, user: &User) -> RepoResult<u64> {
        self.repo.count_books(&BookQuery::held_by_user(user.id))
    }

    /// Book with the greatest publish year; unknown years rank last and ties
    /// go to the lowest id. `None` only for an empty catalog.
    pub fn most_recently_published(&self) -> RepoResult<Option<Book>> {
        Ok(self
            .run(&BookQuery::most_recently_published())?
            .into_iter()
            .next())
    }

    /// All books by name (BINARY collation), ties by id.
    pub fn list_all_by_name_ascending(&self) -> RepoResult<Vec<Book>> {
        self.run(&BookQuery::all_by_name_ascending())
    }

    /// All books by publish year descending, unknown years last.
    pub fn list_all_by_year_descending(&self) -> RepoResult<Vec<Book>> {
        self.run(&BookQuery::all_by_year_descending())
    }
}
