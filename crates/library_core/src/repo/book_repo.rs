//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Execute `BookQuery` values against the `books` table and its joins.
//! - Provide add/remove/update-year primitives with immediate commit.
//!
//! # Invariants
//! - Row-level rules (non-blank name, known genre/authors/holder) live in
//!   the schema, so every rejected write surfaces as `Conflict`.
//! - `add_book` writes the book row and its author links in one transaction.
//! - Book ids are caller-supplied; a duplicate id is a `Conflict`.

use crate::db::DbError;
use crate::model::book::{Book, BookId};
use crate::query::book_query::BookQuery;
use crate::repo::{ensure_connection_ready, RequiredSchema};
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row, TransactionBehavior};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_SCHEMA: RequiredSchema = &[
    (
        "books",
        &["id", "name", "publish_year", "genre_id", "user_id"],
    ),
    ("book_authors", &["book_id", "author_id"]),
    ("genre_books", &["genre_id", "book_id"]),
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Id-keyed mutation targeted a book the store does not know.
    NotFound(BookId),
    /// Store rejected a write on a uniqueness or reference constraint.
    Conflict(String),
    /// Store is locked, busy or cannot be reached.
    StoreUnavailable(String),
    InvalidData(String),
    /// Connection schema version does not match this binary.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::Conflict(message) => write!(f, "catalog write conflict: {message}"),
            Self::StoreUnavailable(message) => write!(f, "catalog store unavailable: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "catalog repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "catalog repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "catalog repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => Self::Conflict(value.to_string()),
            Some(
                ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::CannotOpen
                | ErrorCode::SystemIoFailure
                | ErrorCode::NotADatabase,
            ) => Self::StoreUnavailable(value.to_string()),
            _ => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Persistence collaborator for book queries and mutations.
pub trait BookRepository {
    /// Gets one book by id; absence is `Ok(None)`.
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Runs a query and materializes the matching books.
    fn list_books(&self, query: &BookQuery) -> RepoResult<Vec<Book>>;
    /// Counts books matching the query's filters.
    fn count_books(&self, query: &BookQuery) -> RepoResult<u64>;
    /// Inserts a book with its author links and commits.
    fn add_book(&mut self, book: &Book) -> RepoResult<BookId>;
    /// Deletes a book (and its join rows) and commits.
    fn remove_book(&mut self, id: BookId) -> RepoResult<()>;
    /// Overwrites only the publish year and commits.
    fn update_publish_year(&mut self, id: BookId, year: Option<i32>) -> RepoResult<()>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, BOOK_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        Ok(self.list_books(&BookQuery::by_id(id))?.into_iter().next())
    }

    fn list_books(&self, query: &BookQuery) -> RepoResult<Vec<Book>> {
        let compiled = query.compile_select();
        let mut stmt = self.conn.prepare(&compiled.sql)?;
        let mut rows = stmt.query(params_from_iter(compiled.params))?;
        let mut books = Vec::new();

        while let Some(row) = rows.next()? {
            let mut book = parse_book_row(row)?;
            book.author_ids = load_author_ids(self.conn, book.id)?;
            books.push(book);
        }

        Ok(books)
    }

    fn count_books(&self, query: &BookQuery) -> RepoResult<u64> {
        let compiled = query.compile_count();
        let count: i64 = self.conn.query_row(
            &compiled.sql,
            params_from_iter(compiled.params),
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative book count `{count}`")))
    }

    fn add_book(&mut self, book: &Book) -> RepoResult<BookId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO books (
                id,
                name,
                publish_year,
                genre_id,
                user_id
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                book.id,
                book.name.as_str(),
                book.publish_year,
                book.genre_id,
                book.user_id,
            ],
        )?;
        for author_id in &book.author_ids {
            tx.execute(
                "INSERT INTO book_authors (book_id, author_id) VALUES (?1, ?2);",
                params![book.id, author_id],
            )?;
        }
        tx.commit()?;

        Ok(book.id)
    }

    fn remove_book(&mut self, id: BookId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM books WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn update_publish_year(&mut self, id: BookId, year: Option<i32>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE books SET publish_year = ?1 WHERE id = ?2;",
            params![year, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let id: BookId = row.get("id")?;
    let publish_year = match row.get::<_, Option<i64>>("publish_year")? {
        Some(value) => Some(i32::try_from(value).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid publish year `{value}` in books.publish_year for book {id}"
            ))
        })?),
        None => None,
    };

    Ok(Book {
        id,
        name: row.get("name")?,
        publish_year,
        genre_id: row.get("genre_id")?,
        author_ids: BTreeSet::new(),
        user_id: row.get("user_id")?,
    })
}

fn load_author_ids(conn: &Connection, book_id: BookId) -> RepoResult<BTreeSet<i64>> {
    let mut stmt = conn.prepare(
        "SELECT author_id
         FROM book_authors
         WHERE book_id = ?1;",
    )?;
    let mut rows = stmt.query([book_id])?;
    let mut author_ids = BTreeSet::new();
    while let Some(row) = rows.next()? {
        author_ids.insert(row.get(0)?);
    }
    Ok(author_ids)
}
