//! Author/genre/user repository and genre join-table maintenance.
//!
//! # Responsibility
//! - Create and read the reference entities books point at.
//! - Maintain `genre_books` records independently of `books.genre_id`.
//!
//! # Invariants
//! - Reference entity ids are generated by SQLite on insert.
//! - Linking a genre twice is a no-op; unlinking reports whether a row existed.

use crate::model::book::BookId;
use crate::model::catalog::{Author, AuthorId, Genre, GenreId, User, UserId};
use crate::repo::book_repo::RepoResult;
use crate::repo::{ensure_connection_ready, RequiredSchema};
use rusqlite::{params, Connection, OptionalExtension};

const CATALOG_SCHEMA: RequiredSchema = &[
    ("authors", &["id", "name"]),
    ("genres", &["id", "name"]),
    ("users", &["id", "name"]),
    ("genre_books", &["genre_id", "book_id"]),
];

/// Repository interface for catalog reference data.
pub trait CatalogRepository {
    fn create_author(&self, name: &str) -> RepoResult<Author>;
    fn create_genre(&self, name: &str) -> RepoResult<Genre>;
    fn create_user(&self, name: &str) -> RepoResult<User>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn get_genre(&self, id: GenreId) -> RepoResult<Option<Genre>>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Records `book_id` as a member of `genre_id` in the join table.
    fn link_genre(&self, genre_id: GenreId, book_id: BookId) -> RepoResult<()>;
    /// Removes one join record. Returns `false` when none existed.
    fn unlink_genre(&self, genre_id: GenreId, book_id: BookId) -> RepoResult<bool>;
    /// Genre ids linked to `book_id` through the join table, ascending.
    fn linked_genre_ids(&self, book_id: BookId) -> RepoResult<Vec<GenreId>>;
}

/// SQLite-backed catalog repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, CATALOG_SCHEMA)?;
        Ok(Self { conn })
    }

    fn insert_named(&self, table: &str, name: &str) -> RepoResult<i64> {
        self.conn.execute(
            &format!("INSERT INTO {table} (name) VALUES (?1);"),
            [name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_named(&self, table: &str, id: i64) -> RepoResult<Option<(i64, String)>> {
        let found = self
            .conn
            .query_row(
                &format!("SELECT id, name FROM {table} WHERE id = ?1;"),
                [id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(found)
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn create_author(&self, name: &str) -> RepoResult<Author> {
        let id = self.insert_named("authors", name)?;
        Ok(Author {
            id,
            name: name.to_string(),
        })
    }

    fn create_genre(&self, name: &str) -> RepoResult<Genre> {
        let id = self.insert_named("genres", name)?;
        Ok(Genre {
            id,
            name: name.to_string(),
        })
    }

    fn create_user(&self, name: &str) -> RepoResult<User> {
        let id = self.insert_named("users", name)?;
        Ok(User {
            id,
            name: name.to_string(),
        })
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        Ok(self
            .get_named("authors", id)?
            .map(|(id, name)| Author { id, name }))
    }

    fn get_genre(&self, id: GenreId) -> RepoResult<Option<Genre>> {
        Ok(self
            .get_named("genres", id)?
            .map(|(id, name)| Genre { id, name }))
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.get_named("users", id)?.map(|(id, name)| User { id, name }))
    }

    fn link_genre(&self, genre_id: GenreId, book_id: BookId) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO genre_books (genre_id, book_id) VALUES (?1, ?2);",
            params![genre_id, book_id],
        )?;
        Ok(())
    }

    fn unlink_genre(&self, genre_id: GenreId, book_id: BookId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM genre_books WHERE genre_id = ?1 AND book_id = ?2;",
            params![genre_id, book_id],
        )?;
        Ok(changed > 0)
    }

    fn linked_genre_ids(&self, book_id: BookId) -> RepoResult<Vec<GenreId>> {
        let mut stmt = self.conn.prepare(
            "SELECT genre_id
             FROM genre_books
             WHERE book_id = ?1
             ORDER BY genre_id ASC;",
        )?;
        let mut rows = stmt.query([book_id])?;
        let mut genre_ids = Vec::new();
        while let Some(row) = rows.next()? {
            genre_ids.push(row.get(0)?);
        }
        Ok(genre_ids)
    }
}
