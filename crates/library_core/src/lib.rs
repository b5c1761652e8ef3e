//! Core data-access layer for the library catalog.
//! Answers availability, count and ordering questions over books and
//! performs the supported book mutations.
//!
//! Sequence results are materialized into a `Vec` on every call; nothing
//! keeps a cursor open between calls. Laziness lives in `BookQuery`: the same
//! query value can be run again and re-reads committed state each time.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::book::{Book, BookId};
pub use model::catalog::{Author, AuthorId, Genre, GenreId, User, UserId};
pub use query::book_query::{BookFilter, BookOrder, BookQuery};
pub use repo::book_repo::{BookRepository, RepoError, RepoResult, SqliteBookRepository};
pub use repo::catalog_repo::{CatalogRepository, SqliteCatalogRepository};
pub use service::book_service::{Availability, BookQueryService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
