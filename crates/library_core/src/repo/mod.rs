//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define the persistence collaborator contracts used by the book service.
//! - Isolate SQLite statements from query/business orchestration.
//!
//! # Invariants
//! - Every mutating call is its own unit of work and commits before returning.
//! - Repositories refuse connections that are not fully migrated.
//! - Constraint violations surface as `RepoError::Conflict`, lock and IO
//!   failures as `RepoError::StoreUnavailable`.

use crate::db::migrations::latest_version;
use rusqlite::Connection;

pub mod book_repo;
pub mod catalog_repo;

use book_repo::{RepoError, RepoResult};

/// Required `(table, columns)` pairs checked by a repository constructor.
pub(crate) type RequiredSchema = &'static [(&'static str, &'static [&'static str])];

pub(crate) fn ensure_connection_ready(conn: &Connection, required: RequiredSchema) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in required {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
