//! Book domain model.
//!
//! # Responsibility
//! - Define the canonical book record used by queries and mutations.
//! - Provide builder helpers for constructing fixtures and imports.
//!
//! # Invariants
//! - `id` is supplied by the caller and never regenerated by the store.
//! - `user_id == None` is the only definition of "in library".
//! - `genre_id` is the direct genre reference. Genre join-table membership is
//!   stored separately and is not kept in sync with this field.

use crate::model::catalog::{AuthorId, GenreId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Store-level book identifier.
pub type BookId = i64;

/// Canonical book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    /// `None` when the publication year is unknown.
    pub publish_year: Option<i32>,
    /// Direct genre reference.
    pub genre_id: GenreId,
    /// Author set; membership carries no ordering.
    pub author_ids: BTreeSet<AuthorId>,
    /// Current holder. `None` means the book sits in the library.
    pub user_id: Option<UserId>,
}

impl Book {
    /// Creates an in-library book with unknown year and no authors.
    pub fn new(id: BookId, name: impl Into<String>, genre_id: GenreId) -> Self {
        Self {
            id,
            name: name.into(),
            publish_year: None,
            genre_id,
            author_ids: BTreeSet::new(),
            user_id: None,
        }
    }

    /// Sets a known publication year.
    pub fn with_year(mut self, year: i32) -> Self {
        self.publish_year = Some(year);
        self
    }

    /// Adds one author; repeated ids collapse into the set.
    pub fn with_author(mut self, author_id: AuthorId) -> Self {
        self.author_ids.insert(author_id);
        self
    }

    /// Marks the book as checked out by `user_id`.
    pub fn held_by(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Returns whether nobody currently holds this book.
    pub fn is_in_library(&self) -> bool {
        self.user_id.is_none()
    }

    /// Returns whether `author_id` is one of this book's authors.
    pub fn has_author(&self, author_id: AuthorId) -> bool {
        self.author_ids.contains(&author_id)
    }
}
