//! Catalog reference entities: authors, genres and users.

use serde::{Deserialize, Serialize};

pub type AuthorId = i64;
pub type GenreId = i64;
pub type UserId = i64;

/// Book author. Linked to books through a many-to-many association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
}

/// Book genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// Library member who may hold checked-out books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}
