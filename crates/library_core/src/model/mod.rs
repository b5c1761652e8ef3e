//! Library catalog domain model.
//!
//! # Responsibility
//! - Define the book/author/genre/user records shared by repo and service.
//! - Keep holder state explicit so in-library checks are plain `Option` tests.
//!
//! # Invariants
//! - Every entity is identified by a store-level integer id.
//! - A book is in the library exactly when it has no holder.

pub mod book;
pub mod catalog;
