//! Composable book queries.
//!
//! # Responsibility
//! - Describe catalog questions as plain data (`BookQuery`) instead of
//!   deferred store-specific expressions.
//! - Compile queries to parameterized SQL for the SQLite repository.
//!
//! # Invariants
//! - A `BookQuery` holds no connection or cursor; executing it twice re-reads
//!   committed state both times.
//! - Ordered queries always add `books.id ASC` as final tie-breaker, so
//!   repeated runs over unchanged data return the same order.

pub mod book_query;
