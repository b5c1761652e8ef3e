//! Book filter/order/limit query object and its SQL compilation.

use crate::model::book::BookId;
use crate::model::catalog::{AuthorId, GenreId, UserId};
use rusqlite::types::Value;

const BOOK_COLUMNS_SQL: &str = "SELECT
    books.id,
    books.name,
    books.publish_year,
    books.genre_id,
    books.user_id";

/// One predicate over the books collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFilter {
    IdIs(BookId),
    /// Exact name match using SQLite `BINARY` collation.
    NameIs(String),
    /// Inclusive year range. Books with unknown year never match.
    YearBetween { from: i32, to: i32 },
    /// Direct `books.genre_id` reference.
    GenreIs(GenreId),
    /// Inner join against the `genre_books` association.
    LinkedToGenre(GenreId),
    HasAuthor(AuthorId),
    /// No current holder.
    InLibrary,
    /// Any current holder.
    CheckedOut,
    HeldBy(UserId),
}

/// Result ordering for book queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookOrder {
    /// Storage order; callers must not rely on it.
    #[default]
    Unspecified,
    /// `name ASC` (BINARY collation), then `id ASC`.
    NameAscending,
    /// `publish_year DESC` with unknown years last, then `id ASC`.
    YearDescending,
}

/// Immutable, re-runnable description of a book query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    filters: Vec<BookFilter>,
    order: BookOrder,
    limit: Option<u32>,
}

/// Parameterized SQL produced from a `BookQuery`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BookQuery {
    /// Every book, unfiltered and unordered.
    pub fn all() -> Self {
        Self::default()
    }

    /// At most one book with the given id.
    pub fn by_id(id: BookId) -> Self {
        Self::all().filter(BookFilter::IdIs(id)).limit(1)
    }

    /// Books published in `[year_from, year_to]` that have a `genre_books`
    /// record for `genre_id`. The direct genre column is not consulted.
    pub fn by_genre_years(genre_id: GenreId, year_from: i32, year_to: i32) -> Self {
        Self::all()
            .filter(BookFilter::YearBetween {
                from: year_from,
                to: year_to,
            })
            .filter(BookFilter::LinkedToGenre(genre_id))
    }

    /// In-library books whose direct genre column equals `genre_id`.
    pub fn in_library_by_genre(genre_id: GenreId) -> Self {
        Self::all()
            .filter(BookFilter::GenreIs(genre_id))
            .filter(BookFilter::InLibrary)
    }

    /// In-library books written (at least partly) by `author_id`.
    pub fn in_library_by_author(author_id: AuthorId) -> Self {
        Self::all()
            .filter(BookFilter::HasAuthor(author_id))
            .filter(BookFilter::InLibrary)
    }

    /// Every copy titled `name` written by `author_id`, held or not.
    pub fn by_title_and_author(name: impl Into<String>, author_id: AuthorId) -> Self {
        Self::all()
            .filter(BookFilter::NameIs(name.into()))
            .filter(BookFilter::HasAuthor(author_id))
    }

    /// The given book, only while somebody holds it.
    pub fn held_copies_of(book_id: BookId) -> Self {
        Self::all()
            .filter(BookFilter::IdIs(book_id))
            .filter(BookFilter::CheckedOut)
    }

    /// Books whose current holder is `user_id`.
    pub fn held_by_user(user_id: UserId) -> Self {
        Self::all().filter(BookFilter::HeldBy(user_id))
    }

    /// Newest book first, unknown years last, limited to one row.
    pub fn most_recently_published() -> Self {
        Self::all_by_year_descending().limit(1)
    }

    /// Every book ordered by `BookOrder::NameAscending`.
    pub fn all_by_name_ascending() -> Self {
        Self::all().order_by(BookOrder::NameAscending)
    }

    /// Every book ordered by `BookOrder::YearDescending`.
    pub fn all_by_year_descending() -> Self {
        Self::all().order_by(BookOrder::YearDescending)
    }

    /// Adds one predicate; all predicates must hold.
    pub fn filter(mut self, filter: BookFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Replaces the ordering.
    pub fn order_by(mut self, order: BookOrder) -> Self {
        self.order = order;
        self
    }

    /// Caps the number of returned rows.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Predicates in insertion order.
    pub fn filters(&self) -> &[BookFilter] {
        &self.filters
    }

    /// Current ordering.
    pub fn order(&self) -> BookOrder {
        self.order
    }

    pub(crate) fn compile_select(&self) -> CompiledQuery {
        let (body, mut params) = self.compile_body();
        let mut sql = format!("{BOOK_COLUMNS_SQL} {body}");

        match self.order {
            BookOrder::Unspecified => {}
            BookOrder::NameAscending => {
                sql.push_str(" ORDER BY books.name ASC, books.id ASC");
            }
            BookOrder::YearDescending => sql.push_str(
                " ORDER BY books.publish_year IS NULL ASC, books.publish_year DESC, books.id ASC",
            ),
        }

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            params.push(Value::Integer(i64::from(limit)));
        }

        CompiledQuery { sql, params }
    }

    /// Count ignores ordering and limit.
    pub(crate) fn compile_count(&self) -> CompiledQuery {
        let (body, params) = self.compile_body();
        CompiledQuery {
            sql: format!("SELECT COUNT(*) {body}"),
            params,
        }
    }

    // Join parameters precede WHERE parameters because joins come first in
    // the generated statement.
    fn compile_body(&self) -> (String, Vec<Value>) {
        let mut joins = String::new();
        let mut join_params = Vec::new();
        let mut conditions = String::from(" WHERE 1 = 1");
        let mut where_params = Vec::new();

        for (index, filter) in self.filters.iter().enumerate() {
            match filter {
                BookFilter::IdIs(id) => {
                    conditions.push_str(" AND books.id = ?");
                    where_params.push(Value::Integer(*id));
                }
                BookFilter::NameIs(name) => {
                    conditions.push_str(" AND books.name = ?");
                    where_params.push(Value::Text(name.clone()));
                }
                BookFilter::YearBetween { from, to } => {
                    conditions.push_str(" AND books.publish_year >= ? AND books.publish_year <= ?");
                    where_params.push(Value::Integer(i64::from(*from)));
                    where_params.push(Value::Integer(i64::from(*to)));
                }
                BookFilter::GenreIs(genre_id) => {
                    conditions.push_str(" AND books.genre_id = ?");
                    where_params.push(Value::Integer(*genre_id));
                }
                BookFilter::LinkedToGenre(genre_id) => {
                    let alias = format!("gb{index}");
                    joins.push_str(&format!(
                        " INNER JOIN genre_books {alias} ON {alias}.book_id = books.id AND {alias}.genre_id = ?"
                    ));
                    join_params.push(Value::Integer(*genre_id));
                }
                BookFilter::HasAuthor(author_id) => {
                    conditions.push_str(
                        " AND EXISTS (
                            SELECT 1
                            FROM book_authors ba
                            WHERE ba.book_id = books.id
                              AND ba.author_id = ?
                        )",
                    );
                    where_params.push(Value::Integer(*author_id));
                }
                BookFilter::InLibrary => conditions.push_str(" AND books.user_id IS NULL"),
                BookFilter::CheckedOut => conditions.push_str(" AND books.user_id IS NOT NULL"),
                BookFilter::HeldBy(user_id) => {
                    conditions.push_str(" AND books.user_id = ?");
                    where_params.push(Value::Integer(*user_id));
                }
            }
        }

        join_params.extend(where_params);
        (format!("FROM books{joins}{conditions}"), join_params)
    }
}

#[cfg(test)]
mod tests {
    use super::{BookFilter, BookOrder, BookQuery};
    use rusqlite::types::Value;

    #[test]
    fn all_compiles_without_order_or_limit() {
        let compiled = BookQuery::all().compile_select();
        assert!(compiled.sql.ends_with("FROM books WHERE 1 = 1"));
        assert!(compiled.params.is_empty());
    }

    #[test]
    fn genre_join_params_precede_where_params() {
        let compiled = BookQuery::by_genre_years(7, 1960, 1970).compile_select();

        assert!(compiled.sql.contains("INNER JOIN genre_books gb1"));
        assert!(!compiled.sql.contains("books.genre_id = ?"));
        assert_eq!(
            compiled.params,
            vec![
                Value::Integer(7),
                Value::Integer(1960),
                Value::Integer(1970)
            ]
        );
    }

    #[test]
    fn in_library_by_genre_uses_direct_column() {
        let compiled = BookQuery::in_library_by_genre(3).compile_count();

        assert!(compiled.sql.starts_with("SELECT COUNT(*) FROM books WHERE"));
        assert!(compiled.sql.contains("books.genre_id = ?"));
        assert!(compiled.sql.contains("books.user_id IS NULL"));
        assert!(!compiled.sql.contains("genre_books"));
    }

    #[test]
    fn year_descending_places_unknown_years_last() {
        let compiled = BookQuery::most_recently_published().compile_select();

        assert!(compiled.sql.contains(
            "ORDER BY books.publish_year IS NULL ASC, books.publish_year DESC, books.id ASC"
        ));
        assert_eq!(compiled.params, vec![Value::Integer(1)]);
    }

    #[test]
    fn count_ignores_order_and_limit() {
        let query = BookQuery::all()
            .filter(BookFilter::CheckedOut)
            .order_by(BookOrder::NameAscending)
            .limit(3);
        let compiled = query.compile_count();

        assert!(!compiled.sql.contains("ORDER BY"));
        assert!(!compiled.sql.contains("LIMIT"));
        assert!(compiled.params.is_empty());
    }

    #[test]
    fn queries_are_plain_values() {
        let first = BookQuery::by_title_and_author("Dune", 2);
        let second = first.clone();

        assert_eq!(first, second);
        assert_eq!(first.filters().len(), 2);
        assert_eq!(first.order(), BookOrder::Unspecified);
    }
}
