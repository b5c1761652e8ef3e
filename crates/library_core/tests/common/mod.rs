#![allow(dead_code)]

use library_core::db::open_db_in_memory;
use library_core::{
    Author, Book, BookQueryService, CatalogRepository, Genre, SqliteBookRepository,
    SqliteCatalogRepository, User,
};
use rusqlite::Connection;

pub struct Catalog {
    pub conn: Connection,
    pub sci_fi: Genre,
    pub fantasy: Genre,
    pub herbert: Author,
    pub tolkien: Author,
    pub alice: User,
    pub bob: User,
}

pub fn catalog() -> Catalog {
    let conn = open_db_in_memory().unwrap();
    let (sci_fi, fantasy, herbert, tolkien, alice, bob) = {
        let repo = SqliteCatalogRepository::try_new(&conn).unwrap();
        (
            repo.create_genre("Sci-Fi").unwrap(),
            repo.create_genre("Fantasy").unwrap(),
            repo.create_author("Frank Herbert").unwrap(),
            repo.create_author("J. R. R. Tolkien").unwrap(),
            repo.create_user("Alice").unwrap(),
            repo.create_user("Bob").unwrap(),
        )
    };

    Catalog {
        conn,
        sci_fi,
        fantasy,
        herbert,
        tolkien,
        alice,
        bob,
    }
}

pub fn service(conn: &mut Connection) -> BookQueryService<SqliteBookRepository<'_>> {
    BookQueryService::new(SqliteBookRepository::try_new(conn).unwrap())
}

pub fn add_books(conn: &mut Connection, books: &[Book]) {
    let mut service = service(conn);
    for book in books {
        service.add(book).unwrap();
    }
}

pub fn link_genre(conn: &Connection, genre: &Genre, book: &Book) {
    SqliteCatalogRepository::try_new(conn)
        .unwrap()
        .link_genre(genre.id, book.id)
        .unwrap();
}

pub fn ids(books: &[Book]) -> Vec<i64> {
    books.iter().map(|book| book.id).collect()
}
