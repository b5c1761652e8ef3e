mod common;

use common::{add_books, catalog, ids, link_genre, service};
use library_core::{Availability, Book, BookFilter, BookQuery};

#[test]
fn dune_walkthrough() {
    let mut fx = catalog();
    let dune = Book::new(1, "Dune", fx.sci_fi.id)
        .with_year(1965)
        .with_author(fx.herbert.id);
    let messiah = Book::new(2, "Dune Messiah", fx.sci_fi.id)
        .with_year(1969)
        .with_author(fx.herbert.id)
        .held_by(fx.alice.id);
    add_books(&mut fx.conn, &[dune.clone(), messiah.clone()]);
    link_genre(&fx.conn, &fx.sci_fi, &dune);
    link_genre(&fx.conn, &fx.sci_fi, &messiah);

    let service = service(&mut fx.conn);

    let mut in_range = ids(&service.books_by_genre_years(&fx.sci_fi, 1960, 1970).unwrap());
    in_range.sort_unstable();
    assert_eq!(in_range, vec![1, 2]);
    assert_eq!(service.count_in_library_by_genre(&fx.sci_fi).unwrap(), 1);
    assert_eq!(service.most_recently_published().unwrap().unwrap().id, 2);

    let availability = service
        .availability_by_author_and_title(&fx.herbert, &dune)
        .unwrap();
    assert_eq!(availability, Availability::Unavailable);
    assert_eq!(availability.as_flag(), Some(false));
}

#[test]
fn count_in_library_by_genre_matches_manual_count_over_mixed_ownership() {
    let mut fx = catalog();
    let books = vec![
        Book::new(1, "Dune", fx.sci_fi.id),
        Book::new(2, "Dune Messiah", fx.sci_fi.id).held_by(fx.alice.id),
        Book::new(3, "Children of Dune", fx.sci_fi.id),
        Book::new(4, "The Hobbit", fx.fantasy.id),
        Book::new(5, "The Silmarillion", fx.fantasy.id).held_by(fx.bob.id),
    ];
    add_books(&mut fx.conn, &books);

    let service = service(&mut fx.conn);
    for genre in [&fx.sci_fi, &fx.fantasy] {
        let expected = books
            .iter()
            .filter(|book| book.genre_id == genre.id && book.user_id.is_none())
            .count() as u64;
        assert_eq!(service.count_in_library_by_genre(genre).unwrap(), expected);
    }
}

#[test]
fn genre_range_reads_join_table_while_genre_count_reads_direct_field() {
    let mut fx = catalog();
    let unlinked_sci_fi = Book::new(1, "Dune", fx.sci_fi.id).with_year(1965);
    let linked_fantasy = Book::new(2, "The Hobbit", fx.fantasy.id).with_year(1937);
    add_books(
        &mut fx.conn,
        &[unlinked_sci_fi.clone(), linked_fantasy.clone()],
    );
    link_genre(&fx.conn, &fx.sci_fi, &linked_fantasy);

    let service = service(&mut fx.conn);

    let in_range = service.books_by_genre_years(&fx.sci_fi, 1900, 2000).unwrap();
    assert_eq!(ids(&in_range), vec![2]);
    assert_eq!(service.count_in_library_by_genre(&fx.sci_fi).unwrap(), 1);
    assert_eq!(service.count_in_library_by_genre(&fx.fantasy).unwrap(), 1);
    assert!(service
        .books_by_genre_years(&fx.fantasy, 1900, 2000)
        .unwrap()
        .is_empty());
}

#[test]
fn genre_range_is_inclusive_and_skips_unknown_years() {
    let mut fx = catalog();
    let books = vec![
        Book::new(1, "Early", fx.sci_fi.id).with_year(1959),
        Book::new(2, "Lower bound", fx.sci_fi.id).with_year(1960),
        Book::new(3, "Upper bound", fx.sci_fi.id).with_year(1970),
        Book::new(4, "Late", fx.sci_fi.id).with_year(1971),
        Book::new(5, "Undated", fx.sci_fi.id),
    ];
    add_books(&mut fx.conn, &books);
    for book in &books {
        link_genre(&fx.conn, &fx.sci_fi, book);
    }

    let service = service(&mut fx.conn);
    let mut in_range = ids(&service.books_by_genre_years(&fx.sci_fi, 1960, 1970).unwrap());
    in_range.sort_unstable();
    assert_eq!(in_range, vec![2, 3]);
    assert!(service
        .books_by_genre_years(&fx.sci_fi, 1970, 1960)
        .unwrap()
        .is_empty());
}

#[test]
fn count_in_library_by_author_ignores_checked_out_copies() {
    let mut fx = catalog();
    add_books(
        &mut fx.conn,
        &[
            Book::new(1, "Dune", fx.sci_fi.id).with_author(fx.herbert.id),
            Book::new(2, "Dune Messiah", fx.sci_fi.id)
                .with_author(fx.herbert.id)
                .held_by(fx.bob.id),
            Book::new(3, "Collaboration", fx.sci_fi.id)
                .with_author(fx.herbert.id)
                .with_author(fx.tolkien.id),
            Book::new(4, "The Hobbit", fx.fantasy.id).with_author(fx.tolkien.id),
        ],
    );

    let service = service(&mut fx.conn);
    assert_eq!(service.count_in_library_by_author(&fx.herbert).unwrap(), 2);
    assert_eq!(service.count_in_library_by_author(&fx.tolkien).unwrap(), 2);
}

#[test]
fn availability_reports_tri_state_with_literal_polarity() {
    let mut fx = catalog();
    let on_shelf = Book::new(1, "Dune", fx.sci_fi.id).with_author(fx.herbert.id);
    let checked_out = Book::new(2, "Dune Messiah", fx.sci_fi.id)
        .with_author(fx.herbert.id)
        .held_by(fx.alice.id);
    add_books(&mut fx.conn, &[on_shelf.clone(), checked_out.clone()]);

    let service = service(&mut fx.conn);

    let missing = Book::new(99, "Heretics of Dune", fx.sci_fi.id);
    let unknown = service
        .availability_by_author_and_title(&fx.herbert, &missing)
        .unwrap();
    assert_eq!(unknown, Availability::Unknown);
    assert_eq!(unknown.as_flag(), None);

    let in_library = service
        .availability_by_author_and_title(&fx.herbert, &on_shelf)
        .unwrap();
    assert_eq!(in_library.as_flag(), Some(false));

    let all_held = service
        .availability_by_author_and_title(&fx.herbert, &checked_out)
        .unwrap();
    assert_eq!(all_held, Availability::Available);
    assert_eq!(all_held.as_flag(), Some(true));

    let wrong_author = service
        .availability_by_author_and_title(&fx.tolkien, &on_shelf)
        .unwrap();
    assert_eq!(wrong_author, Availability::Unknown);
}

#[test]
fn availability_is_false_when_any_copy_remains_on_shelf() {
    let mut fx = catalog();
    let held_copy = Book::new(1, "Dune", fx.sci_fi.id)
        .with_author(fx.herbert.id)
        .held_by(fx.alice.id);
    let shelf_copy = Book::new(2, "Dune", fx.sci_fi.id).with_author(fx.herbert.id);
    add_books(&mut fx.conn, &[held_copy.clone(), shelf_copy]);

    let service = service(&mut fx.conn);
    assert_eq!(
        service
            .availability_by_author_and_title(&fx.herbert, &held_copy)
            .unwrap(),
        Availability::Unavailable
    );
}

#[test]
fn books_currently_held_returns_only_checked_out_match() {
    let mut fx = catalog();
    let held = Book::new(1, "Dune", fx.sci_fi.id).held_by(fx.alice.id);
    let shelved = Book::new(2, "Dune", fx.sci_fi.id);
    add_books(&mut fx.conn, &[held.clone(), shelved.clone()]);

    let service = service(&mut fx.conn);
    assert_eq!(ids(&service.books_currently_held(&held).unwrap()), vec![1]);
    assert!(service.books_currently_held(&shelved).unwrap().is_empty());
}

#[test]
fn count_held_by_user_counts_each_holder_separately() {
    let mut fx = catalog();
    add_books(
        &mut fx.conn,
        &[
            Book::new(1, "Dune", fx.sci_fi.id).held_by(fx.alice.id),
            Book::new(2, "Dune Messiah", fx.sci_fi.id).held_by(fx.alice.id),
            Book::new(3, "The Hobbit", fx.fantasy.id).held_by(fx.bob.id),
            Book::new(4, "The Silmarillion", fx.fantasy.id),
        ],
    );

    let service = service(&mut fx.conn);
    assert_eq!(service.count_held_by_user(&fx.alice).unwrap(), 2);
    assert_eq!(service.count_held_by_user(&fx.bob).unwrap(), 1);
}

#[test]
fn most_recently_published_ranks_unknown_years_last() {
    let mut fx = catalog();
    assert!(service(&mut fx.conn)
        .most_recently_published()
        .unwrap()
        .is_none());

    add_books(
        &mut fx.conn,
        &[
            Book::new(1, "Undated", fx.sci_fi.id),
            Book::new(2, "Dune", fx.sci_fi.id).with_year(1965),
            Book::new(3, "Tie later id", fx.sci_fi.id).with_year(1969),
            Book::new(4, "Dune Messiah", fx.sci_fi.id).with_year(1969),
        ],
    );

    let newest = service(&mut fx.conn)
        .most_recently_published()
        .unwrap()
        .unwrap();
    assert_eq!(newest.id, 3);
}

#[test]
fn most_recently_published_falls_back_to_lowest_id_when_all_years_unknown() {
    let mut fx = catalog();
    add_books(
        &mut fx.conn,
        &[
            Book::new(8, "B", fx.sci_fi.id),
            Book::new(5, "A", fx.sci_fi.id),
        ],
    );

    let newest = service(&mut fx.conn)
        .most_recently_published()
        .unwrap()
        .unwrap();
    assert_eq!(newest.id, 5);
}

#[test]
fn ordered_listings_are_deterministic_across_calls() {
    let mut fx = catalog();
    add_books(
        &mut fx.conn,
        &[
            Book::new(1, "The Hobbit", fx.fantasy.id).with_year(1937),
            Book::new(2, "Dune", fx.sci_fi.id),
            Book::new(3, "Dune Messiah", fx.sci_fi.id).with_year(1969),
            Book::new(4, "Dune", fx.sci_fi.id).with_year(1965),
            Book::new(5, "Children of Dune", fx.sci_fi.id).with_year(1976),
        ],
    );

    let service = service(&mut fx.conn);

    let by_name = service.list_all_by_name_ascending().unwrap();
    assert_eq!(ids(&by_name), vec![5, 2, 4, 3, 1]);
    assert_eq!(service.list_all_by_name_ascending().unwrap(), by_name);

    let by_year = service.list_all_by_year_descending().unwrap();
    assert_eq!(ids(&by_year), vec![5, 3, 4, 1, 2]);
    assert_eq!(service.list_all_by_year_descending().unwrap(), by_year);
}

#[test]
fn queries_re_read_committed_state_on_every_run() {
    let mut fx = catalog();
    add_books(&mut fx.conn, &[Book::new(1, "Dune", fx.sci_fi.id)]);

    let held_by_alice = BookQuery::all().filter(BookFilter::HeldBy(fx.alice.id));
    let mut service = service(&mut fx.conn);
    assert_eq!(service.list_all().unwrap().len(), 1);
    assert!(service.run(&held_by_alice).unwrap().is_empty());

    service
        .add(&Book::new(2, "Dune Messiah", fx.sci_fi.id).held_by(fx.alice.id))
        .unwrap();

    assert_eq!(service.list_all().unwrap().len(), 2);
    assert_eq!(ids(&service.run(&held_by_alice).unwrap()), vec![2]);
}
