//! CLI catalog probe.
//!
//! # Responsibility
//! - Verify `library_core` linkage and print the core version.
//! - When given a database path, print a short catalog summary.
//!
//! Usage: `library_cli [DB_PATH]`. Set `LIBRARY_LOG_DIR` (absolute) to enable
//! file logging; `LIBRARY_LOG_LEVEL` overrides the build-mode default level.

use library_core::db::open_db;
use library_core::{
    core_version, default_log_level, init_logging, BookQueryService, SqliteBookRepository,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("library_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("LIBRARY_LOG_DIR") {
        let level = std::env::var("LIBRARY_LOG_LEVEL")
            .unwrap_or_else(|_| default_log_level().as_str().to_string());
        init_logging(&level, &log_dir)?;
    }

    println!("library_core version={}", core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return Ok(());
    };

    let mut conn = open_db(&db_path)?;
    let service = BookQueryService::new(SqliteBookRepository::try_new(&mut conn)?);

    let books = service.list_all()?;
    let in_library = books.iter().filter(|book| book.is_in_library()).count();
    println!("books total={} in_library={}", books.len(), in_library);

    match service.most_recently_published()? {
        Some(book) => println!(
            "most_recent id={} name={} year={}",
            book.id,
            book.name,
            book.publish_year
                .map_or_else(|| "unknown".to_string(), |year| year.to_string())
        ),
        None => println!("most_recent none"),
    }

    log::info!("event=cli_summary module=cli status=ok book_count={}", books.len());
    Ok(())
}
