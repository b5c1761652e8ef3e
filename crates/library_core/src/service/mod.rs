//! Core use-case services.
//!
//! # Responsibility
//! - Answer library domain questions through repository contracts.
//! - Keep callers decoupled from SQLite details.

pub mod book_service;
