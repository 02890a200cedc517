use serde::Serialize;

pub mod app;
pub mod create_book;
pub mod delete_book;
pub mod get_book;
pub mod list_books;

/// Context of every book error, shown with full error verbosity.
#[derive(Debug, Serialize)]
pub struct BookErrorContext {
    pub reason: String,
}
