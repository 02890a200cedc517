use axum::Json;
use utoipa::OpenApi;

use crate::{
    route::books::{
        create_book::{self, CreateBookResponse},
        delete_book::{self, DeleteBookResponse},
        get_book::{self, GetBookResponse},
        list_books::{self, ListBooksResponse},
    },
    types::{Book, NewBook},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        list_books::list_books,
        create_book::create_book,
        get_book::get_book,
        delete_book::delete_book
    ),
    components(schemas(
        Book,
        NewBook,
        ListBooksResponse,
        CreateBookResponse,
        GetBookResponse,
        DeleteBookResponse
    )),
    tags((name = "books", description = "Book management"))
)]
pub struct ApiDoc;

/// Serves the OpenAPI document of the book API.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
