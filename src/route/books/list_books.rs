use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{ErrorVerbosityProvider, ResourceError, ResourceErrorProvider},
    state::ApiState,
    types::Book,
};

use super::BookErrorContext;

#[derive(Debug, Serialize, ToSchema)]
pub struct ListBooksResponse {
    #[schema(example = "books fetched")]
    pub message: String,
    pub data: Vec<Book>,
}

impl ListBooksResponse {
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            message: "books fetched".to_string(),
            data: books,
        }
    }
}

impl IntoResponse for ListBooksResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "error_type")]
pub enum ListBooksErrorType {
    Query {
        #[serde(skip)]
        reason: String,
    },
}

impl ResourceErrorProvider for ListBooksErrorType {
    type Context = BookErrorContext;

    fn headers(&self) -> Option<axum::http::HeaderMap> {
        None
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn message(&self) -> &'static str {
        "bad request"
    }

    fn context(&self) -> Self::Context {
        match self {
            ListBooksErrorType::Query { reason } => BookErrorContext {
                reason: format!("Books could not be queried: {reason}"),
            },
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    responses(
        (status = 200, description = "Books fetched", body = ListBooksResponse),
        (status = 400, description = "Query failed")
    )
)]
#[tracing::instrument(name = "list_books", skip_all)]
pub async fn list_books(
    State(state): State<ApiState>,
) -> Result<ListBooksResponse, ResourceError<ListBooksErrorType, BookErrorContext>> {
    match state.books().list().await {
        Ok(books) => Ok(ListBooksResponse::new(books)),
        Err(err) => {
            tracing::warn!(%err, "Query failed");

            Err(ResourceError::new(
                state.error_verbosity(),
                ListBooksErrorType::Query {
                    reason: err.to_string(),
                },
            ))
        }
    }
}
