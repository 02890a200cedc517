use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ErrorVerbosityProvider, ResourceError, ResourceErrorProvider},
    extractor::path::ApiPath,
    state::ApiState,
    store::StoreError,
    types::Book,
};

use super::BookErrorContext;

#[derive(Debug, Serialize, ToSchema)]
pub struct GetBookResponse {
    #[schema(example = "book fetched")]
    pub message: String,
    pub data: Book,
}

impl GetBookResponse {
    pub fn new(book: Book) -> Self {
        Self {
            message: "book fetched".to_string(),
            data: book,
        }
    }
}

impl IntoResponse for GetBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "error_type")]
pub enum GetBookErrorType {
    EmptyId,
    UndecodableId,
    NotFound {
        #[serde(skip)]
        id: String,
    },
    Query {
        #[serde(skip)]
        id: String,
        #[serde(skip)]
        reason: String,
    },
}

impl ResourceErrorProvider for GetBookErrorType {
    type Context = BookErrorContext;

    fn headers(&self) -> Option<axum::http::HeaderMap> {
        None
    }

    fn status_code(&self) -> StatusCode {
        match self {
            GetBookErrorType::EmptyId => StatusCode::INTERNAL_SERVER_ERROR,
            GetBookErrorType::UndecodableId
            | GetBookErrorType::NotFound { .. }
            | GetBookErrorType::Query { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            GetBookErrorType::EmptyId => "id can't be empty",
            GetBookErrorType::UndecodableId
            | GetBookErrorType::NotFound { .. }
            | GetBookErrorType::Query { .. } => "could not get the book",
        }
    }

    fn context(&self) -> Self::Context {
        let reason = match self {
            GetBookErrorType::EmptyId => "Path parameter `id` is empty".to_string(),
            GetBookErrorType::UndecodableId => {
                "Path parameter `id` is not valid UTF-8 once percent-decoded".to_string()
            }
            GetBookErrorType::NotFound { id } => format!("Book with id {id} not found"),
            GetBookErrorType::Query { id, reason } => {
                format!("Book with id {id} could not be queried: {reason}")
            }
        };

        BookErrorContext { reason }
    }
}

/// Fetches a single book.
///
/// The id goes to the store untouched; a missing book and a failing query are
/// reported the same way.
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Id of the book")),
    responses(
        (status = 200, description = "Book fetched", body = GetBookResponse),
        (status = 400, description = "Book not found, id undecodable or query failed"),
        (status = 500, description = "Id is empty")
    )
)]
#[tracing::instrument(name = "get_book", skip_all, fields(id))]
pub async fn get_book(
    State(state): State<ApiState>,
    path: Result<ApiPath<String>, ApiError>,
) -> Result<GetBookResponse, ResourceError<GetBookErrorType, BookErrorContext>> {
    let verbosity = state.error_verbosity();

    // An id that does not percent-decode to UTF-8 fails like a bad id in the query.
    let Ok(ApiPath(id)) = path else {
        return Err(ResourceError::new(verbosity, GetBookErrorType::UndecodableId));
    };

    tracing::Span::current().record("id", id.as_str());

    if id.is_empty() {
        return Err(ResourceError::new(verbosity, GetBookErrorType::EmptyId));
    }

    match state.books().get(&id).await {
        Ok(book) => Ok(GetBookResponse::new(book)),
        Err(StoreError::NotFound) => {
            tracing::debug!("Not found");

            Err(ResourceError::new(
                verbosity,
                GetBookErrorType::NotFound { id },
            ))
        }
        Err(err) => {
            tracing::warn!(%err, "Query failed");

            Err(ResourceError::new(
                verbosity,
                GetBookErrorType::Query {
                    id,
                    reason: err.to_string(),
                },
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{error::ErrorVerbosity, store::memory::MemoryBookStore};

    use super::*;

    #[tokio::test]
    async fn empty_id_stops_before_the_store() {
        let state = ApiState::new(
            ErrorVerbosity::Message,
            Arc::new(MemoryBookStore::unavailable()),
        );

        let err = get_book(State(state), Ok(ApiPath(String::new())))
            .await
            .expect_err("Empty id must be rejected");

        assert!(matches!(err.error_type(), GetBookErrorType::EmptyId));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn malformed_id_is_a_query_error() {
        let state = ApiState::new(ErrorVerbosity::Message, Arc::new(MemoryBookStore::new()));

        let err = get_book(State(state), Ok(ApiPath("abc".to_string())))
            .await
            .expect_err("Malformed id must fail");

        assert!(matches!(err.error_type(), GetBookErrorType::Query { .. }));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
