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
};

use super::BookErrorContext;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteBookResponse {
    #[schema(example = "book deleted")]
    pub message: String,
}

impl DeleteBookResponse {
    pub fn new() -> Self {
        Self {
            message: "book deleted".to_string(),
        }
    }
}

impl IntoResponse for DeleteBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "error_type")]
pub enum DeleteBookErrorType {
    EmptyId,
    UndecodableId,
    Delete {
        #[serde(skip)]
        id: String,
        #[serde(skip)]
        reason: String,
    },
}

impl ResourceErrorProvider for DeleteBookErrorType {
    type Context = BookErrorContext;

    fn headers(&self) -> Option<axum::http::HeaderMap> {
        None
    }

    fn status_code(&self) -> StatusCode {
        match self {
            DeleteBookErrorType::EmptyId => StatusCode::INTERNAL_SERVER_ERROR,
            DeleteBookErrorType::UndecodableId | DeleteBookErrorType::Delete { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn message(&self) -> &'static str {
        match self {
            DeleteBookErrorType::EmptyId => "id can't be empty",
            DeleteBookErrorType::UndecodableId | DeleteBookErrorType::Delete { .. } => {
                "could not delete book"
            }
        }
    }

    fn context(&self) -> Self::Context {
        let reason = match self {
            DeleteBookErrorType::EmptyId => "Path parameter `id` is empty".to_string(),
            DeleteBookErrorType::UndecodableId => {
                "Path parameter `id` is not valid UTF-8 once percent-decoded".to_string()
            }
            DeleteBookErrorType::Delete { id, reason } => {
                format!("Book with id {id} could not be deleted: {reason}")
            }
        };

        BookErrorContext { reason }
    }
}

/// Deletes a book.
///
/// Deleting an id that matches no book still succeeds.
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Id of the book")),
    responses(
        (status = 200, description = "Book deleted", body = DeleteBookResponse),
        (status = 400, description = "Id undecodable or delete failed"),
        (status = 500, description = "Id is empty")
    )
)]
#[tracing::instrument(name = "delete_book", skip_all, fields(id))]
pub async fn delete_book(
    State(state): State<ApiState>,
    path: Result<ApiPath<String>, ApiError>,
) -> Result<DeleteBookResponse, ResourceError<DeleteBookErrorType, BookErrorContext>> {
    let verbosity = state.error_verbosity();

    // An id that does not percent-decode to UTF-8 fails like a bad id in the query.
    let Ok(ApiPath(id)) = path else {
        return Err(ResourceError::new(verbosity, DeleteBookErrorType::UndecodableId));
    };

    tracing::Span::current().record("id", id.as_str());

    if id.is_empty() {
        return Err(ResourceError::new(verbosity, DeleteBookErrorType::EmptyId));
    }

    match state.books().delete(&id).await {
        Ok(affected) => {
            tracing::info!(affected, "Book deleted");

            Ok(DeleteBookResponse::new())
        }
        Err(err) => {
            tracing::warn!(%err, "Delete failed");

            Err(ResourceError::new(
                verbosity,
                DeleteBookErrorType::Delete {
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

        let err = delete_book(State(state), Ok(ApiPath(String::new())))
            .await
            .expect_err("Empty id must be rejected");

        assert!(matches!(err.error_type(), DeleteBookErrorType::EmptyId));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn failing_delete_does_not_report_success() {
        let state = ApiState::new(
            ErrorVerbosity::Message,
            Arc::new(MemoryBookStore::unavailable()),
        );

        let err = delete_book(State(state), Ok(ApiPath("1".to_string())))
            .await
            .expect_err("Delete against an unavailable store must fail");

        assert!(matches!(
            err.error_type(),
            DeleteBookErrorType::Delete { .. }
        ));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_book_is_still_deleted() {
        let state = ApiState::new(ErrorVerbosity::Message, Arc::new(MemoryBookStore::new()));

        let response = delete_book(State(state), Ok(ApiPath("404".to_string())))
            .await
            .expect("Deleting a missing book succeeds");

        assert_eq!(response.message, "book deleted");
    }
}
