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
    extractor::json::ApiJson,
    state::ApiState,
    types::NewBook,
};

use super::BookErrorContext;

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBookResponse {
    #[schema(example = "book created")]
    pub message: String,
}

impl CreateBookResponse {
    pub fn new() -> Self {
        Self {
            message: "book created".to_string(),
        }
    }
}

impl IntoResponse for CreateBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "error_type")]
pub enum CreateBookErrorType {
    Insert {
        #[serde(skip)]
        reason: String,
    },
}

impl ResourceErrorProvider for CreateBookErrorType {
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
            CreateBookErrorType::Insert { reason } => BookErrorContext {
                reason: format!("Book could not be inserted: {reason}"),
            },
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body = NewBook,
    responses(
        (status = 200, description = "Book created", body = CreateBookResponse),
        (status = 400, description = "Insert failed"),
        (status = 422, description = "Body is not a book")
    )
)]
#[tracing::instrument(name = "create_book", skip_all)]
pub async fn create_book(
    State(state): State<ApiState>,
    ApiJson(book): ApiJson<NewBook>,
) -> Result<CreateBookResponse, ResourceError<CreateBookErrorType, BookErrorContext>> {
    match state.books().create(book).await {
        Ok(book) => {
            tracing::info!(id = book.id, "Book created");

            Ok(CreateBookResponse::new())
        }
        Err(err) => {
            tracing::warn!(%err, "Insert failed");

            Err(ResourceError::new(
                state.error_verbosity(),
                CreateBookErrorType::Insert {
                    reason: err.to_string(),
                },
            ))
        }
    }
}
