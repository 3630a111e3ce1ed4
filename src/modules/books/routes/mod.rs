//! HTTP handlers for the books resource.

mod query;

use axum::{
    extract::{
        rejection::JsonRejection,
        Path, Query, State,
    },
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use bookshelf_http::{envelope::Envelope, error::AppError};

use super::models::{BookCreated, BookDetail, BookList, BookPayload};
use super::store::{SharedBookStore, StoreError, ValidationError};

use query::ListQuery;

/// Mutating operations, each with its own failure wording.
#[derive(Debug, Clone, Copy)]
enum Operation {
    Add,
    Update,
    Delete,
}

impl Operation {
    fn failure_prefix(self) -> &'static str {
        match self {
            Operation::Add => "Failed to add book",
            Operation::Update => "Failed to update book",
            Operation::Delete => "Failed to delete book",
        }
    }

    fn failure(self, err: StoreError) -> AppError {
        let prefix = self.failure_prefix();
        match err {
            StoreError::Validation(reason) => {
                AppError::validation(format!("{}. {}", prefix, validation_hint(reason)))
            }
            StoreError::NotFound(_) => AppError::not_found(format!("{}. Id not found", prefix)),
            StoreError::Internal(detail) => {
                AppError::Internal(anyhow::anyhow!(detail).context(prefix))
            }
        }
    }

    fn malformed(self, reason: impl std::fmt::Display) -> AppError {
        AppError::bad_request(format!("{}. {}", self.failure_prefix(), reason))
    }
}

fn validation_hint(reason: ValidationError) -> &'static str {
    match reason {
        ValidationError::MissingName => "Please provide the book name",
        ValidationError::ReadPageExceedsPageCount => "readPage cannot be greater than pageCount",
    }
}

/// Routes for `/books`, bound to `store`
pub fn router(store: SharedBookStore) -> Router {
    Router::new()
        .route("/books", post(add_book).get(list_books))
        .route(
            "/books/{book_id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(store)
}

async fn add_book(
    State(store): State<SharedBookStore>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) =
        payload.map_err(|rejection| Operation::Add.malformed(rejection.body_text()))?;

    let book_id = store
        .write()
        .await
        .add(payload)
        .map_err(|err| Operation::Add.failure(err))?;

    Ok(Envelope::success(BookCreated { book_id })
        .with_message("Book added successfully")
        .respond(StatusCode::CREATED))
}

async fn list_books(
    State(store): State<SharedBookStore>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let filter = ListQuery::from_pairs(params).into_filter();
    let books = store.read().await.list(&filter);

    Envelope::success(BookList { books }).respond(StatusCode::OK)
}

async fn get_book(
    State(store): State<SharedBookStore>,
    Path(book_id): Path<String>,
) -> Result<Response, AppError> {
    let book = store
        .read()
        .await
        .get(&book_id)
        .map_err(|_| AppError::not_found("Book not found"))?;

    Ok(Envelope::success(BookDetail { book }).respond(StatusCode::OK))
}

async fn update_book(
    State(store): State<SharedBookStore>,
    Path(book_id): Path<String>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Response, AppError> {
    let mut store = store.write().await;

    // An unknown id wins over a malformed body.
    if !store.contains(&book_id) {
        return Err(Operation::Update.failure(StoreError::NotFound(book_id)));
    }
    let Json(payload) =
        payload.map_err(|rejection| Operation::Update.malformed(rejection.body_text()))?;

    store
        .update(&book_id, payload)
        .map_err(|err| Operation::Update.failure(err))?;

    Ok(Envelope::message("Book updated successfully").respond(StatusCode::OK))
}

async fn delete_book(
    State(store): State<SharedBookStore>,
    Path(book_id): Path<String>,
) -> Result<Response, AppError> {
    store
        .write()
        .await
        .delete(&book_id)
        .map_err(|err| Operation::Delete.failure(err))?;

    Ok(Envelope::message("Book deleted successfully").respond(StatusCode::OK))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(error: AppError) -> String {
        match error {
            AppError::Validation { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::BadRequest { message, .. } => message,
            AppError::Internal(e) => e.to_string(),
        }
    }

    #[test]
    fn validation_failures_name_the_operation() {
        let error = Operation::Add.failure(ValidationError::MissingName.into());
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            message(error),
            "Failed to add book. Please provide the book name"
        );

        let error = Operation::Update.failure(ValidationError::ReadPageExceedsPageCount.into());
        assert_eq!(
            message(error),
            "Failed to update book. readPage cannot be greater than pageCount"
        );
    }

    #[test]
    fn missing_ids_map_to_not_found() {
        let error = Operation::Delete.failure(StoreError::NotFound("x".to_string()));
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
        assert_eq!(message(error), "Failed to delete book. Id not found");
    }

    #[test]
    fn internal_failures_keep_operation_context() {
        let error = Operation::Add.failure(StoreError::Internal("lost".to_string()));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message(error), "Failed to add book");
    }
}
