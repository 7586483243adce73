use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, put},
    Json, Router,
};
use cozy_http::{AppError, ResultExt};

use super::models::{Book, BookFields, MessageResponse};
use super::repository::BookRepository;

const FETCH_FAILED: &str = "Failed to fetch books";
const ADD_FAILED: &str = "Failed to add book";
const UPDATE_FAILED: &str = "Failed to update book";
const DELETE_FAILED: &str = "Failed to delete book";

/// Collection and item routes, relative to the module mount point.
pub fn router(repository: BookRepository) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", put(update_book).delete(delete_book))
        .with_state(repository)
}

async fn list_books(State(repo): State<BookRepository>) -> Result<Json<Vec<Book>>, AppError> {
    let books = repo.list_all().await.or_fail(FETCH_FAILED)?;
    Ok(Json(books))
}

async fn create_book(
    State(repo): State<BookRepository>,
    payload: Result<Json<BookFields>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(fields) = payload.or_fail(ADD_FAILED)?;
    let id = repo.create(fields).await.or_fail(ADD_FAILED)?;
    Ok(Json(MessageResponse::with_id("Book added!", id)))
}

async fn update_book(
    State(repo): State<BookRepository>,
    Path(id): Path<String>,
    payload: Result<Json<BookFields>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(fields) = payload.or_fail(UPDATE_FAILED)?;
    repo.replace_fields(&id, fields)
        .await
        .or_fail(UPDATE_FAILED)?;
    Ok(Json(MessageResponse::new("Book updated!")))
}

async fn delete_book(
    State(repo): State<BookRepository>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    repo.delete_one(&id).await.or_fail(DELETE_FAILED)?;
    Ok(Json(MessageResponse::new("Book deleted!")))
}
