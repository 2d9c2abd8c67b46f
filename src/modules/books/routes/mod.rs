//! HTTP handlers for `/api/books`

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use bookstore_catalog::{BookFilter, BookId, CatalogError, CatalogStore};
use bookstore_http::error::AppError;
use serde_json::json;

use super::models::{Book, CreateBook, UpdateBook};

type Store = State<Arc<CatalogStore>>;

/// Routes of the books module, relative to its mount point.
pub fn router(store: Arc<CatalogStore>) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/genres", get(list_genres))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(store)
}

async fn create_book(
    State(store): Store,
    payload: Result<Json<CreateBook>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(rejected_body)?;
    let book = store
        .create(request.into_new_book()?)
        .map_err(catalog_error)?;

    let location = [(header::LOCATION, format!("/api/books/{}", book.id))];
    Ok((StatusCode::CREATED, location, Json(book)))
}

async fn list_books(
    State(store): Store,
    filter: Result<Query<BookFilter>, QueryRejection>,
) -> Result<Json<Vec<Book>>, AppError> {
    let Query(filter) = filter.map_err(rejected_query)?;
    Ok(Json(store.get_all(&filter)))
}

async fn list_genres(State(store): Store) -> Json<Vec<String>> {
    Json(store.allowed_genres().to_vec())
}

async fn get_book(
    State(store): Store,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = id.map_err(rejected_id)?;
    store.get_by_id(id).map(Json).map_err(catalog_error)
}

async fn update_book(
    State(store): Store,
    id: Result<Path<BookId>, PathRejection>,
    payload: Result<Json<UpdateBook>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id.map_err(rejected_id)?;
    let Json(request) = payload.map_err(rejected_body)?;

    store
        .update(id, request.into_patch()?)
        .map_err(catalog_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_book(
    State(store): Store,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id.map_err(rejected_id)?;

    if store.remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("book {} not found", id)))
    }
}

fn rejected_body(rejection: JsonRejection) -> AppError {
    AppError::bad_request(rejection.body_text())
}

fn rejected_id(rejection: PathRejection) -> AppError {
    AppError::bad_request(rejection.body_text())
}

fn rejected_query(rejection: QueryRejection) -> AppError {
    AppError::bad_request(rejection.body_text())
}

/// Translate a store rejection into its HTTP form.
pub(crate) fn catalog_error(err: CatalogError) -> AppError {
    let message = err.to_string();
    match err {
        CatalogError::GenreNotAllowed { genre, allowed } => {
            let detail = json!({
                "field": "genre",
                "error": "not_allowed",
                "value": genre,
                "allowed_genres": allowed,
            });
            AppError::validation(vec![detail], message)
        }
        CatalogError::BlankField { field } => {
            let detail = json!({"field": field, "error": "blank"});
            AppError::validation(vec![detail], message)
        }
        CatalogError::NegativePrice { .. } => {
            let detail = json!({"field": "price", "error": "negative"});
            AppError::validation(vec![detail], message)
        }
        CatalogError::Duplicate { title, author } => {
            let detail = json!({"title": title, "author": author});
            AppError::conflict(vec![detail], message)
        }
        CatalogError::NotFound(_) => AppError::not_found(message),
    }
}
