use anyhow::Context;
use axum::{
    extract::{rejection::FormRejection, rejection::QueryRejection, Query, State},
    Form, Json,
};
use serde_json::json;
use shelf_db::BookKey;
use shelf_http::error::{AppError, ErrorBody, MessageBody};
use shelf_metadata::{MetadataError, VolumeInfo};

use super::models::{
    enrichment_from, AddBookForm, BookSummary, NewBook, SearchParams, MISSING_FIELDS,
};
use super::BooksState;

const UPSTREAM_FAILURE: &str = "Failed to fetch data from Google Books API.";

fn upstream_error(err: MetadataError) -> AppError {
    tracing::warn!(error = %err, "metadata lookup failed");
    AppError::upstream(UPSTREAM_FAILURE)
}

/// Store a book, then enrich it from the first metadata search result.
///
/// The book stays stored even when the lookup finds nothing or fails.
#[utoipa::path(
    post,
    path = "/add",
    tag = "Books",
    request_body(content = AddBookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Book stored and enriched", body = MessageBody),
        (status = 400, description = "Title or author missing", body = ErrorBody),
        (status = 404, description = "No metadata match for the title", body = ErrorBody),
        (status = 500, description = "Metadata provider or store failure", body = ErrorBody)
    )
)]
pub async fn add_book(
    State(state): State<BooksState>,
    form: Result<Form<AddBookForm>, FormRejection>,
) -> Result<Json<MessageBody>, AppError> {
    let Form(form) = form.map_err(|rejection| {
        AppError::validation(vec![json!({"error": rejection.body_text()})], MISSING_FIELDS)
    })?;
    let NewBook { title, author } = form.validate()?;

    state
        .store
        .insert_book(&title, &author)
        .await
        .context("failed to insert book")?;
    tracing::info!(%title, %author, "book inserted");

    let volumes = state
        .metadata
        .search_volumes(&title)
        .await
        .map_err(upstream_error)?;

    // Only the first result is applied.
    let Some(first) = volumes.into_iter().next() else {
        tracing::info!(%title, "no metadata found for book");
        return Err(AppError::not_found("No book found in API."));
    };

    let key = BookKey::new(title, author);
    let matched = state
        .store
        .update_book_fields(&key, &enrichment_from(first))
        .await
        .context("failed to store book metadata")?;
    tracing::info!(title = %key.title, matched, "book enriched");

    Ok(Json(MessageBody::new("Book added to DB!")))
}

/// List every stored book as `{title, author}` in insertion order.
#[utoipa::path(
    get,
    path = "/list",
    tag = "Books",
    responses(
        (status = 200, description = "Stored books", body = Vec<BookSummary>),
        (status = 404, description = "The catalog is empty", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn list_books(
    State(state): State<BooksState>,
) -> Result<Json<Vec<BookSummary>>, AppError> {
    let books = state
        .store
        .find_all_books()
        .await
        .context("failed to list books")?;

    if books.is_empty() {
        return Err(AppError::not_found("No books found in the database."));
    }

    Ok(Json(books.into_iter().map(BookSummary::from).collect()))
}

/// Proxy a free-text search to the metadata provider.
#[utoipa::path(
    get,
    path = "/search",
    tag = "Books",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching volumes in provider order", body = Vec<VolumeInfo>),
        (status = 400, description = "No query supplied", body = ErrorBody),
        (status = 404, description = "No matches", body = ErrorBody),
        (status = 500, description = "Metadata provider failure", body = ErrorBody)
    )
)]
pub async fn search_books(
    State(state): State<BooksState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<VolumeInfo>>, AppError> {
    let Query(params) = params.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let Some(term) = params.term() else {
        return Err(AppError::validation(
            vec![json!({"field": "query", "error": "required"})],
            "Please provide a search query.",
        ));
    };

    let volumes = state
        .metadata
        .search_volumes(term)
        .await
        .map_err(upstream_error)?;

    if volumes.is_empty() {
        return Err(AppError::not_found("No books found."));
    }

    tracing::info!(query = term, results = volumes.len(), "search complete");
    Ok(Json(volumes))
}
