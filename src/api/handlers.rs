use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    client::{filter::apply_filter, pagination::calculate_pagination},
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{FilterState, LanguageOption, PublishedDataset, PublishedMovie, ADULT_AGE},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct MoviesQuery {
    pub min_age: Option<u32>,
    pub language: Option<String>,
    pub q: Option<String>,
    pub page: Option<usize>,
}

impl MoviesQuery {
    fn filter(&self) -> FilterState {
        FilterState::from_input(
            self.min_age.unwrap_or(ADULT_AGE),
            self.language.as_deref(),
            self.q.as_deref(),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub filter: FilterState,
    pub result_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub movies: Vec<PublishedMovie>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// The published dataset, as the browser fetches it
pub async fn get_dataset(State(state): State<AppState>) -> Json<PublishedDataset> {
    Json(state.dataset.as_ref().clone())
}

/// Language catalogue for the language selector
pub async fn get_languages(State(state): State<AppState>) -> Json<Vec<LanguageOption>> {
    Json(state.dataset.metadata.languages.clone())
}

/// One filtered page, computed with the same rules as the client session
pub async fn get_movies(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<MoviesQuery>,
) -> Json<MoviesResponse> {
    let filter = query.filter();
    let filtered = apply_filter(&state.dataset.movies, &filter);
    let p = calculate_pagination(filtered.len(), state.page_size, query.page.unwrap_or(1));

    tracing::debug!(
        request_id = %request_id,
        results = filtered.len(),
        page = p.page,
        "Movies preview"
    );

    Json(MoviesResponse {
        result_count: filtered.len(),
        page: p.page,
        page_size: state.page_size,
        total_pages: p.total_pages,
        has_prev: p.has_prev,
        has_next: p.has_next,
        movies: filtered
            .into_iter()
            .skip(p.offset)
            .take(state.page_size)
            .cloned()
            .collect(),
        filter,
    })
}

/// A single published movie by id
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<PublishedMovie>> {
    state
        .dataset
        .movies
        .iter()
        .find(|m| m.movie_id == movie_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("movie {}", movie_id)))
}
