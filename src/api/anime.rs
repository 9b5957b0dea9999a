use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{AnimeDto, AnimeListDto, ApiError, ApiResponse, AppState};
use crate::models::anime::AnimeQuery;

const MAX_PAGE_SIZE: u64 = 100;

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub kind: Option<String>,
    pub rating: Option<String>,
    pub status: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    /// Comma-separated genre external ids; all of them must match.
    pub genres: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    #[serde(default)]
    pub filter_by_score: bool,
    #[serde(default)]
    pub filter_by_date: bool,
    #[serde(default)]
    pub filter_by_name: bool,
}

const fn default_page() -> u64 {
    1
}

const fn default_limit() -> u64 {
    10
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

pub async fn list_anime(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<AnimeListDto>>, ApiError> {
    if params.page == 0 {
        return Err(ApiError::validation("page is 1-indexed"));
    }

    let genre_ids = params
        .genres
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let query = AnimeQuery {
        kind: params.kind,
        rating: params.rating,
        status: params.status,
        genre_ids,
        start_year: params.start_year,
        end_year: params.end_year,
        page: params.page,
        limit: params.limit.clamp(1, MAX_PAGE_SIZE),
        sort_by: params.sort_by,
        sort_order: params.sort_order,
        by_score: params.filter_by_score,
        by_date: params.filter_by_date,
        by_name: params.filter_by_name,
    };

    let (items, total_count) = state.store.list_anime_filtered(&query).await?;

    if items.is_empty() {
        return Err(ApiError::no_anime_matched());
    }

    Ok(Json(ApiResponse::success(AnimeListDto {
        total_count,
        items: items.into_iter().map(AnimeDto::from).collect(),
    })))
}

pub async fn get_anime(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<AnimeDto>>, ApiError> {
    let anime = state
        .store
        .get_anime(id)
        .await?
        .ok_or_else(|| ApiError::anime_not_found(id))?;

    Ok(Json(ApiResponse::success(AnimeDto::from(anime))))
}

/// Primary name-search mode: every match, no page window.
pub async fn search_anime(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<Vec<AnimeDto>>>, ApiError> {
    if params.q.trim().is_empty() {
        return Err(ApiError::validation("search query cannot be empty"));
    }

    let items = state.store.search_anime_by_name(params.q.trim()).await?;

    Ok(Json(ApiResponse::success(
        items.into_iter().map(AnimeDto::from).collect(),
    )))
}

pub async fn list_kinds(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    Ok(Json(ApiResponse::success(state.store.anime_kinds().await?)))
}

pub async fn list_ratings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    Ok(Json(ApiResponse::success(
        state.store.anime_ratings().await?,
    )))
}
