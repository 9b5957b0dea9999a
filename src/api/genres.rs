use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, GenreDto};

pub async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<GenreDto>>>, ApiError> {
    let genres = state.store.list_genres().await?;

    Ok(Json(ApiResponse::success(
        genres.into_iter().map(GenreDto::from).collect(),
    )))
}

pub async fn get_genre(
    State(state): State<Arc<AppState>>,
    Path(external_id): Path<String>,
) -> Result<Json<ApiResponse<GenreDto>>, ApiError> {
    let genre = state
        .store
        .get_genre_by_external_id(&external_id)
        .await?
        .ok_or_else(|| ApiError::genre_not_found(&external_id))?;

    Ok(Json(ApiResponse::success(GenreDto::from(genre))))
}
