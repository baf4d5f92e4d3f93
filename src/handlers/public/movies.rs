// handlers/public/movies.rs - Movie reads and search

use axum::extract::State;

use crate::api::{CategoryParam, MovieView, PathParam};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /obtenerPeliculas
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<MovieView>> {
    let movies = state.movies().list().await?;
    Ok(ApiResponse::success(MovieView::list(movies)))
}

/// GET /obtenerPelicula/:id
pub async fn show(State(state): State<AppState>, PathParam(id): PathParam<i32>) -> ApiResult<MovieView> {
    let movie = state
        .movies()
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Película no encontrada"))?;
    Ok(ApiResponse::success(MovieView::from(movie)))
}

/// GET /obtenerPeliculasEnCategoria/:categoria
///
/// `null` lists movies without a category.
pub async fn in_category(
    State(state): State<AppState>,
    PathParam(categoria): PathParam<String>,
) -> ApiResult<Vec<MovieView>> {
    let filter = CategoryParam::parse(&categoria)?;
    let movies = state.movies().list_by_category(filter).await?;
    Ok(ApiResponse::success(MovieView::list(movies)))
}

/// GET /buscarPelicula/:nombre - case-insensitive substring match
pub async fn search(
    State(state): State<AppState>,
    PathParam(nombre): PathParam<String>,
) -> ApiResult<Vec<MovieView>> {
    let movies = state.movies().search_by_name(&nombre).await?;
    Ok(ApiResponse::success(MovieView::list(movies)))
}
