// handlers/elevated/movies.rs - Movie writes with image upload
//
// Image files are written only after every check that can reject the request
// has passed, and are removed again if the row write fails.

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        State,
    },
    http::StatusCode,
};

use crate::api::{ImageUpload, MovieForm, PathParam};
use crate::app::AppState;
use crate::database::{
    models::{MovieChanges, NewMovie},
    DatabaseError,
};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Mensaje};

const MOVIE_NOT_FOUND: &str = "Película no encontrada";
const MOVIE_NAME_IN_USE: &str = "El nombre de la película ya está en uso.";

/// POST /crearPelicula (multipart: nombre, descripcion, duracion, categoria_id, imagen)
pub async fn create(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Mensaje> {
    let form = MovieForm::from_multipart(multipart?).await?;
    let fields = form.new_movie()?;
    check_image(&state, form.imagen.as_ref())?;
    ensure_category(&state, fields.category_id).await?;

    let movies = state.movies();
    if movies.name_taken(&fields.name, None).await? {
        return Err(ApiError::conflict(MOVIE_NAME_IN_USE));
    }

    let image = save_image(&state, form.imagen.as_ref()).await?;
    let new_movie = NewMovie {
        name: fields.name,
        description: fields.description,
        duration: fields.duration,
        image: image.clone(),
        category_id: fields.category_id,
    };

    let movie = match movies.insert(new_movie).await {
        Ok(movie) => movie,
        Err(e) => {
            if let Some(stored) = &image {
                state.images.discard(stored).await;
            }
            return Err(movie_write_error(e));
        }
    };

    tracing::info!("Created movie {} '{}'", movie.id, movie.name);
    Ok(ApiResponse::message(StatusCode::CREATED, "Película creada exitosamente"))
}

/// PUT /actualizarPelicula/:id - omitted fields keep their stored values
pub async fn update(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Mensaje> {
    let movies = state.movies();
    let current = movies
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(MOVIE_NOT_FOUND))?;

    let form = MovieForm::from_multipart(multipart?).await?;
    let fields = form.merged_with(&current)?;
    check_image(&state, form.imagen.as_ref())?;
    ensure_category(&state, fields.category_id).await?;

    if movies.name_taken(&fields.name, Some(id)).await? {
        return Err(ApiError::conflict(MOVIE_NAME_IN_USE));
    }

    let new_image = save_image(&state, form.imagen.as_ref()).await?;
    let changes = MovieChanges {
        name: fields.name,
        description: fields.description,
        duration: fields.duration,
        image: new_image.clone().or_else(|| current.image.clone()),
        category_id: fields.category_id,
    };

    if let Err(e) = movies.update(id, changes).await {
        if let Some(stored) = &new_image {
            state.images.discard(stored).await;
        }
        return Err(movie_write_error(e));
    }

    // The replaced file is unreachable once the row points at the new one
    if let (Some(_), Some(old)) = (&new_image, &current.image) {
        state.images.discard(old).await;
    }

    tracing::info!("Updated movie {}", id);
    Ok(ApiResponse::message(StatusCode::OK, "Película actualizada exitosamente"))
}

/// DELETE /borrarPelicula/:id - also removes the stored image
pub async fn remove(State(state): State<AppState>, PathParam(id): PathParam<i32>) -> ApiResult<Mensaje> {
    let movie = state
        .movies()
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::not_found(MOVIE_NOT_FOUND))?;

    if let Some(image) = &movie.image {
        state.images.discard(image).await;
    }

    tracing::info!("Deleted movie {} '{}'", movie.id, movie.name);
    Ok(ApiResponse::message(StatusCode::OK, "Película eliminada exitosamente"))
}

fn check_image(state: &AppState, upload: Option<&ImageUpload>) -> Result<(), ApiError> {
    if let Some(upload) = upload {
        state.images.check(&upload.filename, upload.data.len())?;
    }
    Ok(())
}

async fn save_image(state: &AppState, upload: Option<&ImageUpload>) -> Result<Option<String>, ApiError> {
    match upload {
        Some(upload) => Ok(Some(state.images.save(&upload.filename, &upload.data).await?)),
        None => Ok(None),
    }
}

async fn ensure_category(state: &AppState, category_id: Option<i32>) -> Result<(), ApiError> {
    if let Some(category_id) = category_id {
        if !state.categories().exists(category_id).await? {
            return Err(ApiError::not_found("Categoría no encontrada."));
        }
    }
    Ok(())
}

fn movie_write_error(err: DatabaseError) -> ApiError {
    match err {
        DatabaseError::Conflict(_) => ApiError::conflict(MOVIE_NAME_IN_USE),
        DatabaseError::NotFound(_) => ApiError::not_found(MOVIE_NOT_FOUND),
        other => other.into(),
    }
}
