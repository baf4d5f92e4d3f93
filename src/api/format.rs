use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::Movie;
use crate::services::ImageStore;

/// Public shape of a movie
#[derive(Debug, Clone, Serialize)]
pub struct MovieView {
    pub id: i32,
    pub nombre: String,
    pub descripcion: String,
    pub duracion: i32,
    /// `/uploads/<file>`, or empty when the movie has no image
    #[serde(rename = "rutaImagen")]
    pub ruta_imagen: String,
    pub categoria_id: Option<i32>,
    #[serde(rename = "fechaCreacion")]
    pub fecha_creacion: DateTime<Utc>,
}

impl From<Movie> for MovieView {
    fn from(movie: Movie) -> Self {
        let ruta_imagen = movie
            .image
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(ImageStore::public_path)
            .unwrap_or_default();

        Self {
            id: movie.id,
            nombre: movie.name,
            descripcion: movie.description,
            duracion: movie.duration,
            ruta_imagen,
            categoria_id: movie.category_id,
            fecha_creacion: movie.created_at,
        }
    }
}

impl MovieView {
    pub fn list(movies: Vec<Movie>) -> Vec<Self> {
        movies.into_iter().map(Self::from).collect()
    }
}
