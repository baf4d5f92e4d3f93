use axum::body::Bytes;
use axum::extract::Multipart;
use serde::Deserialize;

use crate::auth::{normalize_role, normalize_username};
use crate::database::models::{Movie, MAX_CATEGORY_NAME_LEN, MAX_MOVIE_NAME_LEN};
use crate::database::CategoryFilter;
use crate::error::ApiError;

const MAX_USERNAME_LEN: usize = 50;
const MAX_ROLE_LEN: usize = 50;

const INCOMPLETE: &str = "Datos incompletos.";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default, alias = "nombreUsuario")]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "rol")]
    pub role: String,
}

impl LoginRequest {
    pub fn normalized_username(&self) -> String {
        normalize_username(&self.username)
    }

    pub fn normalized_role(&self) -> String {
        normalize_role(&self.role)
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    #[serde(default, alias = "nombreUsuario")]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "rol")]
    pub role: String,
}

/// Registration input after normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl RegisterUserRequest {
    pub fn validate(self) -> Result<Registration, ApiError> {
        let username = normalize_username(&self.username);
        let role = normalize_role(&self.role);

        if username.is_empty() || self.password.is_empty() || role.is_empty() {
            return Err(ApiError::validation(INCOMPLETE));
        }
        check_username_length(&username)?;
        check_role_length(&role)?;

        Ok(Registration {
            username,
            password: self.password,
            role,
        })
    }
}

/// Admin edit of an account; omitted fields keep their stored values
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, alias = "nombreUsuario")]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, alias = "rol")]
    pub role: Option<String>,
}

/// Values an account update resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: String,
    /// Plain-text replacement password, `None` keeps the stored hash
    pub password: Option<String>,
    pub role: String,
}

impl UpdateUserRequest {
    pub fn resolve(self, current_username: &str, current_role: &str) -> Result<UserUpdate, ApiError> {
        let username = match self.username {
            Some(raw) => normalize_username(&raw),
            None => current_username.to_string(),
        };
        let role = match self.role {
            Some(raw) => normalize_role(&raw),
            None => current_role.to_string(),
        };

        if username.is_empty() || role.is_empty() {
            return Err(ApiError::validation(INCOMPLETE));
        }
        check_username_length(&username)?;
        check_role_length(&role)?;

        Ok(UserUpdate {
            username,
            password: self.password.filter(|p| !p.is_empty()),
            role,
        })
    }
}

fn check_username_length(username: &str) -> Result<(), ApiError> {
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(ApiError::validation("El nombre de usuario es demasiado largo."));
    }
    Ok(())
}

fn check_role_length(role: &str) -> Result<(), ApiError> {
    if role.chars().count() > MAX_ROLE_LEN {
        return Err(ApiError::validation("El rol es demasiado largo."));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct RenameCategoryRequest {
    #[serde(default)]
    pub nombre: String,
}

impl RenameCategoryRequest {
    pub fn name(&self) -> Result<String, ApiError> {
        category_name(&self.nombre)
    }
}

/// Trimmed, non-empty category name within the column limit
pub fn category_name(raw: &str) -> Result<String, ApiError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Nombre de categoría requerido."));
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(ApiError::validation("El nombre de categoría es demasiado largo."));
    }
    Ok(name.to_string())
}

/// Path segment of `/obtenerPeliculasEnCategoria/:categoria`
pub struct CategoryParam;

impl CategoryParam {
    /// `null` selects movies without a category, an integer selects that category
    pub fn parse(raw: &str) -> Result<CategoryFilter, ApiError> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("null") {
            return Ok(CategoryFilter::Uncategorized);
        }
        raw.parse::<i32>()
            .map(CategoryFilter::Category)
            .map_err(|_| ApiError::validation("Categoría inválida."))
    }
}

/// Uploaded file part of a movie form
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub data: Bytes,
}

/// Raw multipart fields of the movie create/update forms
#[derive(Debug, Default)]
pub struct MovieForm {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub duracion: Option<String>,
    pub categoria_id: Option<String>,
    pub imagen: Option<ImageUpload>,
}

/// Validated scalar fields of a movie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieFields {
    pub name: String,
    pub description: String,
    pub duration: i32,
    pub category_id: Option<i32>,
}

impl MovieForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "imagen" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let data = field.bytes().await?;
                    // Browsers send an empty part when no file was chosen
                    if filename.is_empty() && data.is_empty() {
                        continue;
                    }
                    form.imagen = Some(ImageUpload { filename, data });
                }
                "nombre" => form.nombre = Some(field.text().await?),
                "descripcion" => form.descripcion = Some(field.text().await?),
                "duracion" => form.duracion = Some(field.text().await?),
                "categoria_id" => form.categoria_id = Some(field.text().await?),
                other => tracing::debug!("Ignoring movie form field '{}'", other),
            }
        }

        Ok(form)
    }

    /// Fields for a new movie; name, description and duration are required
    pub fn new_movie(&self) -> Result<MovieFields, ApiError> {
        let name = required(self.nombre.as_deref())?;
        let description = required(self.descripcion.as_deref())?;
        let duration = required(self.duracion.as_deref())?;

        Ok(MovieFields {
            name: movie_name(name)?,
            description,
            duration: parse_duration(&duration)?,
            category_id: parse_category_id(self.categoria_id.as_deref())?,
        })
    }

    /// Fields for an update of `current`; omitted fields keep the stored values
    pub fn merged_with(&self, current: &Movie) -> Result<MovieFields, ApiError> {
        let name = match self.nombre.as_deref() {
            Some(raw) => movie_name(required(Some(raw))?)?,
            None => current.name.clone(),
        };
        let description = match self.descripcion.as_deref() {
            Some(raw) => required(Some(raw))?,
            None => current.description.clone(),
        };
        let duration = match self.duracion.as_deref() {
            Some(raw) => parse_duration(raw)?,
            None => current.duration,
        };
        let category_id = match self.categoria_id.as_deref() {
            Some(raw) => parse_category_id(Some(raw))?,
            None => current.category_id,
        };

        Ok(MovieFields {
            name,
            description,
            duration,
            category_id,
        })
    }
}

fn required(value: Option<&str>) -> Result<String, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ApiError::validation(INCOMPLETE)),
    }
}

fn movie_name(name: String) -> Result<String, ApiError> {
    if name.chars().count() > MAX_MOVIE_NAME_LEN {
        return Err(ApiError::validation("El nombre de la película es demasiado largo."));
    }
    Ok(name)
}

fn parse_duration(raw: &str) -> Result<i32, ApiError> {
    match raw.trim().parse::<i32>() {
        Ok(minutes) if minutes >= 0 => Ok(minutes),
        _ => Err(ApiError::validation("Duración inválida.")),
    }
}

/// Empty, absent or `null` means no category. Anything that is not an id can
/// never match a category, so it reports as one that does not exist.
fn parse_category_id(raw: Option<&str>) -> Result<Option<i32>, ApiError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| ApiError::not_found("Categoría no encontrada."))
}
