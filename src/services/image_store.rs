use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

use crate::config::UploadConfig;

/// Public URL prefix the upload directory is served under
pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("file extension not allowed: {0:?}")]
    DisallowedExtension(String),

    #[error("image is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Movie images on local disk
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    max_bytes: usize,
    allowed_extensions: Vec<String>,
}

impl ImageStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            max_bytes: config.max_image_bytes,
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist
    pub async fn ensure_dir(&self) -> Result<(), ImageStoreError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Lowercased extension of `filename` when it is on the allow-list
    pub fn allowed_extension(&self, filename: &str) -> Option<String> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_lowercase();

        self.allowed_extensions.contains(&ext).then_some(ext)
    }

    /// Reject an upload before anything is written; returns the extension to store it under
    pub fn check(&self, original_name: &str, size: usize) -> Result<String, ImageStoreError> {
        let ext = self
            .allowed_extension(original_name)
            .ok_or_else(|| ImageStoreError::DisallowedExtension(original_name.to_string()))?;

        if size > self.max_bytes {
            return Err(ImageStoreError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(ext)
    }

    /// Store `data` under a fresh `<uuid>.<ext>` name and return that name
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<String, ImageStoreError> {
        let ext = self.check(original_name, data.len())?;

        self.ensure_dir().await?;
        let stored_name = format!("{}.{}", Uuid::new_v4(), ext);
        fs::write(self.dir.join(&stored_name), data).await?;

        tracing::info!("Stored image '{}' as {}", original_name, stored_name);
        Ok(stored_name)
    }

    /// Remove a stored image. Missing files are not an error.
    pub async fn remove(&self, stored_name: &str) -> Result<(), ImageStoreError> {
        // Stored names never contain directories; refuse anything that does
        let Some(file_name) = Path::new(stored_name).file_name() else {
            return Ok(());
        };
        if file_name != std::ffi::OsStr::new(stored_name) {
            tracing::warn!("Refusing to remove suspicious image path {:?}", stored_name);
            return Ok(());
        }

        match fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => {
                tracing::info!("Removed image {}", stored_name);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort removal used on cleanup paths where the request already has its answer
    pub async fn discard(&self, stored_name: &str) {
        if let Err(e) = self.remove(stored_name).await {
            tracing::warn!("Could not remove image {}: {}", stored_name, e);
        }
    }

    /// URL path a stored image is served at
    pub fn public_path(stored_name: &str) -> String {
        format!("{}/{}", PUBLIC_PREFIX, stored_name)
    }
}
