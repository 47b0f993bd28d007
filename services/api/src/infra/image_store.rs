use std::path::PathBuf;

use anyhow::Context as _;
use uuid::Uuid;

use crate::domain::repository::ImageStore;
use crate::error::ApiError;

/// Directory, relative to the media root, that recipe images are written to.
pub const RECIPE_IMAGE_DIR: &str = "recipes/images";

/// Stores images as files under a media root. The returned reference is the
/// path relative to that root, e.g. `recipes/images/<uuid>.png`.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    pub media_root: PathBuf,
}

impl ImageStore for FsImageStore {
    async fn put(&self, bytes: &[u8], ext: &str) -> Result<String, ApiError> {
        let dir = self.media_root.join(RECIPE_IMAGE_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create image directory {}", dir.display()))?;

        let file_name = format!("{}.{ext}", Uuid::now_v7());
        let path = dir.join(&file_name);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("write image {}", path.display()))?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "stored recipe image");
        Ok(format!("{RECIPE_IMAGE_DIR}/{file_name}"))
    }

    async fn delete(&self, reference: &str) -> Result<(), ApiError> {
        let path = self.media_root.join(reference);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed recipe image");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("remove image {}", path.display()))
                .into()),
        }
    }
}
