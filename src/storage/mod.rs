//! Disk layout for uploaded originals and rendered page images.
//!
//! Everything lives under a single configurable root:
//! originals at `{root}/{id}/{name}`, page images at
//! `{root}/images/{id}/image-{i}.jpg`.

use crate::types::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Client-supplied filenames are untrusted: keep only the final path
/// component so the stored path can never escape the upload root.
pub fn sanitize_filename(filename: &str) -> AppResult<String> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    if name.is_empty() || name == "." || name == ".." {
        return Err(AppError::InvalidRequest(format!(
            "invalid filename: {}",
            filename
        )));
    }
    Ok(name.to_string())
}

pub fn upload_path(root: &Path, file_id: &str, filename: &str) -> PathBuf {
    root.join(file_id).join(filename)
}

pub fn images_dir(root: &Path, file_id: &str) -> PathBuf {
    root.join("images").join(file_id)
}

pub async fn save_to_disk(path: &Path, bytes: &[u8]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;

    Ok(())
}
