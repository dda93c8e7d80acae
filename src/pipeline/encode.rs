//! Image encoding: JPEG file on disk → base64 for the chat-completion
//! request body. Vision APIs accept images as base64 data-URIs embedded
//! in JSON; the data-URI prefix itself is added by the LLM adapter.

use crate::types::AppResult;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use tracing::debug;

pub async fn encode_image(path: &Path) -> AppResult<String> {
    let bytes = tokio::fs::read(path).await?;
    let b64 = STANDARD.encode(&bytes);
    debug!("Encoded {} -> {} bytes base64", path.display(), b64.len());

    Ok(b64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_encode_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("image-0.jpg");
        tokio::fs::write(&path, b"\xff\xd8\xff\xe0fakejpeg").await.unwrap();

        let b64 = encode_image(&path).await.unwrap();
        let decoded = STANDARD.decode(&b64).unwrap();
        assert_eq!(decoded, b"\xff\xd8\xff\xe0fakejpeg");
    }

    #[tokio::test]
    async fn test_encode_missing_file_errors() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.jpg");
        assert!(encode_image(&missing).await.is_err());
    }
}
