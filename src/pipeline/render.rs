//! PDF rasterization: render every page to a JPEG file via pdfium.
//!
//! pdfium wraps a C++ library with thread-local state that must not be
//! driven from async contexts, so the actual rendering runs inside
//! `tokio::task::spawn_blocking`. Page sizes vary wildly, so the render
//! config caps the longest edge in pixels rather than fixing a DPI.

use crate::types::{AppError, AppResult};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rasterize all pages of `pdf_path` into `out_dir/image-{i}.jpg`.
///
/// Returns the saved page paths in page order.
pub async fn render_to_jpegs(
    pdf_path: &Path,
    out_dir: &Path,
    max_pixels: u32,
) -> AppResult<Vec<PathBuf>> {
    tokio::fs::create_dir_all(out_dir).await?;

    let path = pdf_path.to_path_buf();
    let out = out_dir.to_path_buf();

    tokio::task::spawn_blocking(move || render_blocking(&path, &out, max_pixels))
        .await
        .map_err(|e| AppError::Internal(format!("render task panicked: {}", e)))?
}

fn render_blocking(pdf_path: &Path, out_dir: &Path, max_pixels: u32) -> AppResult<Vec<PathBuf>> {
    let pdfium = Pdfium::default();

    let document = pdfium.load_pdf_from_file(pdf_path, None).map_err(|e| {
        AppError::Render(format!(
            "failed to open '{}': {:?}",
            pdf_path.display(),
            e
        ))
    })?;

    let pages = document.pages();
    info!("PDF loaded: {} pages", pages.len());

    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let mut saved = Vec::with_capacity(pages.len() as usize);

    for (i, page) in pages.iter().enumerate() {
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| AppError::Render(format!("rasterizing page {}: {:?}", i + 1, e)))?;

        let image = bitmap.as_image();
        let out_path = out_dir.join(format!("image-{}.jpg", i));

        // JPEG has no alpha channel; pdfium hands back RGBA
        image
            .to_rgb8()
            .save_with_format(&out_path, image::ImageFormat::Jpeg)
            .map_err(|e| AppError::Render(format!("saving page {}: {}", i + 1, e)))?;

        debug!(
            "Rendered page {} -> {}x{} px at {}",
            i + 1,
            image.width(),
            image.height(),
            out_path.display()
        );

        saved.push(out_path);
    }

    Ok(saved)
}
