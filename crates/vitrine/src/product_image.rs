// File: src/product_image.rs
// Purpose: Square-crop uploaded product photos and store them by product id

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use vitrine_validation::format_id;

#[derive(Debug, Error)]
pub enum ProductImageError {
    #[error("could not decode uploaded image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("could not encode product image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("could not write product image: {0}")]
    Io(#[from] std::io::Error),
}

/// `<dir>/<zero-padded id>.jpg`
pub fn image_path(dir: &Path, product_id: i64) -> PathBuf {
    dir.join(format!("{}.jpg", format_id(Some(product_id))))
}

pub fn decode(bytes: &[u8]) -> Result<DynamicImage, ProductImageError> {
    image::load_from_memory(bytes).map_err(ProductImageError::Decode)
}

/// Center crop to the shorter side
pub fn square(image: &DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    let side = width.min(height);
    let x = (width - side) / 2;
    let y = (height - side) / 2;
    image.crop_imm(x, y, side, side)
}

/// Crop and write as JPEG, replacing any previous image of the product
pub fn save_square_jpeg(
    image: &DynamicImage,
    dir: &Path,
    product_id: i64,
) -> Result<PathBuf, ProductImageError> {
    fs::create_dir_all(dir)?;
    let path = image_path(dir, product_id);

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(square(image).to_rgb8());
    rgb.save_with_format(&path, ImageFormat::Jpeg)
        .map_err(ProductImageError::Encode)?;

    debug!(product_id, path = %path.display(), "product image stored");
    Ok(path)
}

/// Delete a product's image. Returns whether a file was removed.
pub fn remove_product_image(dir: &Path, product_id: i64) -> Result<bool, ProductImageError> {
    let path = image_path(dir, product_id);
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(&path)?;
    Ok(true)
}
