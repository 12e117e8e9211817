//! Image asset store
//!
//! Uploaded images are validated, re-encoded as JPEG, and stored under
//! a content-hash filename, so the same image uploaded twice resolves
//! to the same file.

use image::DynamicImage;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::utils::AppError;

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality (85% keeps apparel colors while controlling size)
const JPEG_QUALITY: u8 = 85;

/// Stored image descriptor
#[derive(Debug, Serialize)]
pub struct StoredImage {
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub format: String,
    pub url: String,
}

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Validate image file
pub fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    let ext_lower = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
        return Err(AppError::validation(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext_lower,
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    if let Err(e) = image::load_from_memory(data) {
        return Err(AppError::validation(format!(
            "Invalid image file ({}): {}",
            ext_lower, e
        )));
    }

    Ok(())
}

/// Re-encode as JPEG at the standard quality
fn process_and_compress_image(data: &[u8]) -> Result<(DynamicImage, Vec<u8>), AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {}", e)))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to compress image: {}", e)))?;
    }

    Ok((img, buffer))
}

/// Filesystem-backed image store
#[derive(Clone)]
pub struct AssetStore {
    images_dir: PathBuf,
}

impl AssetStore {
    pub fn new(work_dir: &Path) -> Self {
        Self {
            images_dir: work_dir.join("uploads/images"),
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Validate, compress and persist an uploaded image
    pub async fn store_image(
        &self,
        data: Vec<u8>,
        original_name: String,
    ) -> Result<StoredImage, AppError> {
        if data.is_empty() {
            return Err(AppError::validation("Empty file provided"));
        }

        let ext = PathBuf::from(&original_name)
            .extension()
            .and_then(|ext| ext.to_str().map(|s| s.to_string()))
            .ok_or_else(|| {
                AppError::validation(format!("Invalid file extension for: {original_name}"))
            })?;

        validate_image(&data, &ext)?;
        let (_img, compressed) = process_and_compress_image(&data)?;

        // Content-hash filename gives free deduplication
        let hash = calculate_hash(&compressed);
        let filename = format!("{hash}.jpg");
        let file_path = self.images_dir.join(&filename);

        if fs::try_exists(&file_path).await.unwrap_or(false) {
            tracing::info!(
                original_name = %original_name,
                filename = %filename,
                "Duplicate image detected, returning existing file"
            );
        } else {
            fs::create_dir_all(&self.images_dir)
                .await
                .map_err(|e| AppError::internal(format!("Failed to create images dir: {e}")))?;
            fs::write(&file_path, &compressed)
                .await
                .map_err(|e| AppError::internal(format!("Failed to save file: {e}")))?;
            tracing::info!(
                original_name = %original_name,
                size = compressed.len(),
                hash = %hash,
                "Image uploaded"
            );
        }

        Ok(StoredImage {
            url: format!("/api/assets/{filename}"),
            filename,
            original_name,
            size: compressed.len(),
            format: "jpg".to_string(),
        })
    }

    /// Read a stored image back; filenames outside the store are refused
    pub async fn read_image(&self, filename: &str) -> Result<Vec<u8>, AppError> {
        if filename.contains('/') || filename.contains("..") {
            return Err(AppError::validation("Invalid filename"));
        }
        let path = self.images_dir.join(filename);
        fs::read(&path)
            .await
            .map_err(|_| AppError::not_found(format!("Image {filename}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 30, 30]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn validation_rejects_bad_input() {
        assert!(validate_image(&tiny_png(), "png").is_ok());
        assert!(validate_image(&tiny_png(), "gif").is_err());
        assert!(validate_image(b"not an image", "png").is_err());
        assert!(validate_image(&vec![0u8; MAX_FILE_SIZE + 1], "png").is_err());
    }

    #[tokio::test]
    async fn store_is_deduplicating() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AssetStore::new(tmp.path());

        let first = store
            .store_image(tiny_png(), "shirt.png".into())
            .await
            .unwrap();
        let second = store
            .store_image(tiny_png(), "same-shirt.png".into())
            .await
            .unwrap();
        assert_eq!(first.filename, second.filename);

        let bytes = store.read_image(&first.filename).await.unwrap();
        assert!(!bytes.is_empty());
    }

    #[tokio::test]
    async fn read_refuses_path_traversal() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AssetStore::new(tmp.path());
        assert!(store.read_image("../secret.jpg").await.is_err());
    }
}
