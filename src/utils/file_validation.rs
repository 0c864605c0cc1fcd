//! File validation utilities for checking file types by magic bytes.
//!
//! This module provides functions to detect image formats by inspecting
//! the file's magic bytes (file signature) rather than trusting client-provided
//! Content-Type headers.

/// Magic bytes for JPEG images (SOI marker).
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Magic bytes for PNG images.
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Magic bytes for WebP images - RIFF header.
const WEBP_MAGIC_RIFF: &[u8] = &[0x52, 0x49, 0x46, 0x46]; // "RIFF"

/// Magic bytes for WebP images - WEBP identifier at offset 8.
const WEBP_MAGIC_WEBP: &[u8] = &[0x57, 0x45, 0x42, 0x50]; // "WEBP"

/// Minimum bytes needed to detect any supported image format.
const MIN_BYTES_FOR_DETECTION: usize = 12;

/// Detected image format based on magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image (image/jpeg)
    Jpeg,
    /// PNG image (image/png)
    Png,
    /// WebP image (image/webp)
    WebP,
}

impl ImageFormat {
    /// Returns the MIME type for this image format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::WebP => "image/webp",
        }
    }
}

/// Detects the image format by inspecting magic bytes.
///
/// Returns `Some(ImageFormat)` if the data starts with recognized magic bytes
/// for JPEG, PNG, or WebP. Returns `None` for unrecognized or invalid formats.
///
/// # Arguments
/// * `data` - The raw file bytes to inspect.
///
/// # Examples
/// ```
/// use api::utils::file_validation::detect_image_format;
///
/// // Valid JPEG
/// let jpeg_data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01];
/// assert!(detect_image_format(&jpeg_data).is_some());
/// ```
pub fn detect_image_format(data: &[u8]) -> Option<ImageFormat> {
    if data.len() < MIN_BYTES_FOR_DETECTION {
        return None;
    }

    // Check JPEG magic bytes (FFD8FF)
    if data.starts_with(JPEG_MAGIC) {
        return Some(ImageFormat::Jpeg);
    }

    // Check PNG magic bytes
    if data.starts_with(PNG_MAGIC) {
        return Some(ImageFormat::Png);
    }

    // Check WebP: RIFF at start and WEBP at offset 8
    if data.starts_with(WEBP_MAGIC_RIFF) && data.len() >= 12 && &data[8..12] == WEBP_MAGIC_WEBP {
        return Some(ImageFormat::WebP);
    }

    None
}

/// Validates that the file content matches the declared Content-Type.
///
/// This function detects the actual image format from magic bytes and compares
/// it against the provided Content-Type header. Returns `true` only if:
/// - The file contains valid magic bytes for a supported format
/// - The detected format matches the declared Content-Type
///
/// # Arguments
/// * `data` - The raw file bytes to validate.
/// * `content_type` - The Content-Type header value from the request.
///
/// # Returns
/// `true` if the detected format matches the content type, `false` otherwise.
///
/// # Examples
/// ```
/// use api::utils::file_validation::validate_image_content_type;
///
/// // JPEG data with correct Content-Type
/// let jpeg_data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01];
/// assert!(validate_image_content_type(&jpeg_data, "image/jpeg"));
///
/// // JPEG data with wrong Content-Type
/// assert!(!validate_image_content_type(&jpeg_data, "image/png"));
/// ```
pub fn validate_image_content_type(data: &[u8], content_type: &str) -> bool {
    match detect_image_format(data) {
        Some(format) => format.mime_type() == content_type,
        None => false,
    }
}
