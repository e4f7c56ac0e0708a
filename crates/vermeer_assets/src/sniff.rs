//! Content type detection from leading bytes.

use image::ImageFormat;

/// MIME type reported for bytes that are not a recognised image.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Raster formats accepted as reference images.
const IMAGE_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
    ImageFormat::Ico,
    ImageFormat::Tiff,
    ImageFormat::Avif,
];

/// Detect the MIME type of `data` from its magic bytes.
///
/// File names and declared content types are never consulted.
///
/// # Examples
///
/// ```
/// use vermeer_assets::sniff_mime;
///
/// assert_eq!(sniff_mime(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]), "image/png");
/// assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
/// assert_eq!(sniff_mime(b"<html></html>"), "application/octet-stream");
/// ```
pub fn sniff_mime(data: &[u8]) -> &'static str {
    match image::guess_format(data) {
        Ok(format) if IMAGE_FORMATS.contains(&format) => format.to_mime_type(),
        _ => OCTET_STREAM,
    }
}

/// Whether `mime_type` names an image.
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}
