//! Optional JPEG re-encoding before transmission.

use crate::CompressionConfig;
use image::ImageResult;
use image::codecs::jpeg::JpegEncoder;
use tracing::{debug, warn};

/// Decode any supported raster image and re-encode it as JPEG.
///
/// The input format is detected from the bytes. Alpha is discarded.
///
/// # Errors
///
/// Returns an error if the bytes are not a decodable image.
pub fn compress_to_jpeg(data: &[u8], quality: u8) -> ImageResult<Vec<u8>> {
    let decoded = image::load_from_memory(data)?;
    let rgb = decoded.to_rgb8();
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
    encoder.encode_image(&rgb)?;
    Ok(out)
}

/// Applies [`CompressionConfig`] to fetched bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compressor {
    config: CompressionConfig,
}

impl Compressor {
    /// Create a compressor.
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Compress when enabled; on any decode or encode failure return the
    /// original bytes unchanged.
    pub fn apply(&self, data: Vec<u8>) -> Vec<u8> {
        if !*self.config.enabled() {
            return data;
        }
        match compress_to_jpeg(&data, self.config.effective_quality()) {
            Ok(compressed) => {
                debug!(
                    original_size = data.len(),
                    new_size = compressed.len(),
                    "Compressed image"
                );
                compressed
            }
            Err(e) => {
                warn!(error = %e, "Compression failed, using original bytes");
                data
            }
        }
    }
}
