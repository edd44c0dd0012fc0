//! Image encoder abstraction
//!
//! One encoder per [`OutputFormat`], all taking RGBA8 pixels. Lossy encoders
//! validate the requested quality themselves: a NaN or out-of-range value
//! is an [`ImageError::InvalidQuality`], never silently clamped.

use std::io::Cursor;

use super::error::ImageError;
use super::format::OutputFormat;
use crate::constants::DEFAULT_QUALITY;

/// Quality settings for image encoding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncoderQuality {
    /// Quality value (1-100, where 100 is best quality); may be NaN when the
    /// caller supplied something non-numeric
    pub quality: f32,
}

impl Default for EncoderQuality {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
        }
    }
}

impl EncoderQuality {
    pub fn with_quality(quality: f32) -> Self {
        Self { quality }
    }

    /// The quality if it is finite and within 1-100, else an error naming `format`
    fn checked(&self, format: OutputFormat) -> Result<f32, ImageError> {
        if self.quality.is_finite() && (1.0..=100.0).contains(&self.quality) {
            Ok(self.quality)
        } else {
            Err(ImageError::invalid_quality(format.as_str(), self.quality))
        }
    }
}

/// Trait for image encoders
///
/// The trait is object-safe so the codec can pick an encoder at runtime.
pub trait ImageEncoder: Send + Sync {
    /// The output format this encoder produces
    fn format(&self) -> OutputFormat;

    /// Encode raw RGBA image data (4 bytes per pixel) to the target format
    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        quality: EncoderQuality,
    ) -> Result<Vec<u8>, ImageError>;
}

/// JPEG encoder using the image crate
pub struct JpegEncoder;

impl ImageEncoder for JpegEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jpeg
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        quality: EncoderQuality,
    ) -> Result<Vec<u8>, ImageError> {
        use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
        use image::ImageEncoder as _;

        let quality = quality.checked(OutputFormat::Jpeg)?.round() as u8;

        // JPEG has no alpha channel
        let rgb_data = rgba_to_rgb(data);

        let mut output = Cursor::new(Vec::new());
        ImageJpegEncoder::new_with_quality(&mut output, quality)
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8)
            .map_err(|e| ImageError::encode_failed("jpeg", e.to_string()))?;

        Ok(output.into_inner())
    }
}

/// PNG encoder using the image crate (quality is ignored)
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Png
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        _quality: EncoderQuality,
    ) -> Result<Vec<u8>, ImageError> {
        use image::codecs::png::PngEncoder as ImagePngEncoder;
        use image::ImageEncoder as _;

        let mut output = Cursor::new(Vec::new());
        ImagePngEncoder::new(&mut output)
            .write_image(data, width, height, image::ColorType::Rgba8)
            .map_err(|e| ImageError::encode_failed("png", e.to_string()))?;

        Ok(output.into_inner())
    }
}

/// Lossy WebP encoder backed by libwebp
///
/// Uses libwebp's default method, so effort is fixed.
pub struct WebPEncoder;

impl ImageEncoder for WebPEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::WebP
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        quality: EncoderQuality,
    ) -> Result<Vec<u8>, ImageError> {
        let quality = quality.checked(OutputFormat::WebP)?;

        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ImageError::encode_failed(
                "webp",
                format!("expected {} bytes of RGBA, got {}", expected, data.len()),
            ));
        }

        let encoded = webp::Encoder::from_rgba(data, width, height).encode(quality);
        if encoded.is_empty() {
            return Err(ImageError::encode_failed("webp", "encoder produced no output"));
        }
        Ok(encoded.to_vec())
    }
}

/// Factory for creating encoders based on output format
pub struct EncoderFactory;

impl EncoderFactory {
    pub fn create(format: OutputFormat) -> Box<dyn ImageEncoder> {
        match format {
            OutputFormat::Jpeg => Box::new(JpegEncoder),
            OutputFormat::Png => Box::new(PngEncoder),
            OutputFormat::WebP => Box::new(WebPEncoder),
        }
    }
}

/// Convert RGBA to RGB by discarding alpha channel
fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for chunk in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&chunk[..3]);
    }
    rgb
}
