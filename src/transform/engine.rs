//! Transform engine
//!
//! Runs one of the two supported operations over fetched source bytes:
//!
//! - **resize**: scale to the requested width with the height derived from
//!   the probed aspect ratio, optionally blur, encode as JPEG (PNG for PNG
//!   sources) and carry the source EXIF block over.
//! - **convert**: re-encode as lossy WebP at the requested quality.
//!
//! All methods are synchronous and CPU bound; callers run them on the
//! blocking pool.

use std::sync::Arc;
use std::time::Instant;

use super::codec::ImageCodec;
use super::encoder::EncoderQuality;
use super::error::ImageError;
use super::format::OutputFormat;
use super::metadata::{embed_exif, extract_exif};
use super::metrics::TransformMetrics;
use super::probe::ImageGeometry;
use crate::config::TransformConfig;
use crate::filename;
use crate::request::{ConvertRequest, ResizeRequest, TransformRequest};

/// Encoded output plus everything needed to describe it to the client
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub data: Vec<u8>,
    pub geometry: ImageGeometry,
    pub format: OutputFormat,
    pub content_type: &'static str,
    pub filename: String,
    /// Source URL extension (e.g. `.jpg`), reported by /convert
    pub original_format: Option<String>,
    pub metrics: TransformMetrics,
}

struct Rendered {
    data: Vec<u8>,
    geometry: ImageGeometry,
    format: OutputFormat,
}

pub struct TransformEngine {
    codec: Arc<dyn ImageCodec>,
    jpeg_quality: u8,
    max_source_pixels: u64,
    max_output_pixels: u64,
}

impl TransformEngine {
    pub fn new(codec: Arc<dyn ImageCodec>, config: &TransformConfig) -> Self {
        Self {
            codec,
            jpeg_quality: config.jpeg_quality,
            max_source_pixels: config.max_source_pixels,
            max_output_pixels: config.max_output_pixels,
        }
    }

    /// Run `request` over `source`, whose header probed as `source_geometry`
    ///
    /// Pixel budgets are checked against the probed and target geometry
    /// before anything is decoded.
    pub fn apply(
        &self,
        source: &[u8],
        source_geometry: ImageGeometry,
        request: &TransformRequest,
    ) -> Result<TransformResult, ImageError> {
        let started = Instant::now();
        self.check_limits(source_geometry, request)?;

        let (rendered, original_format) = match request {
            TransformRequest::Resize(resize) => (self.resize(source, source_geometry, resize)?, None),
            TransformRequest::Convert(convert) => (
                self.convert(source, convert)?,
                filename::source_extension(&convert.source_url),
            ),
        };

        let metrics = TransformMetrics {
            operation: request.operation(),
            original_size: source.len(),
            processed_size: rendered.data.len(),
            original_geometry: source_geometry,
            processed_geometry: rendered.geometry,
            output_format: rendered.format,
            processing_time: started.elapsed(),
        };

        Ok(TransformResult {
            data: rendered.data,
            geometry: rendered.geometry,
            format: rendered.format,
            content_type: rendered.format.content_type(),
            filename: filename::suggest(request),
            original_format,
            metrics,
        })
    }

    fn check_limits(
        &self,
        source_geometry: ImageGeometry,
        request: &TransformRequest,
    ) -> Result<(), ImageError> {
        if source_geometry.pixels() > self.max_source_pixels {
            return Err(ImageError::image_bomb(
                source_geometry.width,
                source_geometry.height,
                self.max_source_pixels,
            ));
        }

        if let TransformRequest::Resize(resize) = request {
            let target = source_geometry.scaled_to_width(resize.width);
            if target.pixels() > self.max_output_pixels {
                return Err(ImageError::output_too_large(
                    target.width,
                    target.height,
                    self.max_output_pixels,
                ));
            }
        }
        Ok(())
    }

    fn resize(
        &self,
        source: &[u8],
        source_geometry: ImageGeometry,
        request: &ResizeRequest,
    ) -> Result<Rendered, ImageError> {
        let target = source_geometry.scaled_to_width(request.width);
        let format = OutputFormat::for_resize_source(&request.source_url);

        let decoded = self.codec.decode(source)?;
        let mut image = self.codec.resize(&decoded, target.width, target.height)?;
        drop(decoded);

        if let Some(radius) = request.blur_radius() {
            image = self.codec.blur(image, radius);
        }

        let quality = EncoderQuality::with_quality(f32::from(self.jpeg_quality));
        let mut data = self.codec.encode(&image, format, quality)?;
        if let Some(exif) = extract_exif(source) {
            data = embed_exif(data, format, &exif);
        }

        Ok(Rendered {
            data,
            geometry: ImageGeometry::new(image.width(), image.height()),
            format,
        })
    }

    fn convert(&self, source: &[u8], request: &ConvertRequest) -> Result<Rendered, ImageError> {
        let image = self.codec.decode(source)?;
        let quality = EncoderQuality::with_quality(request.effective_quality());
        let data = self.codec.encode(&image, OutputFormat::WebP, quality)?;

        Ok(Rendered {
            data,
            geometry: ImageGeometry::new(image.width(), image.height()),
            format: OutputFormat::WebP,
        })
    }
}
