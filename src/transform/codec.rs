//! Codec capability
//!
//! The engine never touches pixel libraries directly; it drives an
//! [`ImageCodec`]. [`RasterCodec`] is the production implementation:
//! `image` for decoding, `fast_image_resize` (Lanczos3) for resampling and
//! the encoders in [`super::encoder`].

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::io::Reader as ImageReader;
use image::DynamicImage;
use std::io::Cursor;
use std::num::NonZeroU32;

use super::encoder::{EncoderFactory, EncoderQuality};
use super::error::ImageError;
use super::format::OutputFormat;

/// Decode, resample, blur and encode primitives
pub trait ImageCodec: Send + Sync {
    /// Decode a complete source image
    fn decode(&self, data: &[u8]) -> Result<DynamicImage, ImageError>;

    /// Resample to exactly `width` x `height`
    fn resize(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, ImageError>;

    /// Gaussian blur with the given radius as sigma
    fn blur(&self, image: DynamicImage, radius: u32) -> DynamicImage;

    /// Encode to `format`
    fn encode(
        &self,
        image: &DynamicImage,
        format: OutputFormat,
        quality: EncoderQuality,
    ) -> Result<Vec<u8>, ImageError>;
}

/// Production codec
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterCodec;

impl ImageCodec for RasterCodec {
    fn decode(&self, data: &[u8]) -> Result<DynamicImage, ImageError> {
        ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ImageError::decode_failed(e.to_string()))?
            .decode()
            .map_err(|e| ImageError::decode_failed(e.to_string()))
    }

    fn resize(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, ImageError> {
        if image.width() == width && image.height() == height {
            return Ok(image.clone());
        }

        let src_width = NonZeroU32::new(image.width())
            .ok_or_else(|| ImageError::resize_failed("Source width is 0"))?;
        let src_height = NonZeroU32::new(image.height())
            .ok_or_else(|| ImageError::resize_failed("Source height is 0"))?;
        let dst_width =
            NonZeroU32::new(width).ok_or_else(|| ImageError::resize_failed("Target width is 0"))?;
        let dst_height = NonZeroU32::new(height)
            .ok_or_else(|| ImageError::resize_failed("Target height is 0"))?;

        let src_image = Image::from_vec_u8(
            src_width,
            src_height,
            image.to_rgba8().into_raw(),
            PixelType::U8x4,
        )
        .map_err(|e| ImageError::resize_failed(format!("Failed to create source image: {:?}", e)))?;

        let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

        Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3))
            .resize(&src_image.view(), &mut dst_image.view_mut())
            .map_err(|e| ImageError::resize_failed(format!("Resize operation failed: {:?}", e)))?;

        let rgba = image::RgbaImage::from_raw(width, height, dst_image.into_vec())
            .ok_or_else(|| ImageError::resize_failed("Failed to create output image buffer"))?;

        Ok(DynamicImage::ImageRgba8(rgba))
    }

    fn blur(&self, image: DynamicImage, radius: u32) -> DynamicImage {
        image.blur(radius as f32)
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: OutputFormat,
        quality: EncoderQuality,
    ) -> Result<Vec<u8>, ImageError> {
        let rgba = image.to_rgba8();
        EncoderFactory::create(format).encode(rgba.as_raw(), image.width(), image.height(), quality)
    }
}
