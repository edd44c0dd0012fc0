//! Codec error types
//!
//! Errors raised by the codec capability while decoding, resampling or
//! encoding pixels. The orchestrator wraps them in
//! [`PipelineError::Transform`](crate::error::PipelineError).

use std::fmt;

/// Errors that can occur inside the codec
#[derive(Debug, Clone)]
pub enum ImageError {
    // === Decoding Errors ===
    /// Failed to decode image data
    DecodeFailed { message: String },

    /// Source header declares more pixels than the decode budget allows
    ImageBombDetected {
        width: u32,
        height: u32,
        pixels: u64,
        max_pixels: u64,
    },

    // === Processing Errors ===
    /// Resize operation failed
    ResizeFailed { message: String },
    /// Encoding to output format failed
    EncodeFailed { format: String, message: String },
    /// Resize target exceeds the output pixel budget
    OutputTooLarge {
        width: u32,
        height: u32,
        pixels: u64,
        max_pixels: u64,
    },
    /// Quality handed to a lossy encoder is NaN or outside 1-100
    InvalidQuality { format: String, quality: f32 },

    /// The blocking worker running the codec panicked or was cancelled
    WorkerFailed { message: String },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::DecodeFailed { message } => {
                write!(f, "Failed to decode image: {}", message)
            }
            ImageError::ImageBombDetected {
                width,
                height,
                pixels,
                max_pixels,
            } => {
                write!(
                    f,
                    "Source image {}x{} ({} pixels) exceeds limit of {} pixels",
                    width, height, pixels, max_pixels
                )
            }
            ImageError::OutputTooLarge {
                width,
                height,
                pixels,
                max_pixels,
            } => {
                write!(
                    f,
                    "Target size {}x{} ({} pixels) exceeds limit of {} pixels",
                    width, height, pixels, max_pixels
                )
            }
            ImageError::ResizeFailed { message } => {
                write!(f, "Resize failed: {}", message)
            }
            ImageError::EncodeFailed { format, message } => {
                write!(f, "Failed to encode to {}: {}", format, message)
            }
            ImageError::InvalidQuality { format, quality } => {
                write!(
                    f,
                    "Expected number between 1 and 100 for {} quality but received {}",
                    format, quality
                )
            }
            ImageError::WorkerFailed { message } => {
                write!(f, "Image worker failed: {}", message)
            }
        }
    }
}

impl std::error::Error for ImageError {}

impl ImageError {
    pub fn decode_failed(message: impl Into<String>) -> Self {
        ImageError::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn resize_failed(message: impl Into<String>) -> Self {
        ImageError::ResizeFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        ImageError::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn image_bomb(width: u32, height: u32, max_pixels: u64) -> Self {
        ImageError::ImageBombDetected {
            width,
            height,
            pixels: u64::from(width) * u64::from(height),
            max_pixels,
        }
    }

    pub fn output_too_large(width: u32, height: u32, max_pixels: u64) -> Self {
        ImageError::OutputTooLarge {
            width,
            height,
            pixels: u64::from(width) * u64::from(height),
            max_pixels,
        }
    }

    pub fn invalid_quality(format: impl Into<String>, quality: f32) -> Self {
        ImageError::InvalidQuality {
            format: format.into(),
            quality,
        }
    }
}
