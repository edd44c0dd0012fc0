//! Per-transformation size and timing figures
//!
//! Only used for the size-delta log line emitted after every successful
//! transformation.

use std::time::Duration;

use super::format::OutputFormat;
use super::probe::ImageGeometry;
use crate::request::Operation;

/// Figures for a single transformation
#[derive(Debug, Clone)]
pub struct TransformMetrics {
    pub operation: Operation,
    /// Fetched source size in bytes
    pub original_size: usize,
    /// Encoded output size in bytes
    pub processed_size: usize,
    pub original_geometry: ImageGeometry,
    pub processed_geometry: ImageGeometry,
    pub output_format: OutputFormat,
    /// Decode through encode, excluding the download
    pub processing_time: Duration,
}

impl TransformMetrics {
    /// Bytes saved by processing (negative if the image grew)
    pub fn bytes_saved(&self) -> i64 {
        self.original_size as i64 - self.processed_size as i64
    }

    /// Percentage saved (negative if the image grew)
    pub fn percentage_saved(&self) -> f64 {
        if self.original_size == 0 {
            0.0
        } else {
            (self.bytes_saved() as f64 / self.original_size as f64) * 100.0
        }
    }

    /// Emit the size-delta log line
    pub fn log(&self, source_url: &str) {
        let delta = self.percentage_saved();
        let summary = if delta >= 0.0 {
            format!("New image is {:.2}% less in size", delta)
        } else {
            format!("New image is {:.2}% larger in size", -delta)
        };

        tracing::info!(
            operation = %self.operation,
            source_url = %source_url,
            original_bytes = self.original_size,
            processed_bytes = self.processed_size,
            original_geometry = %self.original_geometry,
            processed_geometry = %self.processed_geometry,
            output_format = %self.output_format,
            processed_kb = format!("{:.2}", self.processed_size as f64 / 1024.0),
            processing_ms = self.processing_time.as_millis() as u64,
            "{}",
            summary
        );
    }
}
