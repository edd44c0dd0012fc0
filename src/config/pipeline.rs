//! Pipeline configuration types.
//!
//! Settings for the three request-scoped stages that touch the outside world:
//! downloading the source, transforming it, and the scratch directory in
//! between.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_OUTPUT_PIXELS,
    DEFAULT_MAX_SOURCE_BYTES, DEFAULT_MAX_SOURCE_PIXELS, DEFAULT_MAX_WIDTH, DEFAULT_SCRATCH_DIR,
};

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_max_source_bytes() -> u64 {
    DEFAULT_MAX_SOURCE_BYTES
}

fn default_max_width() -> u32 {
    DEFAULT_MAX_WIDTH
}

fn default_max_source_pixels() -> u64 {
    DEFAULT_MAX_SOURCE_PIXELS
}

fn default_max_output_pixels() -> u64 {
    DEFAULT_MAX_OUTPUT_PIXELS
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SCRATCH_DIR)
}

/// Source download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Whole-request timeout for a source download, in seconds (default: 30)
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
    /// Largest accepted source body in bytes (default: 50 MB)
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            max_source_bytes: default_max_source_bytes(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Transform engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Largest `width` accepted by /resize (default: 16384)
    #[serde(default = "default_max_width")]
    pub max_width: u32,
    /// Largest probed source, in pixels, that will be decoded (default: 100M)
    #[serde(default = "default_max_source_pixels")]
    pub max_source_pixels: u64,
    /// Largest resize target in pixels (default: 100M)
    #[serde(default = "default_max_output_pixels")]
    pub max_output_pixels: u64,
    /// JPEG quality for /resize output (default: 80)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
            max_source_pixels: default_max_source_pixels(),
            max_output_pixels: default_max_output_pixels(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

/// Scratch storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScratchConfig {
    /// Directory holding per-request scratch files (default: ./files)
    #[serde(default = "default_scratch_dir")]
    pub directory: PathBuf,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            directory: default_scratch_dir(),
        }
    }
}
