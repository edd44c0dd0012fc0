// Constants module - centralized default values for configuration
//
// Every `#[serde(default = ...)]` function in `crate::config` resolves to one
// of these values, so defaults live in exactly one place.

// =============================================================================
// Server defaults
// =============================================================================

/// Default bind address
pub const DEFAULT_ADDRESS: &str = "0.0.0.0";

/// Default listen port (overridden by the `PORT` environment variable)
pub const DEFAULT_PORT: u16 = 3000;

/// Default number of worker threads
pub const DEFAULT_THREADS: usize = 4;

// =============================================================================
// Fetch defaults
// =============================================================================

/// Default timeout for downloading a source image, in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default maximum source image size (50 MB)
pub const DEFAULT_MAX_SOURCE_BYTES: u64 = 50 * 1024 * 1024;

// =============================================================================
// Transform defaults
// =============================================================================

/// Default WebP quality when `quality` is omitted on /convert
pub const DEFAULT_QUALITY: f32 = 80.0;

/// Default JPEG quality for /resize output
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Default upper bound for the `width` parameter on /resize
pub const DEFAULT_MAX_WIDTH: u32 = 16384;

/// Default pixel budget for a source image, checked before decoding
pub const DEFAULT_MAX_SOURCE_PIXELS: u64 = 100_000_000; // 100 megapixels

/// Default pixel budget for a resize target
pub const DEFAULT_MAX_OUTPUT_PIXELS: u64 = 100_000_000;

// =============================================================================
// Scratch storage defaults
// =============================================================================

/// Default directory for per-request scratch files
pub const DEFAULT_SCRATCH_DIR: &str = "files";

/// Prefix of every scratch file name
pub const SCRATCH_FILE_PREFIX: &str = "temp_";

/// Extension of every scratch file name
pub const SCRATCH_FILE_EXTENSION: &str = "data";

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log level filter
pub const DEFAULT_LOG_LEVEL: &str = "info";
