//! Image transformation
//!
//! Everything that looks at pixels lives here:
//!
//! - [`probe`]: header-only dimension reading
//! - [`TransformEngine`]: the resize and convert operations
//! - [`ImageCodec`]: decode/resample/blur/encode primitives the engine drives
//!
//! # Output formats
//!
//! | Operation | Source        | Output        |
//! |-----------|---------------|---------------|
//! | resize    | `*.png` URL   | PNG           |
//! | resize    | anything else | JPEG (q 80)   |
//! | convert   | anything      | lossy WebP    |

pub mod codec;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod format;
pub mod metadata;
pub mod metrics;
pub mod probe;

pub use codec::{ImageCodec, RasterCodec};
pub use encoder::{EncoderFactory, EncoderQuality, ImageEncoder};
pub use engine::{TransformEngine, TransformResult};
pub use error::ImageError;
pub use format::OutputFormat;
pub use metrics::TransformMetrics;
pub use probe::{compute_target_height, probe, ImageGeometry};
