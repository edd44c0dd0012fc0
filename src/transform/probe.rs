//! Image geometry and header probing

use std::path::{Path, PathBuf};

use image::io::Reader as ImageReader;

use crate::error::PipelineError;

/// Pixel dimensions of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageGeometry {
    pub width: u32,
    pub height: u32,
}

impl ImageGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Geometry after scaling to `target_width` with the aspect ratio kept
    ///
    /// Height rounds half up and is never below 1.
    pub fn pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn scaled_to_width(&self, target_width: u32) -> Self {
        Self {
            width: target_width,
            height: compute_target_height(self.width, self.height, target_width),
        }
    }
}

impl std::fmt::Display for ImageGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// `round(target_width * height / width)`, half up, clamped to `1..=u32::MAX`
pub fn compute_target_height(width: u32, height: u32, target_width: u32) -> u32 {
    if width == 0 {
        return 1;
    }
    let (w, h, tw) = (u64::from(width), u64::from(height), u64::from(target_width));
    let rounded = (2 * tw * h + w) / (2 * w);
    u32::try_from(rounded).unwrap_or(u32::MAX).max(1)
}

/// Read the pixel dimensions of the image at `path` from its header
///
/// Runs on the blocking pool; the pixel data is never decoded.
///
/// # Errors
///
/// Returns `PipelineError::UnreadableImage` when the file is missing, its
/// container is not recognized, or it reports a zero dimension.
pub async fn probe(path: &Path) -> Result<ImageGeometry, PipelineError> {
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || probe_blocking(&path))
        .await
        .map_err(|e| PipelineError::unreadable(format!("probe task failed: {e}")))?
}

fn probe_blocking(path: &Path) -> Result<ImageGeometry, PipelineError> {
    let (width, height) = ImageReader::open(path)
        .map_err(|e| PipelineError::unreadable(format!("{}: {e}", path.display())))?
        .with_guessed_format()
        .map_err(|e| PipelineError::unreadable(e.to_string()))?
        .into_dimensions()
        .map_err(|e| PipelineError::unreadable(e.to_string()))?;

    if width == 0 || height == 0 {
        return Err(PipelineError::unreadable(format!(
            "image reports empty geometry {width}x{height}"
        )));
    }
    Ok(ImageGeometry::new(width, height))
}
