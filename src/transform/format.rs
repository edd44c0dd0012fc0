//! Output format selection

use crate::filename::source_extension;

/// Encoded output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// Format produced by /resize for a given source URL
    ///
    /// PNG sources stay PNG; everything else becomes JPEG.
    pub fn for_resize_source(source_url: &str) -> Self {
        match source_extension(source_url) {
            Some(ext) if ext.eq_ignore_ascii_case(".png") => Self::Png,
            _ => Self::Jpeg,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
