//! Transformation request parsing
//!
//! Query parameters arrive as loosely typed strings. They are parsed here,
//! once, into a [`TransformRequest`]; nothing downstream re-reads the raw
//! query.
//!
//! Numeric parameters follow lenient integer parsing: leading whitespace and
//! an optional sign are accepted, parsing stops at the first non-digit, and a
//! value with no leading digits is "not a number".

use std::collections::HashMap;
use std::fmt;

use crate::config::TransformConfig;
use crate::constants::DEFAULT_QUALITY;
use crate::error::PipelineError;

/// Message returned when /resize is missing `image` or `width`
pub const RESIZE_VALIDATION_MESSAGE: &str = "Invalid parameters";

/// Message returned when /convert is missing `image`
pub const CONVERT_VALIDATION_MESSAGE: &str = "Invalid parameters: image URL is required";

/// The two supported operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Resize,
    Convert,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Resize => "resize",
            Operation::Convert => "convert",
        }
    }

    /// Route path for this operation
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/resize" => Some(Operation::Resize),
            "/convert" => Some(Operation::Convert),
            _ => None,
        }
    }

    /// Plain-text body sent on a 500 for this operation
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::Resize => "Error processing the image",
            Operation::Convert => "Error converting the image",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for `/resize`
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeRequest {
    pub source_url: String,
    /// Target width in pixels, always > 0
    pub width: u32,
    /// Raw blur radius; zero, negative or absent means no blur
    pub blur: Option<i64>,
}

impl ResizeRequest {
    /// Blur radius to apply, if any
    pub fn blur_radius(&self) -> Option<u32> {
        match self.blur {
            Some(radius) if radius > 0 => Some(u32::try_from(radius).unwrap_or(u32::MAX)),
            _ => None,
        }
    }
}

/// Parameters for `/convert`
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertRequest {
    pub source_url: String,
    /// `None` when omitted; `Some(NaN)` when supplied but not numeric
    pub quality: Option<f32>,
}

impl ConvertRequest {
    /// Quality handed to the encoder (NaN is passed through untouched)
    pub fn effective_quality(&self) -> f32 {
        self.quality.unwrap_or(DEFAULT_QUALITY)
    }
}

/// A validated transformation request
#[derive(Debug, Clone, PartialEq)]
pub enum TransformRequest {
    Resize(ResizeRequest),
    Convert(ConvertRequest),
}

impl TransformRequest {
    /// Build a request from decoded query parameters
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Validation` when a required parameter is
    /// missing or empty, or when `width` is not a positive integer within
    /// `config.max_width`.
    pub fn from_query(
        operation: Operation,
        params: &HashMap<String, String>,
        config: &TransformConfig,
    ) -> Result<Self, PipelineError> {
        match operation {
            Operation::Resize => {
                let (Some(image), Some(width)) = (non_empty(params, "image"), non_empty(params, "width"))
                else {
                    return Err(PipelineError::validation(RESIZE_VALIDATION_MESSAGE));
                };

                let width = match parse_leading_int(width) {
                    Some(w) if w > 0 && w <= i64::from(config.max_width) => w as u32,
                    _ => return Err(PipelineError::validation(RESIZE_VALIDATION_MESSAGE)),
                };

                Ok(TransformRequest::Resize(ResizeRequest {
                    source_url: image.to_string(),
                    width,
                    blur: non_empty(params, "blur").and_then(parse_leading_int),
                }))
            }
            Operation::Convert => {
                let Some(image) = non_empty(params, "image") else {
                    return Err(PipelineError::validation(CONVERT_VALIDATION_MESSAGE));
                };

                let quality = non_empty(params, "quality").map(|q| {
                    parse_leading_int(q)
                        .map(|v| v as f32)
                        .unwrap_or(f32::NAN)
                });

                Ok(TransformRequest::Convert(ConvertRequest {
                    source_url: image.to_string(),
                    quality,
                }))
            }
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            TransformRequest::Resize(_) => Operation::Resize,
            TransformRequest::Convert(_) => Operation::Convert,
        }
    }

    pub fn source_url(&self) -> &str {
        match self {
            TransformRequest::Resize(r) => &r.source_url,
            TransformRequest::Convert(c) => &c.source_url,
        }
    }
}

/// Split a raw query string into decoded key/value pairs
///
/// Pairs without `=` are ignored; a repeated key keeps its last value.
pub fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(query) = query {
        for pair in query.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                params.insert(
                    urlencoding::decode(key).unwrap_or_default().to_string(),
                    urlencoding::decode(value).unwrap_or_default().to_string(),
                );
            }
        }
    }
    params
}

/// Lenient integer parsing: `" 42px"` is 42, `"-3"` is -3, `"abc"` is `None`
///
/// Values beyond the `i64` range saturate.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn non_empty<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}
