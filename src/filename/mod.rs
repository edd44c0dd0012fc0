//! Output filename suggestion
//!
//! Derives the `Content-Disposition` filename from the source URL and the
//! request parameters. Pure: no I/O, and the clock is only read for the
//! fallback name.
//!
//! ```text
//! https://cdn.example.com/gallery/photo.jpg?v=1  width=400 blur=5  -> photo_400w_blur5.jpg
//! https://cdn.example.com/photo.jpg              quality=90        -> photo_q90.webp
//! not a url                                      resize            -> resized_<millis>.jpg
//! ```

use reqwest::Url;

use crate::constants::DEFAULT_QUALITY;
use crate::request::TransformRequest;

/// Last non-empty path segment of `url`, percent-decoded
///
/// Control characters are dropped. Returns `None` when the URL does not
/// parse or no printable name remains in its last segment.
pub fn url_file_name(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.last()?;
    if segment.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    // Decoded names end up in response headers, which reject control bytes
    let name: String = decoded.chars().filter(|c| !c.is_control()).collect();
    (!name.is_empty()).then_some(name)
}

/// Split a file name into stem and extension (dot included)
///
/// A name whose only dot is the leading one has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Extension of the source URL's file name, e.g. `.jpg`
pub fn source_extension(url: &str) -> Option<String> {
    let name = url_file_name(url)?;
    let (_, ext) = split_extension(&name);
    (!ext.is_empty()).then(|| ext.to_string())
}

/// Suggest a filename using the current wall clock for the fallback
pub fn suggest(request: &TransformRequest) -> String {
    suggest_at(request, chrono::Utc::now().timestamp_millis())
}

/// Suggest a filename; `now_millis` is only used when the URL yields no name
pub fn suggest_at(request: &TransformRequest, now_millis: i64) -> String {
    let Some(name) = url_file_name(request.source_url()) else {
        return fallback(request, now_millis);
    };
    let (stem, ext) = split_extension(&name);

    match request {
        TransformRequest::Resize(resize) => {
            let mut suffix = format!("_{}w", resize.width);
            if let Some(radius) = resize.blur_radius() {
                suffix.push_str(&format!("_blur{}", radius));
            }
            format!("{stem}{suffix}{ext}")
        }
        TransformRequest::Convert(convert) => {
            let suffix = match convert.quality {
                Some(q) if q != DEFAULT_QUALITY => format!("_q{}", q),
                _ => String::new(),
            };
            format!("{stem}{suffix}.webp")
        }
    }
}

fn fallback(request: &TransformRequest, now_millis: i64) -> String {
    match request {
        TransformRequest::Resize(_) => format!("resized_{now_millis}.jpg"),
        TransformRequest::Convert(_) => format!("converted_{now_millis}.webp"),
    }
}
