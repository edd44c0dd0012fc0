//! Responses produced by the service.
//!
//! The service returns an `EndpointResponse` instead of writing to a session
//! so that routing and the pipeline stay testable without a listener. The
//! HTTP front writes it out verbatim.

use bytes::Bytes;
use std::time::Instant;

use crate::transform::TransformResult;

/// A complete HTTP response.
#[derive(Debug, Clone)]
pub struct EndpointResponse {
    /// HTTP status code
    pub status: u16,
    /// Headers in write order; `Content-Length` is always present
    pub headers: Vec<(&'static str, String)>,
    /// Response body
    pub body: Bytes,
}

impl EndpointResponse {
    fn with_body(status: u16, content_type: &str, body: Bytes) -> Self {
        Self {
            status,
            headers: vec![
                ("Content-Type", content_type.to_string()),
                ("Content-Length", body.len().to_string()),
            ],
            body,
        }
    }

    /// Plain-text response
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::with_body(
            status,
            "text/plain; charset=utf-8",
            Bytes::from(body.into()),
        )
    }

    /// JSON response
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::with_body(status, "application/json", Bytes::from(body.to_string()))
    }

    /// 405 listing the single allowed method
    pub fn method_not_allowed() -> Self {
        Self::text(405, "Method Not Allowed").header("Allow", "GET")
    }

    /// 200 carrying a transformed image and its descriptive headers
    pub fn image(result: TransformResult) -> Self {
        let mut response = Self::with_body(200, result.content_type, Bytes::from(result.data))
            .header("X-Image-Width", result.geometry.width.to_string())
            .header("X-Image-Height", result.geometry.height.to_string())
            .header(
                "Content-Disposition",
                format!("inline; filename=\"{}\"", result.filename.replace('"', "")),
            );
        if let Some(original) = result.original_format {
            response = response.header("X-Original-Format", original);
        }
        response
    }

    /// Append a header
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// First value of `name`, case-insensitively
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Generate response for /health endpoint.
///
/// Returns health status with uptime and version information.
pub fn handle_health(start_time: Instant) -> EndpointResponse {
    let body = serde_json::json!({
        "status": "healthy",
        "uptime_seconds": start_time.elapsed().as_secs(),
        "version": env!("CARGO_PKG_VERSION")
    });
    EndpointResponse::json(200, &body)
}
