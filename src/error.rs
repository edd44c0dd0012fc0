// Error types module

use thiserror::Error;

use crate::request::Operation;
use crate::transform::ImageError;

/// Centralized error type for the transformation pipeline
///
/// Each variant maps to one failure class of a request. Only validation
/// failures reach the client verbatim; everything else is logged server-side
/// and answered with the operation's generic message.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or malformed query parameter (400)
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Source unreachable, transport failure or non-2xx status (500)
    #[error("Download error for {url}: {message}")]
    Download { url: String, message: String },

    /// Scratch file absent or not a recognizable image container (500)
    #[error("Unreadable image: {message}")]
    UnreadableImage { message: String },

    /// Codec failure while transforming (500)
    #[error("Transform error: {0}")]
    Transform(#[from] ImageError),

    /// Scratch storage could not be allocated or written (500)
    #[error("Scratch storage error: {0}")]
    Scratch(#[source] std::io::Error),
}

impl PipelineError {
    pub fn validation(message: impl Into<String>) -> Self {
        PipelineError::Validation {
            message: message.into(),
        }
    }

    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn unreadable(message: impl Into<String>) -> Self {
        PipelineError::UnreadableImage {
            message: message.into(),
        }
    }

    /// Maps pipeline errors to HTTP status codes
    pub fn to_http_status(&self) -> u16 {
        match self {
            PipelineError::Validation { .. } => 400,
            PipelineError::Download { .. }
            | PipelineError::UnreadableImage { .. }
            | PipelineError::Transform(_)
            | PipelineError::Scratch(_) => 500,
        }
    }

    /// Plain-text body sent to the client
    pub fn client_message(&self, operation: Operation) -> String {
        match self {
            PipelineError::Validation { message } => message.clone(),
            _ => operation.failure_message().to_string(),
        }
    }

    /// Short label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation { .. } => "validation",
            PipelineError::Download { .. } => "download",
            PipelineError::UnreadableImage { .. } => "unreadable_image",
            PipelineError::Transform(_) => "transform",
            PipelineError::Scratch(_) => "scratch",
        }
    }
}

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Environment variable '{0}' is referenced but not set")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
