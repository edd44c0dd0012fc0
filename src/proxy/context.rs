// Per-request context carried through the pingora callbacks

use std::time::Instant;
use uuid::Uuid;

/// Request context created for every incoming request
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    method: String,
    path: String,
    started: Instant,
}

impl RequestContext {
    /// Create a context with a fresh request ID (UUID v4)
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            method: String::new(),
            path: String::new(),
            started: Instant::now(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Record the request line once the header is available
    pub fn set_request_line(&mut self, method: &str, path: &str) {
        self.method = method.to_string();
        self.path = path.to_string();
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
