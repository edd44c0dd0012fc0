//! Request orchestration
//!
//! [`TransformService`] owns one request from validated parameters to the
//! final response:
//!
//! ```text
//! Validating ──400──> Rejected
//!     │
//!     v
//! Fetching ─> Probing ─> Transforming ─> Responding
//!     │          │            │               │
//!     └──────────┴────────────┴───> Cleanup <─┘
//! ```
//!
//! A scratch file exists only between Fetching and Cleanup, and Cleanup runs
//! on every path that acquired one. Failures after validation are logged
//! with their stage and answered with the operation's generic 500 message.

pub mod response;

pub use response::{handle_health, EndpointResponse};

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, TransformConfig};
use crate::error::PipelineError;
use crate::fetcher::ImageFetcher;
use crate::request::{parse_query, Operation, TransformRequest};
use crate::scratch::{ScratchFile, ScratchSpace};
use crate::transform::{probe, ImageCodec, ImageError, RasterCodec, TransformEngine, TransformResult};

/// Path of the liveness endpoint
pub const HEALTH_PATH: &str = "/health";

/// Pipeline stage, reported in failure logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Fetching,
    Probing,
    Transforming,
    Responding,
    Cleanup,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validating => "validating",
            Stage::Fetching => "fetching",
            Stage::Probing => "probing",
            Stage::Transforming => "transforming",
            Stage::Responding => "responding",
            Stage::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-process service shared by every request
pub struct TransformService {
    transform_config: TransformConfig,
    scratch: ScratchSpace,
    fetcher: ImageFetcher,
    engine: Arc<TransformEngine>,
    start_time: Instant,
}

impl TransformService {
    /// Build the service with the production codec
    ///
    /// # Errors
    ///
    /// Fails when the scratch directory cannot be created or the HTTP client
    /// cannot be built.
    pub fn new(config: &Config) -> std::io::Result<Self> {
        Self::with_codec(config, Arc::new(RasterCodec))
    }

    /// Build the service around a specific codec
    pub fn with_codec(config: &Config, codec: Arc<dyn ImageCodec>) -> std::io::Result<Self> {
        let scratch = ScratchSpace::new(&config.scratch.directory)?;
        let fetcher = ImageFetcher::new(&config.fetch)?;
        let engine = Arc::new(TransformEngine::new(codec, &config.transform));

        tracing::info!(
            scratch_dir = %scratch.directory().display(),
            fetch_timeout_secs = config.fetch.timeout_secs,
            max_width = config.transform.max_width,
            "Transform service initialized"
        );

        Ok(Self {
            transform_config: config.transform.clone(),
            scratch,
            fetcher,
            engine,
            start_time: Instant::now(),
        })
    }

    /// Route one HTTP request and produce its response
    pub async fn handle(&self, method: &str, path: &str, query: Option<&str>) -> EndpointResponse {
        if path == HEALTH_PATH {
            return if method == "GET" {
                handle_health(self.start_time)
            } else {
                EndpointResponse::method_not_allowed()
            };
        }

        let Some(operation) = Operation::from_path(path) else {
            return EndpointResponse::text(404, "Not Found");
        };
        if method != "GET" {
            return EndpointResponse::method_not_allowed();
        }

        let params = parse_query(query);
        let request = match TransformRequest::from_query(operation, &params, &self.transform_config)
        {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(
                    operation = %operation,
                    stage = %Stage::Validating,
                    error = %e,
                    "Rejected request"
                );
                return EndpointResponse::text(e.to_http_status(), e.client_message(operation));
            }
        };

        match self.execute(&request).await {
            Ok(result) => EndpointResponse::image(result),
            Err(e) => EndpointResponse::text(e.to_http_status(), e.client_message(operation)),
        }
    }

    /// Run the pipeline for a validated request
    ///
    /// The scratch file is released before this returns, whatever the outcome.
    pub async fn execute(&self, request: &TransformRequest) -> Result<TransformResult, PipelineError> {
        let scratch = self.scratch.acquire().await.map_err(|e| {
            tracing::error!(
                operation = %request.operation(),
                source_url = %request.source_url(),
                error = %e,
                "Failed to acquire scratch file"
            );
            PipelineError::Scratch(e)
        })?;

        let mut stage = Stage::Fetching;
        let outcome = self.run_stages(request, &scratch, &mut stage).await;

        if let Err(e) = &outcome {
            tracing::error!(
                operation = %request.operation(),
                source_url = %request.source_url(),
                stage = %stage,
                error_kind = e.kind(),
                error = %e,
                "Transformation failed"
            );
        }

        tracing::trace!(stage = %Stage::Cleanup, "Releasing scratch file");
        scratch.release().await;
        outcome
    }

    async fn run_stages(
        &self,
        request: &TransformRequest,
        scratch: &ScratchFile,
        stage: &mut Stage,
    ) -> Result<TransformResult, PipelineError> {
        let source_url = request.source_url();

        *stage = Stage::Fetching;
        let fetched = self.fetcher.fetch(source_url, scratch).await?;

        *stage = Stage::Probing;
        let geometry = probe(scratch.path()).await?;
        tracing::info!(
            operation = %request.operation(),
            source_url = %source_url,
            geometry = %geometry,
            bytes = fetched,
            "Original image"
        );

        *stage = Stage::Transforming;
        let source = read_source(scratch).await?;
        let engine = Arc::clone(&self.engine);
        let owned = request.clone();
        let result = tokio::task::spawn_blocking(move || engine.apply(&source, geometry, &owned))
            .await
            .map_err(|e| ImageError::WorkerFailed {
                message: e.to_string(),
            })??;

        *stage = Stage::Responding;
        result.metrics.log(source_url);
        Ok(result)
    }
}

async fn read_source(scratch: &ScratchFile) -> Result<Vec<u8>, PipelineError> {
    tokio::fs::read(scratch.path()).await.map_err(|e| {
        PipelineError::unreadable(format!("{}: {e}", scratch.path().display()))
    })
}
