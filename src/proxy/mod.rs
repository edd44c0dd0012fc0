// Proxy module - Pingora ProxyHttp implementation
// Every request is answered locally in request_filter; nothing is proxied
// upstream.

use async_trait::async_trait;
use pingora_core::upstreams::peer::HttpPeer;
use pingora_core::Result;
use pingora_http::ResponseHeader;
use pingora_proxy::{ProxyHttp, Session};
use std::sync::Arc;
use tracing::Instrument;

pub mod context;

pub use context::RequestContext;

use crate::service::{EndpointResponse, TransformService};

/// Header carrying the per-request ID on every response
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// ImgshiftProxy implements the Pingora ProxyHttp trait
/// Hands every request to the transform service and writes its response
pub struct ImgshiftProxy {
    service: Arc<TransformService>,
}

impl ImgshiftProxy {
    pub fn new(service: Arc<TransformService>) -> Self {
        Self { service }
    }

    async fn write_response(
        session: &mut Session,
        response: EndpointResponse,
        request_id: &str,
    ) -> Result<()> {
        let mut header = ResponseHeader::build(response.status, None)?;
        for (name, value) in &response.headers {
            header.insert_header(*name, value.as_str())?;
        }
        header.insert_header(REQUEST_ID_HEADER, request_id)?;

        session
            .write_response_header(Box::new(header), false)
            .await?;
        session
            .write_response_body(Some(response.body), true)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ProxyHttp for ImgshiftProxy {
    type CTX = RequestContext;

    fn new_ctx(&self) -> Self::CTX {
        RequestContext::new()
    }

    /// Never reached: request_filter always answers
    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        Err(pingora_core::Error::explain(
            pingora_core::ErrorType::InternalError,
            "imgshift does not proxy upstream",
        ))
    }

    async fn request_filter(&self, session: &mut Session, ctx: &mut Self::CTX) -> Result<bool> {
        let req = session.req_header();
        let method = req.method.as_str().to_string();
        let path = req.uri.path().to_string();
        let query = req.uri.query().map(str::to_string);
        ctx.set_request_line(&method, &path);

        let span = tracing::info_span!(
            "request",
            request_id = %ctx.request_id(),
            method = %method,
            path = %path
        );

        let response = self
            .service
            .handle(&method, &path, query.as_deref())
            .instrument(span)
            .await;

        Self::write_response(session, response, ctx.request_id()).await?;
        Ok(true)
    }

    async fn logging(
        &self,
        session: &mut Session,
        e: Option<&pingora_core::Error>,
        ctx: &mut Self::CTX,
    ) {
        let status_code = session
            .response_written()
            .map(|resp| resp.status.as_u16())
            .unwrap_or(500);

        if let Some(err) = e {
            tracing::warn!(
                request_id = %ctx.request_id(),
                error = %err,
                "Request ended with a connection error"
            );
        }

        tracing::info!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
            status = status_code,
            duration_ms = ctx.elapsed_ms(),
            "Request completed"
        );
    }
}
