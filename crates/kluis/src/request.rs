//! Per-endpoint request helpers bound to an authenticated client.
//!
//! [`Vault::new_request`](crate::Vault::new_request) is the single producer
//! of these helpers. The capability set is closed: [`ApiRequest`] is sealed,
//! and each capability is an ordinary constructor over the shared request
//! context - no runtime introspection. Helpers are fresh per call and share
//! no mutable state with each other.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use kluis_core::{
    ApiError, ResponseStatus, Result, SessionId, Transport, TransportRequest, TransportResponse,
};

use crate::endpoint::EndpointResolver;
use crate::wire::{self, ApiVersionsResponse, KeepAliveResponse};

mod sealed {
    pub trait Sealed {}
}

/// The state a request helper is bound to: resolver, rendered tracking
/// identity, a snapshot of the session id, and the shared transport.
pub struct RequestContext {
    pub(crate) resolver: EndpointResolver,
    pub(crate) tracking_id: String,
    pub(crate) session_id: Option<SessionId>,
    pub(crate) transport: Arc<dyn Transport>,
}

impl RequestContext {
    pub(crate) fn new(
        resolver: EndpointResolver,
        tracking_id: String,
        session_id: Option<SessionId>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            resolver,
            tracking_id,
            session_id,
            transport,
        }
    }

    fn base(&self, request: TransportRequest) -> TransportRequest {
        let mut request = request
            .header(wire::HEADER_ACCEPT, wire::APPLICATION_JSON)
            .header(wire::HEADER_CLIENT_ID, self.tracking_id.as_str());
        if let Some(session_id) = &self.session_id {
            request = request.header(wire::HEADER_AUTHORIZATION, session_id.as_str());
        }
        request
    }

    fn get(&self, url: String) -> TransportRequest {
        self.base(TransportRequest::get(url))
    }

    fn post(&self, url: String) -> TransportRequest {
        self.base(TransportRequest::post(url))
            .header(wire::HEADER_CONTENT_TYPE, wire::APPLICATION_JSON)
    }

    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        Ok(self.transport.send(request).await?)
    }
}

/// A request helper producible by [`Vault::new_request`](crate::Vault::new_request).
pub trait ApiRequest: sealed::Sealed + Sized {
    /// Bind a fresh helper to the client's context. Called by
    /// `Vault::new_request`; contexts are not constructible elsewhere.
    fn bind(context: RequestContext) -> Self;
}

// ============================================================================
// API version listing
// ============================================================================

/// `GET {tenant}/api` - lists the API versions the server exposes, with the
/// fully-qualified URL the server reports for each.
///
/// This is the lightweight call session validation is built on.
pub struct ApiVersionsRequest {
    context: RequestContext,
}

impl sealed::Sealed for ApiVersionsRequest {}

impl std::fmt::Debug for ApiVersionsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiVersionsRequest").finish_non_exhaustive()
    }
}

impl ApiRequest for ApiVersionsRequest {
    fn bind(context: RequestContext) -> Self {
        Self { context }
    }
}

/// Output of the version-listing call.
#[derive(Clone, Debug)]
pub struct ApiVersionsOutput {
    pub status: ResponseStatus,
    pub message: Option<String>,
    pub errors: Vec<ApiError>,
    /// The user id the server authenticated the call as.
    pub user_id: Option<i64>,
    /// Raw response headers.
    pub headers: Vec<(String, String)>,
    /// Version label to the server-reported endpoint URL.
    pub versions: BTreeMap<String, String>,
}

impl ApiVersionsRequest {
    /// Issue the call.
    pub async fn send(self) -> Result<ApiVersionsOutput> {
        let url = self.context.resolver.version_list_url();
        debug!(%url, "listing API versions");

        let request = self.context.get(url);
        let response = self.context.send(request).await?;
        let headers = response.headers.clone();

        match wire::decode_body::<ApiVersionsResponse>(&response)? {
            Some(body) => Ok(ApiVersionsOutput {
                status: body.response_status,
                message: body.response_message,
                errors: body.errors,
                user_id: body.user_id,
                headers,
                versions: body.values,
            }),
            None => Ok(ApiVersionsOutput {
                status: ResponseStatus::Failure,
                message: Some(wire::http_failure_message(response.status)),
                errors: Vec::new(),
                user_id: None,
                headers,
                versions: BTreeMap::new(),
            }),
        }
    }
}

// ============================================================================
// Keep-alive
// ============================================================================

/// `POST {tenant}/api/{version}/keep-alive` - refreshes the session's
/// inactivity window.
pub struct KeepAliveRequest {
    context: RequestContext,
}

impl sealed::Sealed for KeepAliveRequest {}

impl ApiRequest for KeepAliveRequest {
    fn bind(context: RequestContext) -> Self {
        Self { context }
    }
}

/// Output of the keep-alive call.
#[derive(Clone, Debug)]
pub struct KeepAliveOutput {
    pub status: ResponseStatus,
    pub message: Option<String>,
    pub errors: Vec<ApiError>,
}

impl KeepAliveRequest {
    /// Issue the call.
    pub async fn send(self) -> Result<KeepAliveOutput> {
        let url = self.context.resolver.api_endpoint(wire::KEEP_ALIVE_PATH, true);
        debug!(%url, "sending keep-alive");

        let request = self.context.post(url);
        let response = self.context.send(request).await?;

        match wire::decode_body::<KeepAliveResponse>(&response)? {
            Some(body) => Ok(KeepAliveOutput {
                status: body.response_status,
                message: body.response_message,
                errors: body.errors,
            }),
            None => Ok(KeepAliveOutput {
                status: ResponseStatus::Failure,
                message: Some(wire::http_failure_message(response.status)),
                errors: Vec::new(),
            }),
        }
    }
}
