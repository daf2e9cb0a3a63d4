//! Pre-authentication type discovery.

use tracing::debug;
use url::form_urlencoded;

use kluis_core::{AuthType, ResponseStatus, Result, Transport, TransportRequest};

use crate::endpoint::EndpointResolver;
use crate::wire::{self, TypeDiscoveryResponse};

/// What the discovery service prescribes for a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveryOutcome {
    pub status: ResponseStatus,
    pub message: Option<String>,
    /// The flow the identity provider expects this user to authenticate
    /// with, when the lookup succeeded.
    pub auth_type: Option<AuthType>,
}

/// Ask the well-known discovery service which authentication flow applies
/// to `username`.
///
/// Unauthenticated, and never touches a tenant host. A failed lookup is
/// data, not an error: the outcome carries the server's status and message.
pub async fn discover_auth_type(
    username: &str,
    client_id: Option<&str>,
    transport: &dyn Transport,
) -> Result<DiscoveryOutcome> {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("username", username);
    if let Some(client_id) = client_id {
        query.append_pair("clientId", client_id);
    }
    let url = format!(
        "{}?{}",
        EndpointResolver::login_endpoint(wire::OAUTH_DISCOVERY_PATH),
        query.finish()
    );
    debug!(username, "discovering authentication type");

    let request = TransportRequest::get(url).header(wire::HEADER_ACCEPT, wire::APPLICATION_JSON);
    let response = transport.send(request).await?;

    match wire::decode_body::<TypeDiscoveryResponse>(&response)? {
        Some(body) => Ok(DiscoveryOutcome {
            status: body.response_status,
            message: body.response_message,
            auth_type: body.auth_type,
        }),
        None => Ok(DiscoveryOutcome {
            status: ResponseStatus::Failure,
            message: Some(wire::http_failure_message(response.status)),
            auth_type: None,
        }),
    }
}
