//! The authenticated session client.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use kluis_core::{
    ApiVersion, ClientId, ConfigError, ResponseStatus, Result, TenantHost, Transport, VaultSession,
};

use crate::endpoint::EndpointResolver;
use crate::request::{ApiRequest, ApiVersionsRequest, KeepAliveOutput, KeepAliveRequest, RequestContext};

/// An authenticated connection to a tenant.
///
/// A `Vault` is obtained exclusively through
/// [`AuthBuilder`](crate::AuthBuilder); it owns the tenant host, the client
/// identity, the active [`VaultSession`], and the shared transport.
///
/// # Ownership
///
/// A `Vault` is a single-owner object: session validation performs a
/// read-modify-write on the session record and therefore takes `&mut self`.
/// The type is deliberately not `Clone`.
pub struct Vault {
    resolver: EndpointResolver,
    client_id: ClientId,
    username: Option<String>,
    password: Option<String>,
    session: VaultSession,
    log_api_errors: bool,
    transport: Arc<dyn Transport>,
}

impl Vault {
    pub(crate) fn new(
        resolver: EndpointResolver,
        client_id: ClientId,
        username: Option<String>,
        password: Option<String>,
        session: VaultSession,
        log_api_errors: bool,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            resolver,
            client_id,
            username,
            password,
            session,
            log_api_errors,
            transport,
        }
    }

    /// Returns the tenant host this client is bound to.
    pub fn tenant_host(&self) -> &TenantHost {
        self.resolver.tenant_host()
    }

    /// Returns the API version this client resolves endpoints against.
    pub fn api_version(&self) -> &ApiVersion {
        self.resolver.api_version()
    }

    /// Returns the endpoint resolver.
    pub fn resolver(&self) -> &EndpointResolver {
        &self.resolver
    }

    /// Returns the client identity.
    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Replace the client identity.
    pub fn set_client_id(&mut self, client_id: ClientId) {
        self.client_id = client_id;
    }

    /// Returns the username the basic flow logged in with, if that flow
    /// was used.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns the active session record.
    pub fn session(&self) -> &VaultSession {
        &self.session
    }

    /// True iff the session record holds a non-empty session id.
    pub fn has_session(&self) -> bool {
        self.session.has_session()
    }

    /// Whether server-reported failures are logged at `warn` level.
    pub fn log_api_errors(&self) -> bool {
        self.log_api_errors
    }

    /// Toggle logging of server-reported failures.
    pub fn set_log_api_errors(&mut self, enabled: bool) {
        self.log_api_errors = enabled;
    }

    /// Produce a fresh request helper bound to this client's host, version,
    /// and current session id.
    ///
    /// Refuses whenever the held [`ClientId`] is invalid, before considering
    /// the requested capability: every outbound call must carry the rendered
    /// identity in the tracking header. The refusal is an ordinary
    /// [`ConfigError`], observable and non-fatal.
    pub fn new_request<R: ApiRequest>(&self) -> Result<R> {
        let tracking_id = self.client_id.rendered().ok_or_else(|| {
            ConfigError::InvalidClientId {
                missing: self.client_id.missing_fields(),
            }
        })?;

        Ok(R::bind(RequestContext::new(
            self.resolver.clone(),
            tracking_id,
            self.session.session_id.clone(),
            Arc::clone(&self.transport),
        )))
    }

    /// Re-verify the session against the server.
    ///
    /// Issues the version-listing call with the current session id, copies
    /// the response's status, message, errors, headers, and responding user
    /// id onto the session record, then compares the server-reported URL for
    /// the configured API version against the locally resolved endpoint by
    /// exact string equality.
    ///
    /// Returns `Ok(true)` and leaves the session id untouched when they
    /// match. A mismatch, an absent version entry, or a failed version call
    /// downgrades the session - id cleared, status forced to failure - and
    /// returns `Ok(false)`. Transport failures propagate as `Err` and leave
    /// the session record unchanged.
    #[instrument(skip(self), fields(tenant = %self.resolver.tenant_host()))]
    pub async fn validate_session(&mut self) -> Result<bool> {
        debug!("validating session against the version listing");

        let output = self.new_request::<ApiVersionsRequest>()?.send().await?;

        self.session.status = output.status;
        self.session.message = output.message;
        self.session.errors = output.errors;
        self.session.headers = output.headers;
        if output.user_id.is_some() {
            self.session.user_id = output.user_id;
        }

        let expected = self.resolver.api_endpoint("", true);
        let reported = output.versions.get(self.resolver.api_version().as_str());
        let confirmed = self.session.status == ResponseStatus::Success
            && reported.is_some_and(|url| url == &expected);

        if confirmed {
            info!("session confirmed valid");
            Ok(true)
        } else {
            if self.log_api_errors {
                warn!(
                    expected = %expected,
                    reported = ?reported,
                    "session validation failed; clearing session"
                );
            }
            self.session.downgrade();
            Ok(false)
        }
    }

    /// Refresh the session's inactivity window.
    pub async fn keep_alive(&self) -> Result<KeepAliveOutput> {
        let output = self.new_request::<KeepAliveRequest>()?.send().await?;
        if self.log_api_errors && output.status == ResponseStatus::Failure {
            warn!(message = output.message.as_deref(), "keep-alive rejected");
        }
        Ok(output)
    }
}

// Hide the retained password; the session id redacts itself.
impl fmt::Debug for Vault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vault")
            .field("tenant_host", self.resolver.tenant_host())
            .field("api_version", self.resolver.api_version())
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("has_session", &self.has_session())
            .finish()
    }
}
