//! Flow negotiation: the I/O half of authentication.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument, warn};

use kluis_core::{
    ApiVersion, AuthType, ClientId, ConfigError, ResponseStatus, Result, SessionId, TenantHost,
    Transport, TransportRequest, VaultSession,
};

use crate::endpoint::EndpointResolver;
use crate::vault::Vault;
use crate::wire::{
    self, BasicLoginRequest, DiscoveryLoginRequest, LoginResponse, OauthTokenRequest,
};

/// Typed credential set: one variant per authentication flow, fully
/// populated by [`AuthBuilder::validate`](crate::AuthBuilder::validate).
pub enum Credentials {
    /// Vault username and password, exchanged at the discovery service.
    Basic { username: String, password: String },
    /// IDP-issued access token exchanged at the tenant's token endpoint.
    OauthToken {
        profile_id: String,
        access_token: String,
        scope: String,
        client_id: Option<String>,
    },
    /// Vault username and IDP password exchanged at the tenant's
    /// discovery endpoint.
    OauthDiscovery {
        username: String,
        idp_password: String,
        scope: String,
        idp_username: Option<String>,
        client_id: Option<String>,
    },
    /// An existing session id adopted without a login call.
    Existing { session_id: SessionId },
}

impl Credentials {
    /// The flow this credential set belongs to.
    pub fn auth_type(&self) -> AuthType {
        match self {
            Credentials::Basic { .. } => AuthType::Basic,
            Credentials::OauthToken { .. } => AuthType::OauthAccessToken,
            Credentials::OauthDiscovery { .. } => AuthType::OauthDiscovery,
            Credentials::Existing { .. } => AuthType::SessionId,
        }
    }
}

// Hide secret material per variant in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Credentials::OauthToken {
                profile_id,
                scope,
                client_id,
                ..
            } => f
                .debug_struct("OauthToken")
                .field("profile_id", profile_id)
                .field("access_token", &"[REDACTED]")
                .field("scope", scope)
                .field("client_id", client_id)
                .finish(),
            Credentials::OauthDiscovery {
                username,
                scope,
                idp_username,
                client_id,
                ..
            } => f
                .debug_struct("OauthDiscovery")
                .field("username", username)
                .field("idp_password", &"[REDACTED]")
                .field("scope", scope)
                .field("idp_username", idp_username)
                .field("client_id", client_id)
                .finish(),
            Credentials::Existing { .. } => f
                .debug_struct("Existing")
                .field("session_id", &"[REDACTED]")
                .finish(),
        }
    }
}

/// A validated, fully-populated login: the output of
/// [`AuthBuilder::validate`](crate::AuthBuilder::validate) and the input to
/// negotiation. No I/O has happened when a `Login` exists.
#[derive(Debug)]
pub struct Login {
    tenant_host: TenantHost,
    api_version: ApiVersion,
    client_id: ClientId,
    credentials: Credentials,
    validate_session: bool,
    timeout: Option<Duration>,
    log_api_errors: bool,
}

impl Login {
    pub(crate) fn new(
        tenant_host: TenantHost,
        api_version: ApiVersion,
        client_id: ClientId,
        credentials: Credentials,
        validate_session: bool,
        timeout: Option<Duration>,
        log_api_errors: bool,
    ) -> Self {
        Self {
            tenant_host,
            api_version,
            client_id,
            credentials,
            validate_session,
            timeout,
            log_api_errors,
        }
    }

    /// The flow this login will negotiate.
    pub fn auth_type(&self) -> AuthType {
        self.credentials.auth_type()
    }

    /// The tenant host the login is bound to.
    pub fn tenant_host(&self) -> &TenantHost {
        &self.tenant_host
    }

    /// The API version endpoints will resolve against.
    pub fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// The validated credential set.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The transport timeout override, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Negotiate the flow over the given transport and return a ready
    /// [`Vault`].
    ///
    /// A remote rejection is not an `Err`: the returned client holds a
    /// session with the server's status and message and no session id.
    /// When validate-after-build was requested, any flow that produced a
    /// session is re-verified before the client is returned.
    #[instrument(
        skip(self, transport),
        fields(tenant = %self.tenant_host, auth_type = %self.credentials.auth_type())
    )]
    pub async fn negotiate(self, transport: Arc<dyn Transport>) -> Result<Vault> {
        info!("negotiating authentication");

        let resolver = EndpointResolver::new(self.tenant_host, self.api_version);
        let tracking_id = self.client_id.rendered().ok_or_else(|| {
            ConfigError::InvalidClientId {
                missing: self.client_id.missing_fields(),
            }
        })?;

        let (session, username, password) = match self.credentials {
            Credentials::Basic { username, password } => {
                let body = BasicLoginRequest {
                    username: &username,
                    password: &password,
                    tenant_host: resolver.tenant_host().as_str(),
                };
                let url = EndpointResolver::login_endpoint(wire::BASIC_LOGIN_PATH);
                let session =
                    post_login(&*transport, &tracking_id, url, &body, self.log_api_errors).await?;
                (session, Some(username), Some(password))
            }
            Credentials::OauthToken {
                profile_id,
                access_token,
                scope,
                client_id,
            } => {
                let body = OauthTokenRequest {
                    profile_id: &profile_id,
                    access_token: &access_token,
                    scope: &scope,
                    client_id: client_id.as_deref(),
                };
                let url = resolver.api_endpoint(wire::OAUTH_TOKEN_PATH, true);
                let session =
                    post_login(&*transport, &tracking_id, url, &body, self.log_api_errors).await?;
                (session, None, None)
            }
            Credentials::OauthDiscovery {
                username,
                idp_password,
                scope,
                idp_username,
                client_id,
            } => {
                let body = DiscoveryLoginRequest {
                    username: &username,
                    password: &idp_password,
                    scope: &scope,
                    idp_username: idp_username.as_deref(),
                    client_id: client_id.as_deref(),
                };
                let url = resolver.api_endpoint(wire::OAUTH_DISCOVERY_PATH, true);
                let session =
                    post_login(&*transport, &tracking_id, url, &body, self.log_api_errors).await?;
                (session, None, None)
            }
            Credentials::Existing { session_id } => {
                (VaultSession::from_existing(session_id), None, None)
            }
        };

        let mut vault = Vault::new(
            resolver,
            self.client_id,
            username,
            password,
            session,
            self.log_api_errors,
            transport,
        );

        if self.validate_session && vault.has_session() {
            vault.validate_session().await?;
        }

        Ok(vault)
    }
}

/// Post one login body and fold the response into a session record.
async fn post_login<B: Serialize>(
    transport: &dyn Transport,
    tracking_id: &str,
    url: String,
    body: &B,
    log_api_errors: bool,
) -> Result<VaultSession> {
    let payload = serde_json::to_vec(body).expect("login body serializes");
    let request = TransportRequest::post(url)
        .header(wire::HEADER_ACCEPT, wire::APPLICATION_JSON)
        .header(wire::HEADER_CONTENT_TYPE, wire::APPLICATION_JSON)
        .header(wire::HEADER_CLIENT_ID, tracking_id)
        .body(payload);

    let response = transport.send(request).await?;
    let headers = response.headers.clone();

    match wire::decode_body::<LoginResponse>(&response)? {
        Some(decoded) => {
            let session = decoded.into_session(headers);
            if log_api_errors && session.status == ResponseStatus::Failure {
                warn!(
                    message = session.message.as_deref(),
                    "login rejected by server"
                );
            }
            Ok(session)
        }
        None => {
            if log_api_errors {
                warn!(status = response.status, "login call failed");
            }
            Ok(VaultSession {
                status: ResponseStatus::Failure,
                message: Some(wire::http_failure_message(response.status)),
                headers,
                ..VaultSession::default()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_redacts_secrets() {
        let basic = Credentials::Basic {
            username: "user".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{:?}", basic);
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));

        let token = Credentials::OauthToken {
            profile_id: "profile".to_string(),
            access_token: "tok-abc".to_string(),
            scope: "openid".to_string(),
            client_id: None,
        };
        let debug = format!("{:?}", token);
        assert!(!debug.contains("tok-abc"));

        let existing = Credentials::Existing {
            session_id: SessionId::new("abc123"),
        };
        let debug = format!("{:?}", existing);
        assert!(!debug.contains("abc123"));
    }

    #[test]
    fn credentials_report_their_auth_type() {
        let existing = Credentials::Existing {
            session_id: SessionId::new("abc123"),
        };
        assert_eq!(existing.auth_type(), AuthType::SessionId);
    }
}
