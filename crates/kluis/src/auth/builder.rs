//! Authentication parameter builder and validation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use kluis_core::{
    ApiVersion, AuthType, ClientId, ConfigError, Result, SessionId, TenantHost, Transport,
};

use crate::transport::HttpTransport;
use crate::vault::Vault;

use super::login::{Credentials, Login};

/// The OAuth scope requested when a caller does not override it.
pub const DEFAULT_OAUTH_SCOPE: &str = "openid";

/// Collects authentication parameters for the four flows.
///
/// The builder is a plain parameter sink: it performs no validation and no
/// I/O until [`validate`](AuthBuilder::validate) or one of the
/// `authenticate` entry points is called. Only the fields relevant to the
/// chosen [`AuthType`] are required; the rest are ignored.
///
/// # Example
///
/// ```no_run
/// use kluis::{AuthBuilder, AuthType, ClientId};
///
/// # async fn example() -> kluis::Result<()> {
/// let vault = AuthBuilder::new(AuthType::SessionId)
///     .tenant_host("t.example.com")
///     .client_id(ClientId::new("verteo", "clinical", "submissions", true, "loader"))
///     .session_id("abc123")
///     .validate_session(true)
///     .authenticate()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct AuthBuilder {
    auth_type: AuthType,
    tenant_host: Option<String>,
    client_id: Option<ClientId>,
    username: Option<String>,
    password: Option<String>,
    session_id: Option<String>,
    oauth_access_token: Option<String>,
    oauth_profile_id: Option<String>,
    oauth_client_id: Option<String>,
    oauth_scope: Option<String>,
    idp_username: Option<String>,
    idp_password: Option<String>,
    validate_session: bool,
    timeout: Option<Duration>,
    api_version: Option<ApiVersion>,
    log_api_errors: bool,
}

impl AuthBuilder {
    /// Start a builder for the given authentication type.
    pub fn new(auth_type: AuthType) -> Self {
        Self {
            auth_type,
            tenant_host: None,
            client_id: None,
            username: None,
            password: None,
            session_id: None,
            oauth_access_token: None,
            oauth_profile_id: None,
            oauth_client_id: None,
            oauth_scope: None,
            idp_username: None,
            idp_password: None,
            validate_session: false,
            timeout: None,
            api_version: None,
            log_api_errors: true,
        }
    }

    /// The tenant host, in `tenant.example.com` form.
    pub fn tenant_host(mut self, host: impl Into<String>) -> Self {
        self.tenant_host = Some(host.into());
        self
    }

    /// The calling integration's identity. Required for every flow.
    pub fn client_id(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Vault username (basic and discovery flows).
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Vault password (basic flow).
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// An existing session id (session-id flow).
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// IDP-issued access token (access-token flow).
    pub fn oauth_access_token(mut self, token: impl Into<String>) -> Self {
        self.oauth_access_token = Some(token.into());
        self
    }

    /// OAuth profile id (access-token flow).
    pub fn oauth_profile_id(mut self, profile_id: impl Into<String>) -> Self {
        self.oauth_profile_id = Some(profile_id.into());
        self
    }

    /// Optional OAuth client id forwarded to the identity provider.
    pub fn oauth_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.oauth_client_id = Some(client_id.into());
        self
    }

    /// OAuth scope; defaults to `openid` when unset.
    pub fn oauth_scope(mut self, scope: impl Into<String>) -> Self {
        self.oauth_scope = Some(scope.into());
        self
    }

    /// Distinct IDP username for the discovery flow, when it differs from
    /// the Vault username.
    pub fn idp_username(mut self, username: impl Into<String>) -> Self {
        self.idp_username = Some(username.into());
        self
    }

    /// IDP password (discovery flow).
    pub fn idp_password(mut self, password: impl Into<String>) -> Self {
        self.idp_password = Some(password.into());
        self
    }

    /// Re-verify the session against the server immediately after
    /// negotiation. Off by default.
    pub fn validate_session(mut self, validate: bool) -> Self {
        self.validate_session = validate;
        self
    }

    /// Request timeout for the default transport. The timeout is fixed at
    /// transport construction; it is ignored by
    /// [`authenticate_with`](AuthBuilder::authenticate_with), where the
    /// caller owns the transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// API version to resolve endpoints against. Defaults to the crate's
    /// current version.
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Whether server-reported failures are logged at `warn` level.
    /// On by default.
    pub fn log_api_errors(mut self, enabled: bool) -> Self {
        self.log_api_errors = enabled;
        self
    }

    /// Validate the required fields for the chosen flow.
    ///
    /// Pure: no I/O happens here. Each missing required field yields its
    /// own distinct [`ConfigError`]; an invalid client identity fails
    /// regardless of flow.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](crate::ConfigError) naming the first
    /// missing or invalid field.
    pub fn validate(self) -> Result<Login> {
        let host = required(self.tenant_host, ConfigError::MissingTenantHost)?;
        let tenant_host = TenantHost::new(&host)?;

        let client_id = self.client_id.ok_or(ConfigError::MissingClientId)?;
        if !client_id.is_valid() {
            return Err(ConfigError::InvalidClientId {
                missing: client_id.missing_fields(),
            }
            .into());
        }

        let scope = self
            .oauth_scope
            .unwrap_or_else(|| DEFAULT_OAUTH_SCOPE.to_string());

        let credentials = match self.auth_type {
            AuthType::Basic => Credentials::Basic {
                username: required(self.username, ConfigError::MissingUsername)?,
                password: required(self.password, ConfigError::MissingPassword)?,
            },
            AuthType::OauthAccessToken => Credentials::OauthToken {
                profile_id: required(self.oauth_profile_id, ConfigError::MissingOauthProfileId)?,
                access_token: required(
                    self.oauth_access_token,
                    ConfigError::MissingOauthAccessToken,
                )?,
                scope,
                client_id: self.oauth_client_id,
            },
            AuthType::OauthDiscovery => Credentials::OauthDiscovery {
                username: required(self.username, ConfigError::MissingUsername)?,
                idp_password: required(self.idp_password, ConfigError::MissingIdpPassword)?,
                scope,
                idp_username: self.idp_username,
                client_id: self.oauth_client_id,
            },
            AuthType::SessionId => Credentials::Existing {
                session_id: SessionId::new(required(
                    self.session_id,
                    ConfigError::MissingSessionId,
                )?),
            },
        };

        Ok(Login::new(
            tenant_host,
            self.api_version.unwrap_or_default(),
            client_id,
            credentials,
            self.validate_session,
            self.timeout,
            self.log_api_errors,
        ))
    }

    /// Validate, construct the default [`HttpTransport`] (honoring the
    /// timeout override), and negotiate.
    pub async fn authenticate(self) -> Result<Vault> {
        let timeout = self.timeout;
        let login = self.validate()?;
        let transport: Arc<dyn Transport> = match timeout {
            Some(timeout) => Arc::new(HttpTransport::with_timeout(timeout)),
            None => Arc::new(HttpTransport::new()),
        };
        login.negotiate(transport).await
    }

    /// Validate and negotiate over a caller-owned transport.
    pub async fn authenticate_with(self, transport: Arc<dyn Transport>) -> Result<Vault> {
        self.validate()?.negotiate(transport).await
    }
}

fn required(value: Option<String>, missing: ConfigError) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(missing.into()),
    }
}

// Hide credential material in Debug output
impl fmt::Debug for AuthBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthBuilder")
            .field("auth_type", &self.auth_type)
            .field("tenant_host", &self.tenant_host)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("session_id", &self.session_id.as_ref().map(|_| "[REDACTED]"))
            .field(
                "oauth_access_token",
                &self.oauth_access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("oauth_profile_id", &self.oauth_profile_id)
            .field("oauth_client_id", &self.oauth_client_id)
            .field("oauth_scope", &self.oauth_scope)
            .field("idp_username", &self.idp_username)
            .field(
                "idp_password",
                &self.idp_password.as_ref().map(|_| "[REDACTED]"),
            )
            .field("validate_session", &self.validate_session)
            .field("timeout", &self.timeout)
            .field("api_version", &self.api_version)
            .field("log_api_errors", &self.log_api_errors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kluis_core::Error;

    fn valid_client_id() -> ClientId {
        ClientId::new("verteo", "clinical", "submissions", true, "loader")
    }

    fn basic_builder() -> AuthBuilder {
        AuthBuilder::new(AuthType::Basic)
            .tenant_host("t.example.com")
            .client_id(valid_client_id())
            .username("user@example.com")
            .password("secret")
    }

    #[test]
    fn basic_validates_with_all_fields() {
        let login = basic_builder().validate().unwrap();
        assert_eq!(login.auth_type(), AuthType::Basic);
        assert_eq!(login.tenant_host().as_str(), "t.example.com");
    }

    #[test]
    fn missing_tenant_host() {
        let err = AuthBuilder::new(AuthType::Basic)
            .client_id(valid_client_id())
            .username("u")
            .password("p")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingTenantHost)
        ));
    }

    #[test]
    fn missing_client_id() {
        let err = AuthBuilder::new(AuthType::Basic)
            .tenant_host("t.example.com")
            .username("u")
            .password("p")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingClientId)));
    }

    #[test]
    fn invalid_client_id_names_missing_fields() {
        let err = AuthBuilder::new(AuthType::Basic)
            .tenant_host("t.example.com")
            .client_id(ClientId::default().with_company("verteo"))
            .username("u")
            .password("p")
            .validate()
            .unwrap_err();
        match err {
            Error::Config(ConfigError::InvalidClientId { missing }) => {
                assert!(missing.contains(&"organization"));
                assert!(missing.contains(&"isClient"));
            }
            other => panic!("expected InvalidClientId, got {other:?}"),
        }
    }

    #[test]
    fn missing_username() {
        let err = AuthBuilder::new(AuthType::Basic)
            .tenant_host("t.example.com")
            .client_id(valid_client_id())
            .password("p")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingUsername)));
    }

    #[test]
    fn missing_password() {
        let err = AuthBuilder::new(AuthType::Basic)
            .tenant_host("t.example.com")
            .client_id(valid_client_id())
            .username("u")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingPassword)));
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let err = basic_builder().password("").validate().unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingPassword)));
    }

    #[test]
    fn oauth_token_requires_profile_id_and_token() {
        let base = || {
            AuthBuilder::new(AuthType::OauthAccessToken)
                .tenant_host("t.example.com")
                .client_id(valid_client_id())
        };

        let err = base().oauth_access_token("tok").validate().unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingOauthProfileId)
        ));

        let err = base().oauth_profile_id("profile").validate().unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingOauthAccessToken)
        ));
    }

    #[test]
    fn oauth_scope_defaults_to_openid() {
        let login = AuthBuilder::new(AuthType::OauthAccessToken)
            .tenant_host("t.example.com")
            .client_id(valid_client_id())
            .oauth_profile_id("profile")
            .oauth_access_token("tok")
            .validate()
            .unwrap();
        match login.credentials() {
            Credentials::OauthToken { scope, .. } => assert_eq!(scope, DEFAULT_OAUTH_SCOPE),
            other => panic!("expected OauthToken, got {other:?}"),
        }
    }

    #[test]
    fn discovery_requires_idp_password() {
        let err = AuthBuilder::new(AuthType::OauthDiscovery)
            .tenant_host("t.example.com")
            .client_id(valid_client_id())
            .username("vault.user")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingIdpPassword)
        ));
    }

    #[test]
    fn session_id_flow_requires_session_id() {
        let err = AuthBuilder::new(AuthType::SessionId)
            .tenant_host("t.example.com")
            .client_id(valid_client_id())
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingSessionId)));
    }

    #[test]
    fn invalid_tenant_host_is_rejected() {
        let err = basic_builder()
            .tenant_host("https://t.example.com")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidTenantHost { .. })
        ));
    }

    #[test]
    fn api_version_defaults() {
        let login = basic_builder().validate().unwrap();
        assert_eq!(login.api_version(), &ApiVersion::default());
    }

    #[test]
    fn debug_hides_credential_material() {
        let debug = format!("{:?}", basic_builder().oauth_access_token("tok-123"));
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("tok-123"));
        assert!(debug.contains("[REDACTED]"));
    }
}
