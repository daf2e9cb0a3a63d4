//! kluis - Authentication and session management for multi-tenant Vault REST APIs.
//!
//! This library negotiates one of four credential schemes against a Vault
//! tenant, produces a verified [`Vault`] session handle, and resolves all
//! subsequent API calls to fully-qualified endpoint URLs relative to the
//! tenant host and API version.
//!
//! Validation and I/O are distinct phases: [`AuthBuilder::validate`] performs
//! pure required-field checking and produces a typed [`Login`];
//! [`Login::negotiate`] performs the flow's remote call(s). The convenience
//! entry point [`AuthBuilder::authenticate`] chains the two.
//!
//! # Example
//!
//! ```no_run
//! use kluis::{AuthBuilder, AuthType, ClientId};
//!
//! # async fn example() -> kluis::Result<()> {
//! let vault = AuthBuilder::new(AuthType::Basic)
//!     .tenant_host("myvault.veevavault.com")
//!     .client_id(ClientId::new("verteo", "clinical", "submissions", true, "site-loader"))
//!     .username("integration.user@verteo.com")
//!     .password("app-password")
//!     .authenticate()
//!     .await?;
//!
//! if vault.has_session() {
//!     println!("authenticated as user {:?}", vault.session().user_id);
//! } else {
//!     println!("rejected: {:?}", vault.session().message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod endpoint;
pub mod request;
pub mod transport;
pub mod vault;

pub(crate) mod wire;

pub use auth::{AuthBuilder, Credentials, DiscoveryOutcome, Login, discover_auth_type};
pub use endpoint::EndpointResolver;
pub use request::{
    ApiRequest, ApiVersionsOutput, ApiVersionsRequest, KeepAliveOutput, KeepAliveRequest,
};
pub use transport::HttpTransport;
pub use vault::Vault;

// Re-export the core data model at the crate root for convenience.
pub use kluis_core::{
    ApiError, ApiVersion, AuthType, ClientId, ConfigError, Error, Method, ProtocolError,
    ResponseStatus, SessionId, Tenant, TenantHost, Transport, TransportError, TransportRequest,
    TransportResponse, VaultSession,
};

/// Result type alias using the crate's Error type.
pub type Result<T> = kluis_core::Result<T>;
