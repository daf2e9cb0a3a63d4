//! kluis-core - Core types and the transport contract for the kluis Vault API client.
//!
//! This crate holds the data model shared by every kluis backend: validated
//! identifier types, the session record produced by authentication, the error
//! taxonomy, and the [`Transport`] trait the client speaks HTTP through.
//! It performs no I/O of its own.

pub mod error;
pub mod session;
pub mod transport;
pub mod types;

pub use error::{ConfigError, Error, ProtocolError, TransportError};
pub use session::{ApiError, ResponseStatus, Tenant, VaultSession};
pub use transport::{Method, Transport, TransportRequest, TransportResponse};
pub use types::{ApiVersion, AuthType, ClientId, SessionId, TenantHost};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
