//! Core kluis types.
//!
//! These types enforce their invariants at construction time, so an
//! `ApiVersion` or `TenantHost` held by a client is always well-formed.

mod api_version;
mod auth_type;
mod client_id;
mod session_id;
mod tenant_host;

pub use api_version::ApiVersion;
pub use auth_type::AuthType;
pub use client_id::ClientId;
pub use session_id::SessionId;
pub use tenant_host::TenantHost;
