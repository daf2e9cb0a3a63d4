//! Authentication negotiation.
//!
//! Validation and I/O are distinct phases. [`AuthBuilder::validate`] is pure:
//! it checks the required fields for the chosen
//! [`AuthType`](crate::AuthType) and produces a typed [`Login`], or a
//! configuration error naming exactly what is missing - before any HTTP
//! call is attempted. [`Login::negotiate`] then issues the flow's remote
//! call(s) and hands back a ready [`Vault`](crate::Vault).

mod builder;
mod discovery;
mod login;

pub use builder::{AuthBuilder, DEFAULT_OAUTH_SCOPE};
pub use discovery::{DiscoveryOutcome, discover_auth_type};
pub use login::{Credentials, Login};
