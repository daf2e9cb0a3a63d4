//! Error types for the kluis client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, configuration, and protocol failures. A login the server
//! refused, or a session it no longer recognizes, is not an error: those
//! outcomes surface as an inspectable [`VaultSession`](crate::VaultSession)
//! so the caller can examine the server's status and message and decide.

use std::fmt;
use thiserror::Error;

/// The unified error type for kluis operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration errors (missing or invalid required fields).
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Protocol errors (undecodable success responses).
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Transport-level errors.
///
/// Non-2xx statuses are not transport errors; the transport reports them as
/// ordinary responses and the client interprets them.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// TLS/SSL error.
    #[error("TLS error: {message}")]
    Tls { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Configuration errors, raised before any network call is made.
///
/// Each required field of an authentication flow has its own variant so a
/// caller (or its operator) can see exactly which setting is absent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No tenant host was supplied.
    #[error("tenant host is required")]
    MissingTenantHost,

    /// No client identity was supplied.
    #[error("client identity is required")]
    MissingClientId,

    /// No username was supplied.
    #[error("username is required")]
    MissingUsername,

    /// No password was supplied.
    #[error("password is required")]
    MissingPassword,

    /// No session id was supplied for the existing-session flow.
    #[error("session id is required")]
    MissingSessionId,

    /// No OAuth profile id was supplied for the access-token flow.
    #[error("OAuth profile id is required")]
    MissingOauthProfileId,

    /// No access token was supplied for the access-token flow.
    #[error("OAuth access token is required")]
    MissingOauthAccessToken,

    /// No identity-provider password was supplied for the discovery flow.
    #[error("IDP password is required")]
    MissingIdpPassword,

    /// The client identity is present but incomplete.
    #[error("client identity is incomplete: missing {}", missing.join(", "))]
    InvalidClientId { missing: Vec<&'static str> },

    /// The tenant host is not a bare DNS name.
    #[error("invalid tenant host '{value}': {reason}")]
    InvalidTenantHost { value: String, reason: String },

    /// The API version is not of the `v<major>.<minor>` form.
    #[error("invalid API version '{value}': {reason}")]
    InvalidApiVersion { value: String, reason: String },

    /// An unrecognized authentication type name.
    #[error("unknown authentication type '{value}'")]
    UnknownAuthType { value: String },
}

/// Protocol-level errors: the server reported success but the body could
/// not be decoded.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Description of what failed to decode.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }
}
