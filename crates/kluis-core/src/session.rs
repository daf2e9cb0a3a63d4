//! The session record produced by authentication negotiation.

use serde::Deserialize;

use crate::types::SessionId;

/// Outcome marker carried on every API response.
///
/// Unknown wire values deserialize as `Failure`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    /// The server accepted the call.
    Success,
    /// The server rejected the call, or the outcome is unknown.
    #[default]
    #[serde(other)]
    Failure,
}

/// A single error item reported by the server alongside a response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    /// The server's error category, e.g. `INVALID_SESSION_ID`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Human-readable description.
    #[serde(default)]
    pub message: Option<String>,
}

/// A tenant the authenticated user may access.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    /// The tenant's numeric id.
    pub id: i64,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// The tenant's API root URL.
    #[serde(default)]
    pub url: Option<String>,
}

/// The outcome of authentication negotiation, owned by the client for its
/// lifetime.
///
/// The record is mutated in place by session validation: a session whose
/// server-reported endpoint no longer matches the locally resolved one is
/// [`downgrade`](VaultSession::downgrade)d so later calls cannot silently
/// reuse its id.
#[derive(Clone, Debug, Default)]
pub struct VaultSession {
    /// The opaque session id, present only after a successful negotiation.
    pub session_id: Option<SessionId>,
    /// The authenticated user's id, as reported by the server.
    pub user_id: Option<i64>,
    /// Status of the most recent negotiation or validation response.
    pub status: ResponseStatus,
    /// The server's response message, if any.
    pub message: Option<String>,
    /// Error items reported by the server.
    pub errors: Vec<ApiError>,
    /// Tenants the user may access, reported by the basic login flow.
    pub tenants: Vec<Tenant>,
    /// Raw headers from the response that produced this record.
    pub headers: Vec<(String, String)>,
}

impl VaultSession {
    /// Adopt an existing session id, as the `SESSION_ID` flow does.
    pub fn from_existing(session_id: SessionId) -> Self {
        Self {
            session_id: Some(session_id),
            status: ResponseStatus::Success,
            ..Self::default()
        }
    }

    /// True iff a non-empty session id is held.
    pub fn has_session(&self) -> bool {
        self.session_id.as_ref().is_some_and(|id| !id.is_empty())
    }

    /// Invalidate the session: clear the id and force a failure status.
    pub fn downgrade(&mut self) {
        self.session_id = None;
        self.status = ResponseStatus::Failure;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_has_no_session() {
        let session = VaultSession::default();
        assert!(!session.has_session());
        assert_eq!(session.status, ResponseStatus::Failure);
    }

    #[test]
    fn empty_session_id_does_not_count() {
        let session = VaultSession::from_existing(SessionId::new(""));
        assert!(!session.has_session());
    }

    #[test]
    fn from_existing_holds_session() {
        let session = VaultSession::from_existing(SessionId::new("abc123"));
        assert!(session.has_session());
        assert_eq!(session.status, ResponseStatus::Success);
    }

    #[test]
    fn downgrade_clears_id_and_fails() {
        let mut session = VaultSession::from_existing(SessionId::new("abc123"));
        session.downgrade();
        assert!(session.session_id.is_none());
        assert_eq!(session.status, ResponseStatus::Failure);
        assert!(!session.has_session());
    }

    #[test]
    fn unknown_status_maps_to_failure() {
        let status: ResponseStatus = serde_json::from_str("\"EXCEPTION\"").unwrap();
        assert_eq!(status, ResponseStatus::Failure);
        let status: ResponseStatus = serde_json::from_str("\"SUCCESS\"").unwrap();
        assert_eq!(status, ResponseStatus::Success);
    }

    #[test]
    fn api_error_renames_type_field() {
        let error: ApiError =
            serde_json::from_str(r#"{"type": "INVALID_SESSION_ID", "message": "expired"}"#)
                .unwrap();
        assert_eq!(error.kind.as_deref(), Some("INVALID_SESSION_ID"));
        assert_eq!(error.message.as_deref(), Some("expired"));
    }
}
