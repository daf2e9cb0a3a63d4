//! Wire-level request/response types for the authentication API.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;

use kluis_core::{
    ApiError, AuthType, Error, ProtocolError, ResponseStatus, SessionId, Tenant,
    TransportResponse, VaultSession,
};

// ============================================================================
// Paths and headers
// ============================================================================

/// Basic login, relative to the discovery origin.
pub(crate) const BASIC_LOGIN_PATH: &str = "/auth";

/// Access-token exchange, relative to the versioned tenant API root.
pub(crate) const OAUTH_TOKEN_PATH: &str = "/auth/oauthtoken";

/// Discovery exchange, relative to the versioned tenant API root; also the
/// unauthenticated type-discovery path on the discovery origin.
pub(crate) const OAUTH_DISCOVERY_PATH: &str = "/auth/discovery";

/// Session keep-alive, relative to the versioned tenant API root.
pub(crate) const KEEP_ALIVE_PATH: &str = "/keep-alive";

pub(crate) const HEADER_ACCEPT: &str = "Accept";
pub(crate) const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub(crate) const HEADER_AUTHORIZATION: &str = "Authorization";
pub(crate) const HEADER_CLIENT_ID: &str = "X-Client-Id";
pub(crate) const APPLICATION_JSON: &str = "application/json";

// ============================================================================
// Request bodies
// ============================================================================

/// Body of the basic login call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BasicLoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub tenant_host: &'a str,
}

/// Body of the access-token exchange.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OauthTokenRequest<'a> {
    pub profile_id: &'a str,
    pub access_token: &'a str,
    pub scope: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<&'a str>,
}

/// Body of the discovery exchange. `username` is the Vault username;
/// `password` is the identity provider's.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DiscoveryLoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub scope: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idp_username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<&'a str>,
}

// ============================================================================
// Response bodies
// ============================================================================

/// Response shared by all three login calls.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    pub response_status: ResponseStatus,
    #[serde(default)]
    pub response_message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub vault_ids: Vec<Tenant>,
}

impl LoginResponse {
    /// Fold the response and its transport headers into a session record.
    /// A rejected login never carries a session id forward.
    pub(crate) fn into_session(self, headers: Vec<(String, String)>) -> VaultSession {
        let session_id = match self.response_status {
            ResponseStatus::Success => self
                .session_id
                .filter(|id| !id.is_empty())
                .map(SessionId::new),
            ResponseStatus::Failure => None,
        };
        VaultSession {
            session_id,
            user_id: self.user_id,
            status: self.response_status,
            message: self.response_message,
            errors: self.errors,
            tenants: self.vault_ids,
            headers,
        }
    }
}

/// Response of the version-listing call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiVersionsResponse {
    pub response_status: ResponseStatus,
    #[serde(default)]
    pub response_message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Version label to fully-qualified endpoint URL.
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

/// Response of the keep-alive call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct KeepAliveResponse {
    pub response_status: ResponseStatus,
    #[serde(default)]
    pub response_message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

/// Response of the unauthenticated type-discovery call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TypeDiscoveryResponse {
    pub response_status: ResponseStatus,
    #[serde(default)]
    pub response_message: Option<String>,
    #[serde(default)]
    pub auth_type: Option<AuthType>,
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode a JSON response body.
///
/// Returns `Ok(None)` for a non-success status with an undecodable body -
/// the caller maps that to a failed outcome carrying the HTTP status.
/// A success status with an undecodable body is a protocol error.
pub(crate) fn decode_body<T: DeserializeOwned>(
    response: &TransportResponse,
) -> Result<Option<T>, Error> {
    match serde_json::from_slice(&response.body) {
        Ok(value) => Ok(Some(value)),
        Err(err) if response.is_success() => {
            Err(ProtocolError::new(response.status, Some(err.to_string())).into())
        }
        Err(_) => Ok(None),
    }
}

/// The message recorded on an outcome when the body carried no decodable
/// status of its own.
pub(crate) fn http_failure_message(status: u16) -> String {
    format!("HTTP {status}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn oauth_token_request_omits_unset_client_id() {
        let body = OauthTokenRequest {
            profile_id: "profile-1",
            access_token: "token",
            scope: "openid",
            client_id: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({"profileId": "profile-1", "accessToken": "token", "scope": "openid"})
        );
    }

    #[test]
    fn discovery_request_carries_optional_fields_when_set() {
        let body = DiscoveryLoginRequest {
            username: "vault.user",
            password: "idp-secret",
            scope: "openid",
            idp_username: Some("idp.user"),
            client_id: Some("client-1"),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["idpUsername"], "idp.user");
        assert_eq!(value["clientId"], "client-1");
    }

    #[test]
    fn basic_request_uses_camel_case() {
        let body = BasicLoginRequest {
            username: "u",
            password: "p",
            tenant_host: "t.example.com",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["tenantHost"], "t.example.com");
    }

    #[test]
    fn rejected_login_never_carries_a_session_id() {
        let response: LoginResponse = serde_json::from_value(json!({
            "responseStatus": "FAILURE",
            "responseMessage": "bad credentials",
            "sessionId": "stale-id"
        }))
        .unwrap();
        let session = response.into_session(Vec::new());
        assert!(session.session_id.is_none());
        assert_eq!(session.status, ResponseStatus::Failure);
        assert_eq!(session.message.as_deref(), Some("bad credentials"));
    }

    #[test]
    fn successful_login_builds_session() {
        let response: LoginResponse = serde_json::from_value(json!({
            "responseStatus": "SUCCESS",
            "sessionId": "abc123",
            "userId": 12021,
            "vaultIds": [{"id": 1776, "name": "Verteo Clinical", "url": "https://t.example.com/api"}]
        }))
        .unwrap();
        let session = response.into_session(vec![("x-req".into(), "1".into())]);
        assert!(session.has_session());
        assert_eq!(session.user_id, Some(12021));
        assert_eq!(session.tenants.len(), 1);
        assert_eq!(session.tenants[0].id, 1776);
        assert_eq!(session.headers.len(), 1);
    }

    #[test]
    fn undecodable_success_body_is_a_protocol_error() {
        let response = TransportResponse {
            status: 200,
            headers: Vec::new(),
            body: b"<html>gateway</html>".to_vec(),
        };
        let result = decode_body::<LoginResponse>(&response);
        assert!(matches!(result, Err(Error::Protocol(_))));
    }

    #[test]
    fn undecodable_failure_body_is_data() {
        let response = TransportResponse {
            status: 502,
            headers: Vec::new(),
            body: b"Bad Gateway".to_vec(),
        };
        let decoded = decode_body::<LoginResponse>(&response).unwrap();
        assert!(decoded.is_none());
    }
}
