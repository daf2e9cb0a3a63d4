//! Authentication type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, Error};

/// The four mutually exclusive authentication flows.
///
/// Each flow has its own required-field set and its own remote call
/// sequence; the chosen variant decides which fields the builder checks
/// and which login endpoint is called.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthType {
    /// Username/password login against the well-known discovery service.
    Basic,
    /// Exchange an IDP-issued access token for a session.
    OauthAccessToken,
    /// Discovery-based OAuth exchange using a Vault username and IDP password.
    OauthDiscovery,
    /// Adopt an existing session id without any login call.
    SessionId,
}

impl AuthType {
    /// Returns the wire name of the type, e.g. `OAUTH_ACCESS_TOKEN`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::Basic => "BASIC",
            AuthType::OauthAccessToken => "OAUTH_ACCESS_TOKEN",
            AuthType::OauthDiscovery => "OAUTH_DISCOVERY",
            AuthType::SessionId => "SESSION_ID",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BASIC" => Ok(AuthType::Basic),
            "OAUTH_ACCESS_TOKEN" => Ok(AuthType::OauthAccessToken),
            "OAUTH_DISCOVERY" => Ok(AuthType::OauthDiscovery),
            "SESSION_ID" => Ok(AuthType::SessionId),
            _ => Err(ConfigError::UnknownAuthType {
                value: s.to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        assert_eq!(
            "OAUTH_ACCESS_TOKEN".parse::<AuthType>().unwrap(),
            AuthType::OauthAccessToken
        );
        assert_eq!("BASIC".parse::<AuthType>().unwrap(), AuthType::Basic);
        assert!("NTLM".parse::<AuthType>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&AuthType::OauthDiscovery).unwrap(),
            "\"OAUTH_DISCOVERY\""
        );
        let parsed: AuthType = serde_json::from_str("\"SESSION_ID\"").unwrap();
        assert_eq!(parsed, AuthType::SessionId);
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(AuthType::SessionId.to_string(), "SESSION_ID");
    }
}
