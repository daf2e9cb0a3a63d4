//! Tenant host type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{ConfigError, Error};

/// A validated tenant host: the DNS name identifying a customer instance
/// of the remote service.
///
/// The host is stored in `tenant.example.com` form - no scheme, no path,
/// no port - and is lowercased on construction. URL building is the
/// endpoint resolver's job; this type only guarantees the host is sound.
///
/// # Example
///
/// ```
/// use kluis_core::TenantHost;
///
/// let host = TenantHost::new("MyVault.VeevaVault.com").unwrap();
/// assert_eq!(host.as_str(), "myvault.veevavault.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TenantHost(String);

impl TenantHost {
    /// Create a new tenant host from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty, carries a scheme, path,
    /// query, or port, or is not a parseable DNS name.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref().trim();

        if s.is_empty() {
            return Err(Self::invalid(s, "must not be empty"));
        }
        if s.contains("://") {
            return Err(Self::invalid(s, "must not include a scheme"));
        }
        if s.contains('/') {
            return Err(Self::invalid(s, "must not include a path"));
        }

        let lowered = s.to_ascii_lowercase();
        let url = Url::parse(&format!("https://{lowered}"))
            .map_err(|e| Self::invalid(s, &e.to_string()))?;

        // A port, query, or userinfo makes host_str diverge from the input.
        if url.host_str() != Some(lowered.as_str()) || url.port().is_some() {
            return Err(Self::invalid(s, "must be a bare DNS name"));
        }

        Ok(Self(lowered))
    }

    /// Returns the host as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn invalid(value: &str, reason: &str) -> Error {
        ConfigError::InvalidTenantHost {
            value: value.to_string(),
            reason: reason.to_string(),
        }
        .into()
    }
}

impl fmt::Display for TenantHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TenantHost {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for TenantHost {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TenantHost {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TenantHost::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for TenantHost {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_host() {
        let host = TenantHost::new("t.example.com").unwrap();
        assert_eq!(host.as_str(), "t.example.com");
    }

    #[test]
    fn lowercases_input() {
        let host = TenantHost::new("MyVault.Example.COM").unwrap();
        assert_eq!(host.as_str(), "myvault.example.com");
    }

    #[test]
    fn trims_whitespace() {
        let host = TenantHost::new("  t.example.com ").unwrap();
        assert_eq!(host.as_str(), "t.example.com");
    }

    #[test]
    fn rejects_empty() {
        assert!(TenantHost::new("").is_err());
    }

    #[test]
    fn rejects_scheme() {
        assert!(TenantHost::new("https://t.example.com").is_err());
    }

    #[test]
    fn rejects_path() {
        assert!(TenantHost::new("t.example.com/api").is_err());
    }

    #[test]
    fn rejects_port() {
        assert!(TenantHost::new("t.example.com:8443").is_err());
    }

    #[test]
    fn rejects_query() {
        assert!(TenantHost::new("t.example.com?x=1").is_err());
    }

    #[test]
    fn serde_round_trips_as_plain_string() {
        let host: TenantHost = serde_json::from_str("\"t.example.com\"").unwrap();
        assert_eq!(serde_json::to_string(&host).unwrap(), "\"t.example.com\"");
    }
}
