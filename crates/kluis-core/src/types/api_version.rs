//! API version type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, Error};

/// A validated API version label of the form `v<major>.<minor>`,
/// e.g. `v22.3`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiVersion(String);

/// The version used when a caller does not override it.
const DEFAULT_VERSION: &str = "v25.1";

impl ApiVersion {
    /// Create a new API version from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error unless the value is `v` followed by two
    /// dot-separated numbers.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();

        let valid = s
            .strip_prefix('v')
            .and_then(|rest| rest.split_once('.'))
            .is_some_and(|(major, minor)| {
                !major.is_empty()
                    && !minor.is_empty()
                    && major.chars().all(|c| c.is_ascii_digit())
                    && minor.chars().all(|c| c.is_ascii_digit())
            });

        if !valid {
            return Err(ConfigError::InvalidApiVersion {
                value: s.to_string(),
                reason: "expected the form v<major>.<minor>".to_string(),
            }
            .into());
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the version label as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self(DEFAULT_VERSION.to_string())
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiVersion::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ApiVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_version() {
        let version = ApiVersion::new("v22.3").unwrap();
        assert_eq!(version.as_str(), "v22.3");
    }

    #[test]
    fn default_version_is_valid() {
        let version = ApiVersion::default();
        assert!(ApiVersion::new(version.as_str()).is_ok());
    }

    #[test]
    fn rejects_missing_prefix() {
        assert!(ApiVersion::new("22.3").is_err());
    }

    #[test]
    fn rejects_missing_minor() {
        assert!(ApiVersion::new("v22").is_err());
        assert!(ApiVersion::new("v22.").is_err());
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(ApiVersion::new("vX.Y").is_err());
    }
}
