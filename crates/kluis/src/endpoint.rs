//! Endpoint resolution.
//!
//! Pure URL construction: a tenant host, an API version, and a path or URL
//! fragment in; one canonical absolute URL out. The resolver never touches
//! the network, which is what makes the server-URL normalization used for
//! pagination links and hypermedia `href`s testable in isolation.

use kluis_core::{ApiVersion, TenantHost};

/// The well-known discovery-service origin. Login-endpoint URLs are built
/// against this host, never against a tenant host.
pub const DISCOVERY_ORIGIN: &str = "https://login.vaultcloud.com";

/// Resolves endpoint fragments against a tenant host and API version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointResolver {
    host: TenantHost,
    version: ApiVersion,
}

impl EndpointResolver {
    /// Create a resolver for the given tenant host and API version.
    pub fn new(host: TenantHost, version: ApiVersion) -> Self {
        Self { host, version }
    }

    /// Returns the tenant host.
    pub fn tenant_host(&self) -> &TenantHost {
        &self.host
    }

    /// Returns the API version.
    pub fn api_version(&self) -> &ApiVersion {
        &self.version
    }

    /// The tenant's root URL: `https://` plus the host.
    pub fn root_url(&self) -> String {
        format!("https://{}", self.host)
    }

    /// Builds an API endpoint URL from a fragment.
    ///
    /// The fragment is appended verbatim: no separator is inserted beyond
    /// the fixed `/api/` prefix and, when `include_version` is set, the
    /// version label. Callers supply the leading slash when they want one.
    pub fn api_endpoint(&self, fragment: &str, include_version: bool) -> String {
        if include_version {
            format!("{}/api/{}{}", self.root_url(), self.version, fragment)
        } else {
            format!("{}/api/{}", self.root_url(), fragment)
        }
    }

    /// The unversioned version-listing URL, `https://{host}/api`.
    pub fn version_list_url(&self) -> String {
        format!("{}/api", self.root_url())
    }

    /// Builds a login URL against the well-known discovery service.
    pub fn login_endpoint(fragment: &str) -> String {
        format!("{DISCOVERY_ORIGIN}{fragment}")
    }

    /// Normalizes a URL or path returned by the server itself into an
    /// absolute endpoint URL.
    ///
    /// Classification order matters: a version-prefixed path must be
    /// recognized before the generic `/api/` prefix, or the version segment
    /// would be duplicated.
    pub fn resolve_server_url(&self, url_or_path: &str) -> String {
        if url_or_path.starts_with(&self.root_url()) {
            return url_or_path.to_string();
        }
        let versioned_prefix = format!("/api/{}", self.version);
        if let Some(rest) = url_or_path.strip_prefix(&versioned_prefix) {
            return self.api_endpoint(rest, true);
        }
        if let Some(rest) = url_or_path.strip_prefix("/api/") {
            return self.api_endpoint(rest, false);
        }
        self.api_endpoint(url_or_path, true)
    }
}
