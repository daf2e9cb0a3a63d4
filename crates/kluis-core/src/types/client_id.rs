//! Client identity for API usage tracking.

use serde::{Deserialize, Serialize};

/// The identity of the calling integration.
///
/// Every outbound call carries a rendered client identity so the server's
/// usage log can attribute traffic to a specific integration. An identity
/// is *valid* only when all five fields are populated; the role flag must
/// be assigned explicitly rather than left at its default.
///
/// Invalidity is a boolean signal consumed by callers, never an error:
/// [`is_valid`](ClientId::is_valid) reports it and
/// [`missing_fields`](ClientId::missing_fields) names the gaps.
///
/// # Example
///
/// ```
/// use kluis_core::ClientId;
///
/// let id = ClientId::new("verteo", "clinical", "submissions", true, "site-loader");
/// assert!(id.is_valid());
/// assert_eq!(
///     id.rendered().unwrap(),
///     "verteo-clinical-submissions-client-site-loader"
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientId {
    company: Option<String>,
    organization: Option<String>,
    component_team: Option<String>,
    is_client: Option<bool>,
    program_name: Option<String>,
}

impl ClientId {
    /// Create a fully-populated identity.
    pub fn new(
        company: impl Into<String>,
        organization: impl Into<String>,
        component_team: impl Into<String>,
        is_client: bool,
        program_name: impl Into<String>,
    ) -> Self {
        Self {
            company: Some(company.into()),
            organization: Some(organization.into()),
            component_team: Some(component_team.into()),
            is_client: Some(is_client),
            program_name: Some(program_name.into()),
        }
    }

    /// Set the company name, returning the identity for chaining.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Set the organization name, returning the identity for chaining.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Set the component team, returning the identity for chaining.
    pub fn with_component_team(mut self, component_team: impl Into<String>) -> Self {
        self.component_team = Some(component_team.into());
        self
    }

    /// Set the client/server role flag, returning the identity for chaining.
    pub fn with_is_client(mut self, is_client: bool) -> Self {
        self.is_client = Some(is_client);
        self
    }

    /// Set the program name, returning the identity for chaining.
    pub fn with_program_name(mut self, program_name: impl Into<String>) -> Self {
        self.program_name = Some(program_name.into());
        self
    }

    /// Returns the company name, if set.
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    /// Returns the organization name, if set.
    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// Returns the component team, if set.
    pub fn component_team(&self) -> Option<&str> {
        self.component_team.as_deref()
    }

    /// Returns the role flag, if set.
    pub fn is_client(&self) -> Option<bool> {
        self.is_client
    }

    /// Returns the program name, if set.
    pub fn program_name(&self) -> Option<&str> {
        self.program_name.as_deref()
    }

    /// True iff every field is populated and non-empty.
    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Names the fields that are unset or empty, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        fn populated(value: &Option<String>) -> bool {
            value.as_deref().is_some_and(|v| !v.is_empty())
        }

        let mut missing = Vec::new();
        if !populated(&self.company) {
            missing.push("company");
        }
        if !populated(&self.organization) {
            missing.push("organization");
        }
        if !populated(&self.component_team) {
            missing.push("componentTeam");
        }
        if self.is_client.is_none() {
            missing.push("isClient");
        }
        if !populated(&self.program_name) {
            missing.push("programName");
        }
        missing
    }

    /// Renders the identity as the tracking string
    /// `company-organization-componentTeam-{client|server}-programName`,
    /// or `None` if the identity is not valid.
    pub fn rendered(&self) -> Option<String> {
        if !self.is_valid() {
            return None;
        }
        let role = if self.is_client? { "client" } else { "server" };
        Some(format!(
            "{}-{}-{}-{}-{}",
            self.company.as_deref()?,
            self.organization.as_deref()?,
            self.component_team.as_deref()?,
            role,
            self.program_name.as_deref()?,
        ))
    }
}
