use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for organizations known to the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrganizationId(pub String);

impl OrganizationId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed set of policy documents produced for every organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyId {
    MasterSecurityPolicy,
    RiskAssessment,
    AccessControl,
    IncidentResponse,
    BreachNotification,
    BusinessAssociate,
    WorkforceTraining,
    ContingencyPlan,
    NoticeOfPrivacyPractices,
}

impl PolicyId {
    pub const ALL: [PolicyId; 9] = [
        PolicyId::MasterSecurityPolicy,
        PolicyId::RiskAssessment,
        PolicyId::AccessControl,
        PolicyId::IncidentResponse,
        PolicyId::BreachNotification,
        PolicyId::BusinessAssociate,
        PolicyId::WorkforceTraining,
        PolicyId::ContingencyPlan,
        PolicyId::NoticeOfPrivacyPractices,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            PolicyId::MasterSecurityPolicy => "master-security-policy",
            PolicyId::RiskAssessment => "risk-assessment",
            PolicyId::AccessControl => "access-control",
            PolicyId::IncidentResponse => "incident-response",
            PolicyId::BreachNotification => "breach-notification",
            PolicyId::BusinessAssociate => "business-associate",
            PolicyId::WorkforceTraining => "workforce-training",
            PolicyId::ContingencyPlan => "contingency-plan",
            PolicyId::NoticeOfPrivacyPractices => "notice-of-privacy-practices",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            PolicyId::MasterSecurityPolicy => "Master Security Policy",
            PolicyId::RiskAssessment => "Security Risk Assessment Policy",
            PolicyId::AccessControl => "Access Control Policy",
            PolicyId::IncidentResponse => "Incident Response Plan",
            PolicyId::BreachNotification => "Breach Notification Policy",
            PolicyId::BusinessAssociate => "Business Associate Management Policy",
            PolicyId::WorkforceTraining => "Workforce Security Training Policy",
            PolicyId::ContingencyPlan => "Contingency and Disaster Recovery Plan",
            PolicyId::NoticeOfPrivacyPractices => "Notice of Privacy Practices",
        }
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a path segment or CLI flag does not name a known policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown policy id `{0}`")]
pub struct UnknownPolicy(pub String);

impl FromStr for PolicyId {
    type Err = UnknownPolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        PolicyId::ALL
            .into_iter()
            .find(|policy| policy.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownPolicy(wanted.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl Address {
    /// `street, city, state postal_code`, or `None` when nothing is on file.
    pub fn single_line(&self) -> Option<String> {
        let region = [self.state.trim(), self.postal_code.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let parts: Vec<&str> = [self.street.trim(), self.city.trim(), region.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    fn is_complete(&self) -> bool {
        [&self.street, &self.city, &self.state, &self.postal_code]
            .iter()
            .all(|part| !part.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl Contact {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            title: None,
        }
    }
}

/// HIPAA role of the organization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    #[default]
    CoveredEntity,
    BusinessAssociate,
    HybridEntity,
}

impl EntityType {
    pub const fn label(self) -> &'static str {
        match self {
            EntityType::CoveredEntity => "Covered Entity",
            EntityType::BusinessAssociate => "Business Associate",
            EntityType::HybridEntity => "Hybrid Entity",
        }
    }
}

/// Identity, contact, and legal facts about an organization. Read-only input
/// to document generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationData {
    pub id: OrganizationId,
    pub legal_name: String,
    #[serde(default)]
    pub dba_name: Option<String>,
    pub address: Address,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    pub ein: String,
    pub npi: String,
    #[serde(default)]
    pub license_numbers: Vec<String>,
    #[serde(default)]
    pub clia_number: Option<String>,
    #[serde(default)]
    pub performs_lab_tests: bool,
    #[serde(default)]
    pub entity_type: EntityType,
    pub privacy_officer: Contact,
    pub security_officer: Contact,
    #[serde(default)]
    pub authorized_representative: Option<Contact>,
    #[serde(default)]
    pub current_policy_id: Option<String>,
    #[serde(default)]
    pub policy_version: Option<String>,
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    #[serde(default)]
    pub review_date: Option<NaiveDate>,
}

impl OrganizationData {
    /// Required facts that are empty, in a stable order. Generation does not
    /// start until this list is empty.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let blank = |value: &str| value.trim().is_empty();
        let mut missing = Vec::new();

        if blank(&self.legal_name) {
            missing.push("legal_name");
        }
        if !self.address.is_complete() {
            missing.push("address");
        }
        if blank(&self.ein) {
            missing.push("ein");
        }
        if blank(&self.npi) {
            missing.push("npi");
        }
        if self.license_numbers.iter().all(|license| blank(license)) {
            missing.push("license_numbers");
        }
        if blank(&self.privacy_officer.name) {
            missing.push("privacy_officer.name");
        }
        if blank(&self.privacy_officer.email) {
            missing.push("privacy_officer.email");
        }
        if blank(&self.security_officer.name) {
            missing.push("security_officer.name");
        }
        if blank(&self.security_officer.email) {
            missing.push("security_officer.email");
        }
        let representative_named = self
            .authorized_representative
            .as_ref()
            .map(|rep| !blank(&rep.name))
            .unwrap_or(false);
        if !representative_named {
            missing.push("authorized_representative");
        }

        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_ids_round_trip_through_strings() {
        for policy in PolicyId::ALL {
            assert_eq!(policy.as_str().parse::<PolicyId>(), Ok(policy));
        }
        assert_eq!(
            "Access-Control".parse::<PolicyId>(),
            Ok(PolicyId::AccessControl)
        );
        assert!("hr-handbook".parse::<PolicyId>().is_err());
    }

    #[test]
    fn address_line_skips_blank_parts() {
        let address = Address {
            street: "1 Main St".into(),
            city: "".into(),
            state: "OR".into(),
            postal_code: "97201".into(),
        };
        assert_eq!(address.single_line().as_deref(), Some("1 Main St, OR 97201"));
        assert_eq!(Address::default().single_line(), None);
    }
}
