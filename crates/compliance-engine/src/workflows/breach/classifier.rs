use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Confirmation state of an encryption control at the time of a breach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EncryptionStatus {
    Yes,
    No,
    #[default]
    Unknown,
}

impl EncryptionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            EncryptionStatus::Yes => "yes",
            EncryptionStatus::No => "no",
            EncryptionStatus::Unknown => "unknown",
        }
    }
}

impl From<&str> for EncryptionStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "encrypted" => EncryptionStatus::Yes,
            "no" | "n" | "false" | "unencrypted" => EncryptionStatus::No,
            _ => EncryptionStatus::Unknown,
        }
    }
}

impl From<String> for EncryptionStatus {
    fn from(value: String) -> Self {
        EncryptionStatus::from(value.as_str())
    }
}

impl From<EncryptionStatus> for String {
    fn from(value: EncryptionStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Facts about a suspected breach. Accepts both snake_case and camelCase
/// keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachDetails {
    #[serde(default, alias = "encryptedAtRest")]
    pub encrypted_at_rest: EncryptionStatus,
    #[serde(default, alias = "encryptedInTransit")]
    pub encrypted_in_transit: EncryptionStatus,
    #[serde(default, alias = "individualsAffected")]
    pub individuals_affected: u32,
    #[serde(default, alias = "discoveredOn")]
    pub discovered_on: Option<NaiveDate>,
    #[serde(default, alias = "occurredOn")]
    pub occurred_on: Option<NaiveDate>,
    #[serde(default, alias = "residentsByState")]
    pub residents_by_state: BTreeMap<String, u32>,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "phiInvolved")]
    pub phi_involved: Vec<String>,
}

/// Outcome of the breach decision procedure. Always recomputed from the
/// details, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegalStatus {
    #[serde(rename = "Not Reportable")]
    NotReportable,
    #[serde(rename = "Reportable")]
    Reportable,
    #[serde(rename = "Under Investigation")]
    UnderInvestigation,
}

impl LegalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LegalStatus::NotReportable => "Not Reportable",
            LegalStatus::Reportable => "Reportable",
            LegalStatus::UnderInvestigation => "Under Investigation",
        }
    }
}

impl fmt::Display for LegalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unknown encryption on either path keeps the incident under investigation.
/// Confirmed encryption on both paths is the encryption safe harbor.
pub fn classify(details: &BreachDetails) -> LegalStatus {
    use EncryptionStatus::{Unknown, Yes};

    match (details.encrypted_at_rest, details.encrypted_in_transit) {
        (Unknown, _) | (_, Unknown) => LegalStatus::UnderInvestigation,
        (Yes, Yes) => LegalStatus::NotReportable,
        _ => LegalStatus::Reportable,
    }
}

pub const LEGAL_DEFENSE_STATEMENT: &str = "The protected health information involved in \
this incident was encrypted both at rest and in transit in a manner consistent with the \
HHS Guidance to Render Unsecured Protected Health Information Unusable, Unreadable, or \
Indecipherable to Unauthorized Individuals (NIST SP 800-111 and NIST SP 800-52). \
Encrypted information is not unsecured protected health information under 45 CFR 164.402, \
and the incident therefore does not constitute a breach requiring notification under \
45 CFR 164.404 through 164.410.";

/// Safe-harbor paragraph, produced only for non-reportable incidents.
pub fn legal_defense_statement(details: &BreachDetails) -> Option<String> {
    match classify(details) {
        LegalStatus::NotReportable => Some(LEGAL_DEFENSE_STATEMENT.to_string()),
        LegalStatus::Reportable | LegalStatus::UnderInvestigation => None,
    }
}
