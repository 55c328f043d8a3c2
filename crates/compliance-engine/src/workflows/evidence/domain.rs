use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::documents::PolicyId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceType {
    Document,
    Screenshot,
    Log,
    Link,
    Attestation,
}

impl EvidenceType {
    pub const fn label(self) -> &'static str {
        match self {
            EvidenceType::Document => "document",
            EvidenceType::Screenshot => "screenshot",
            EvidenceType::Log => "log",
            EvidenceType::Link => "link",
            EvidenceType::Attestation => "attestation",
        }
    }
}

/// An artifact the organization uploaded. Read-only during generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub id: String,
    pub title: String,
    pub evidence_type: EvidenceType,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub attested_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_reference: Option<String>,
    /// Catalog field this record was uploaded against, when known.
    #[serde(default)]
    pub field_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidencePriority {
    High,
    Medium,
    Low,
}

impl EvidencePriority {
    pub const fn label(self) -> &'static str {
        match self {
            EvidencePriority::High => "high",
            EvidencePriority::Medium => "medium",
            EvidencePriority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceCategory {
    Administrative,
    Physical,
    Technical,
    Organizational,
    Privacy,
}

impl EvidenceCategory {
    pub const fn label(self) -> &'static str {
        match self {
            EvidenceCategory::Administrative => "Administrative Safeguards",
            EvidenceCategory::Physical => "Physical Safeguards",
            EvidenceCategory::Technical => "Technical Safeguards",
            EvidenceCategory::Organizational => "Organizational Requirements",
            EvidenceCategory::Privacy => "Privacy Rule",
        }
    }
}

/// Catalog entry describing one kind of evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceFieldConfig {
    pub id: &'static str,
    pub name: &'static str,
    pub category: EvidenceCategory,
    pub required: bool,
    pub retention_years: u8,
    pub description: &'static str,
    pub policies: Vec<PolicyId>,
}

impl EvidenceFieldConfig {
    pub fn supports(&self, policy: PolicyId) -> bool {
        self.policies.contains(&policy)
    }
}
