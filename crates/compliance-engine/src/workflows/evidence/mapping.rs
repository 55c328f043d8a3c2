use std::collections::BTreeMap;

use serde::Serialize;

use super::catalog::EvidenceCatalog;
use super::domain::EvidencePriority;
use crate::workflows::documents::PolicyId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InjectionType {
    /// Inline reference line inside the section.
    Reference,
    /// Inline line that expects an attestation date.
    Attestation,
    /// Listed in the appendix instead of the section body.
    Appendix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InjectionPosition {
    AfterHeading,
    EndOfSection,
}

/// Which record timestamp the rendered line is dated by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateField {
    UploadedAt,
    AttestedAt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceInjectionPoint {
    pub evidence_id: String,
    pub injection_type: InjectionType,
    pub template_fragment: String,
    pub position: InjectionPosition,
    pub priority: EvidencePriority,
    pub date_field: Option<DateField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceSection {
    pub title: String,
    pub injection_points: Vec<EvidenceInjectionPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyEvidenceMapping {
    pub policy: PolicyId,
    pub sections: Vec<EvidenceSection>,
}

impl PolicyEvidenceMapping {
    pub fn points(&self) -> impl Iterator<Item = &EvidenceInjectionPoint> {
        self.sections
            .iter()
            .flat_map(|section| section.injection_points.iter())
    }
}

/// Per-policy, per-section injection points. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct PolicyEvidenceMap {
    mappings: BTreeMap<PolicyId, PolicyEvidenceMapping>,
}

impl PolicyEvidenceMap {
    pub fn new(mappings: Vec<PolicyEvidenceMapping>) -> Self {
        Self {
            mappings: mappings
                .into_iter()
                .map(|mapping| (mapping.policy, mapping))
                .collect(),
        }
    }

    pub fn get(&self, policy: PolicyId) -> Option<&PolicyEvidenceMapping> {
        self.mappings.get(&policy)
    }

    /// The production layout. Fragment text is derived from catalog display
    /// names; ids the catalog does not know fall back to the raw id.
    pub fn standard(catalog: &EvidenceCatalog) -> Self {
        use EvidencePriority::{High, Low, Medium};
        use InjectionPosition::{AfterHeading, EndOfSection};
        use InjectionType::{Appendix, Attestation, Reference};

        let builder = PointBuilder { catalog };
        let section = |title: &str, injection_points: Vec<EvidenceInjectionPoint>| {
            EvidenceSection {
                title: title.to_string(),
                injection_points,
            }
        };
        let mapping = |policy, sections| PolicyEvidenceMapping { policy, sections };

        Self::new(vec![
            mapping(
                PolicyId::MasterSecurityPolicy,
                vec![
                    section(
                        "Security and Privacy Officials",
                        vec![
                            builder.point("privacy-officer-designation", Attestation, EndOfSection, High),
                            builder.point("security-officer-designation", Attestation, EndOfSection, High),
                        ],
                    ),
                    section(
                        "Risk Management",
                        vec![builder.point("security-risk-assessment", Reference, EndOfSection, High)],
                    ),
                    section(
                        "Workforce Security",
                        vec![builder.point("workforce-training-records", Reference, EndOfSection, Medium)],
                    ),
                    section(
                        "Technical Safeguards",
                        vec![builder.point("encryption-configuration", Reference, EndOfSection, Medium)],
                    ),
                    section(
                        "Physical Safeguards",
                        vec![
                            builder.point("device-inventory", Appendix, EndOfSection, Low),
                            builder.point("facility-access-log", Appendix, EndOfSection, Low),
                        ],
                    ),
                    section(
                        "Business Associates",
                        vec![builder.point("business-associate-agreements", Reference, EndOfSection, Medium)],
                    ),
                ],
            ),
            mapping(
                PolicyId::RiskAssessment,
                vec![
                    section(
                        "Risk Analysis",
                        vec![builder.point("security-risk-assessment", Reference, AfterHeading, High)],
                    ),
                    section(
                        "Risk Management Plan",
                        vec![builder.point("risk-management-plan", Reference, EndOfSection, High)],
                    ),
                    section(
                        "Technical Evaluation",
                        vec![builder.point("vulnerability-scan-report", Reference, EndOfSection, Medium)],
                    ),
                ],
            ),
            mapping(
                PolicyId::AccessControl,
                vec![
                    section(
                        "Authentication",
                        vec![builder.point("mfa-configuration", Reference, EndOfSection, High)],
                    ),
                    section(
                        "Access Reviews",
                        vec![
                            builder.point("access-review-log", Reference, EndOfSection, High),
                            builder.point("user-access-list", Appendix, EndOfSection, Low),
                        ],
                    ),
                    section(
                        "Encryption",
                        vec![builder.point("encryption-configuration", Reference, EndOfSection, Medium)],
                    ),
                    section(
                        "Audit Controls",
                        vec![builder.point("audit-log-sample", Reference, EndOfSection, Medium)],
                    ),
                ],
            ),
            mapping(
                PolicyId::IncidentResponse,
                vec![
                    section(
                        "Incident Response Team",
                        vec![builder.point("security-officer-designation", Attestation, EndOfSection, High)],
                    ),
                    section(
                        "Response Procedures",
                        vec![builder.point("incident-response-plan", Reference, AfterHeading, High)],
                    ),
                    section(
                        "Documentation",
                        vec![
                            builder.point("incident-log", Reference, EndOfSection, Medium),
                            builder.point("audit-log-sample", Appendix, EndOfSection, Low),
                        ],
                    ),
                ],
            ),
            mapping(
                PolicyId::BreachNotification,
                vec![
                    section(
                        "Breach Risk Assessment",
                        vec![builder.point("breach-risk-assessment", Reference, EndOfSection, High)],
                    ),
                    section(
                        "Notification Procedures",
                        vec![
                            builder.point("privacy-officer-designation", Attestation, EndOfSection, High),
                            builder.point("breach-notification-template", Appendix, EndOfSection, Low),
                        ],
                    ),
                    section(
                        "Documentation and Retention",
                        vec![builder.point("incident-log", Reference, EndOfSection, Medium)],
                    ),
                ],
            ),
            mapping(
                PolicyId::BusinessAssociate,
                vec![
                    section(
                        "Business Associate Agreements",
                        vec![builder.point("business-associate-agreements", Reference, EndOfSection, High)],
                    ),
                    section(
                        "Vendor Oversight",
                        vec![builder.point("vendor-inventory", Reference, EndOfSection, Medium)],
                    ),
                ],
            ),
            mapping(
                PolicyId::WorkforceTraining,
                vec![
                    section(
                        "Training Program",
                        vec![builder.point("workforce-training-records", Reference, EndOfSection, High)],
                    ),
                    section(
                        "Security Reminders",
                        vec![builder.point("phishing-simulation-results", Reference, EndOfSection, Low)],
                    ),
                    section(
                        "Sanctions",
                        vec![builder.point("sanctions-policy-acknowledgment", Attestation, EndOfSection, Medium)],
                    ),
                ],
            ),
            mapping(
                PolicyId::ContingencyPlan,
                vec![
                    section(
                        "Data Backup Plan",
                        vec![builder.point("backup-verification", Reference, EndOfSection, High)],
                    ),
                    section(
                        "Disaster Recovery Plan",
                        vec![builder.point("disaster-recovery-plan", Reference, AfterHeading, High)],
                    ),
                    section(
                        "Testing and Revision",
                        vec![builder.point("contingency-plan-test", Reference, EndOfSection, Medium)],
                    ),
                ],
            ),
            mapping(
                PolicyId::NoticeOfPrivacyPractices,
                vec![
                    section(
                        "Privacy Contact",
                        vec![builder.point("privacy-officer-designation", Attestation, EndOfSection, High)],
                    ),
                    section(
                        "Acknowledgment of Receipt",
                        vec![
                            builder.point("npp-acknowledgments", Reference, EndOfSection, High),
                            builder.point("npp-posting", Appendix, EndOfSection, Low),
                        ],
                    ),
                ],
            ),
        ])
    }
}

struct PointBuilder<'c> {
    catalog: &'c EvidenceCatalog,
}

impl PointBuilder<'_> {
    fn point(
        &self,
        evidence_id: &str,
        injection_type: InjectionType,
        position: InjectionPosition,
        priority: EvidencePriority,
    ) -> EvidenceInjectionPoint {
        let name = self
            .catalog
            .get(evidence_id)
            .map(|field| field.name)
            .unwrap_or(evidence_id);
        let (label, date_field) = match injection_type {
            InjectionType::Attestation => ("Attestation", Some(DateField::AttestedAt)),
            InjectionType::Reference | InjectionType::Appendix => {
                ("Supporting evidence", Some(DateField::UploadedAt))
            }
        };

        EvidenceInjectionPoint {
            evidence_id: evidence_id.to_string(),
            injection_type,
            template_fragment: format!("**{label}:** {{{{Evidence: {name}}}}}"),
            position,
            priority,
            date_field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_policy_is_mapped_with_a_high_priority_point() {
        let catalog = EvidenceCatalog::standard();
        let map = PolicyEvidenceMap::standard(&catalog);
        for policy in PolicyId::ALL {
            let mapping = map.get(policy).expect("mapped");
            assert!(mapping
                .points()
                .any(|point| point.priority == EvidencePriority::High));
        }
    }

    #[test]
    fn mapped_ids_exist_in_catalog() {
        let catalog = EvidenceCatalog::standard();
        let map = PolicyEvidenceMap::standard(&catalog);
        for policy in PolicyId::ALL {
            for point in map.get(policy).into_iter().flat_map(|mapping| mapping.points()) {
                assert!(
                    catalog.get(&point.evidence_id).is_some(),
                    "{} is not catalogued",
                    point.evidence_id
                );
            }
        }
    }

    #[test]
    fn fragments_reference_catalog_names() {
        let catalog = EvidenceCatalog::standard();
        let map = PolicyEvidenceMap::standard(&catalog);
        let point = map
            .get(PolicyId::AccessControl)
            .and_then(|mapping| mapping.points().next())
            .expect("access control point");
        assert_eq!(
            point.template_fragment,
            "**Supporting evidence:** {{Evidence: MFA Configuration}}"
        );
    }
}
