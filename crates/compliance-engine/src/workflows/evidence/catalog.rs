use std::collections::BTreeMap;

use super::domain::{EvidenceCategory, EvidenceFieldConfig};
use crate::workflows::documents::PolicyId;

/// Registry of evidence kinds, keyed by field id. Immutable once built and
/// shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct EvidenceCatalog {
    fields: BTreeMap<&'static str, EvidenceFieldConfig>,
    order: Vec<&'static str>,
}

impl EvidenceCatalog {
    pub fn new(fields: Vec<EvidenceFieldConfig>) -> Self {
        let mut catalog = Self::default();
        for field in fields {
            if catalog.fields.insert(field.id, field.clone()).is_none() {
                catalog.order.push(field.id);
            }
        }
        catalog
    }

    pub fn standard() -> Self {
        use EvidenceCategory::{Administrative, Organizational, Physical, Privacy, Technical};
        use PolicyId::*;

        let field = |id, name, category, required, retention_years, description, policies: &[PolicyId]| {
            EvidenceFieldConfig {
                id,
                name,
                category,
                required,
                retention_years,
                description,
                policies: policies.to_vec(),
            }
        };

        Self::new(vec![
            field(
                "privacy-officer-designation",
                "Privacy Officer Designation",
                Administrative,
                true,
                6,
                "Signed designation of the HIPAA Privacy Officer.",
                &[MasterSecurityPolicy, BreachNotification, NoticeOfPrivacyPractices],
            ),
            field(
                "security-officer-designation",
                "Security Officer Designation",
                Administrative,
                true,
                6,
                "Signed designation of the HIPAA Security Officer.",
                &[MasterSecurityPolicy, IncidentResponse],
            ),
            field(
                "security-risk-assessment",
                "Security Risk Assessment",
                Administrative,
                true,
                6,
                "Most recent enterprise-wide security risk assessment report.",
                &[MasterSecurityPolicy, RiskAssessment],
            ),
            field(
                "risk-management-plan",
                "Risk Management Plan",
                Administrative,
                true,
                6,
                "Plan tracking identified risks to remediation.",
                &[RiskAssessment],
            ),
            field(
                "vulnerability-scan-report",
                "Vulnerability Scan Report",
                Technical,
                false,
                3,
                "Output of the latest internal or external vulnerability scan.",
                &[RiskAssessment],
            ),
            field(
                "workforce-training-records",
                "Workforce Training Records",
                Administrative,
                true,
                6,
                "Completion records for HIPAA security awareness training.",
                &[MasterSecurityPolicy, WorkforceTraining],
            ),
            field(
                "sanctions-policy-acknowledgment",
                "Sanctions Policy Acknowledgment",
                Administrative,
                false,
                6,
                "Workforce acknowledgments of the sanctions policy.",
                &[WorkforceTraining],
            ),
            field(
                "phishing-simulation-results",
                "Phishing Simulation Results",
                Administrative,
                false,
                3,
                "Results of simulated phishing campaigns.",
                &[WorkforceTraining],
            ),
            field(
                "business-associate-agreements",
                "Business Associate Agreements",
                Organizational,
                true,
                6,
                "Executed agreements with every business associate.",
                &[MasterSecurityPolicy, BusinessAssociate],
            ),
            field(
                "vendor-inventory",
                "Vendor Inventory",
                Organizational,
                false,
                6,
                "Inventory of vendors with access to PHI.",
                &[BusinessAssociate],
            ),
            field(
                "incident-response-plan",
                "Incident Response Plan",
                Administrative,
                true,
                6,
                "Approved incident response procedures.",
                &[IncidentResponse],
            ),
            field(
                "incident-log",
                "Security Incident Log",
                Administrative,
                true,
                6,
                "Log of reported security incidents and their disposition.",
                &[IncidentResponse, BreachNotification],
            ),
            field(
                "breach-risk-assessment",
                "Breach Risk Assessment",
                Administrative,
                true,
                6,
                "Four-factor risk assessment template or completed assessments.",
                &[BreachNotification],
            ),
            field(
                "breach-notification-template",
                "Breach Notification Letter Template",
                Administrative,
                false,
                6,
                "Approved individual notification letter.",
                &[BreachNotification],
            ),
            field(
                "backup-verification",
                "Backup Verification Log",
                Technical,
                true,
                6,
                "Evidence that backups complete and restore successfully.",
                &[ContingencyPlan],
            ),
            field(
                "disaster-recovery-plan",
                "Disaster Recovery Plan",
                Administrative,
                true,
                6,
                "Documented disaster recovery procedures.",
                &[ContingencyPlan],
            ),
            field(
                "contingency-plan-test",
                "Contingency Plan Test Results",
                Administrative,
                false,
                6,
                "Results of the latest contingency plan exercise.",
                &[ContingencyPlan],
            ),
            field(
                "mfa-configuration",
                "MFA Configuration",
                Technical,
                true,
                3,
                "Screenshot or export showing multi-factor authentication enforcement.",
                &[AccessControl],
            ),
            field(
                "access-review-log",
                "Access Review Log",
                Technical,
                true,
                6,
                "Record of periodic user access reviews.",
                &[AccessControl],
            ),
            field(
                "user-access-list",
                "User Access List",
                Technical,
                false,
                3,
                "Current list of users with access to systems holding PHI.",
                &[AccessControl],
            ),
            field(
                "encryption-configuration",
                "Encryption Configuration",
                Technical,
                true,
                6,
                "Evidence of encryption at rest and in transit.",
                &[MasterSecurityPolicy, AccessControl],
            ),
            field(
                "audit-log-sample",
                "Audit Log Sample",
                Technical,
                true,
                6,
                "Sample of system audit logs showing access to PHI.",
                &[AccessControl, IncidentResponse],
            ),
            field(
                "device-inventory",
                "Device Inventory",
                Physical,
                false,
                6,
                "Inventory of workstations and devices that store PHI.",
                &[MasterSecurityPolicy],
            ),
            field(
                "facility-access-log",
                "Facility Access Log",
                Physical,
                false,
                6,
                "Visitor and facility access records.",
                &[MasterSecurityPolicy],
            ),
            field(
                "npp-acknowledgments",
                "Notice of Privacy Practices Acknowledgments",
                Privacy,
                true,
                6,
                "Signed patient acknowledgments of receipt of the notice.",
                &[NoticeOfPrivacyPractices],
            ),
            field(
                "npp-posting",
                "Notice of Privacy Practices Posting",
                Privacy,
                false,
                6,
                "Photo or link showing the notice posted on site and online.",
                &[NoticeOfPrivacyPractices],
            ),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&EvidenceFieldConfig> {
        self.fields.get(id)
    }

    pub fn by_name(&self, name: &str) -> Option<&EvidenceFieldConfig> {
        let wanted = name.trim();
        self.iter()
            .find(|field| field.name.eq_ignore_ascii_case(wanted))
    }

    /// Fields in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &EvidenceFieldConfig> {
        self.order.iter().filter_map(|id| self.fields.get(id))
    }

    pub fn for_policy(&self, policy: PolicyId) -> Vec<&EvidenceFieldConfig> {
        self.iter().filter(|field| field.supports(policy)).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
