use std::sync::Arc;

use super::common::*;
use crate::workflows::documents::{
    DocumentOrchestrator, GenerationError, GenerationOptions, OrganizationId, PolicyId,
    PolicyStatus,
};
use crate::workflows::evidence::EVIDENCE_SUMMARY_HEADING;
use crate::workflows::templates::StaticTemplateLibrary;

fn org_id() -> OrganizationId {
    OrganizationId::new(ORG_ID)
}

#[tokio::test]
async fn generates_every_policy_without_leftover_markup() {
    let report = orchestrator()
        .generate_all(&org_id())
        .await
        .expect("batch runs");

    assert_eq!(report.generated, PolicyId::ALL.len());
    assert_eq!(report.skipped + report.failed, 0);
    for outcome in &report.outcomes {
        let document = outcome.document.as_ref().expect("generated document");
        assert!(
            document.unresolved_markup.is_empty(),
            "{} left {:?}",
            outcome.policy,
            document.unresolved_markup
        );
        assert!(!document.content.contains("{{"), "{} has raw markup", outcome.policy);
    }
}

#[tokio::test]
async fn policy_text_reflects_state_and_evidence() {
    let outcome = orchestrator()
        .generate_policy(&org_id(), PolicyId::AccessControl)
        .await
        .expect("policy runs");
    assert_eq!(outcome.status, PolicyStatus::Generated);

    let content = outcome.document.expect("document").content;
    assert!(content.starts_with("# Harbor Health Access Control Policy"));
    assert!(content
        .contains("Passwords must be at least 12 characters and meet complexity requirements."));
    assert!(content.contains("Okta MFA enforcement export, uploaded February 3, 2026"));
    assert!(content.contains("Access Review Log Q1, uploaded February 4, 2026"));
    assert!(!content.contains("that multi-factor authentication is not yet"));
    assert!(content.contains(
        "**Gap Acknowledgment:** The organization has determined that periodic access reviews"
    ));
    assert!(content.contains(EVIDENCE_SUMMARY_HEADING));
    assert_eq!(outcome.evidence.coverage_percent, 100);
}

#[tokio::test]
async fn missing_base_content_skips_only_that_policy() {
    let orchestrator = orchestrator_with(
        MemoryStore::with(organization(), answers(), Vec::new()),
        StaticTemplateLibrary::default().without(PolicyId::RiskAssessment),
        GenerationOptions::default(),
    );

    let report = orchestrator.generate_all(&org_id()).await.expect("batch runs");
    assert_eq!(report.generated, 8);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);

    let skipped = report
        .outcomes
        .iter()
        .find(|outcome| outcome.policy == PolicyId::RiskAssessment)
        .expect("risk assessment outcome");
    assert_eq!(skipped.status, PolicyStatus::Skipped);
    assert_eq!(
        skipped.reason.as_deref(),
        Some("no base content supplied for risk-assessment")
    );
    assert!(skipped.document.is_none());
}

#[tokio::test]
async fn unusable_template_fails_without_aborting_batch() {
    let orchestrator = orchestrator_with(
        MemoryStore::with(organization(), answers(), Vec::new()),
        StaticTemplateLibrary::default().with_override(PolicyId::ContingencyPlan, "   "),
        GenerationOptions::default(),
    );

    let report = orchestrator.generate_all(&org_id()).await.expect("batch runs");
    assert_eq!(report.failed, 1);
    assert_eq!(report.generated, 8);
    let failed = report
        .outcomes
        .iter()
        .find(|outcome| outcome.status == PolicyStatus::Failed)
        .expect("failed outcome");
    assert_eq!(failed.policy, PolicyId::ContingencyPlan);
    assert!(failed.reason.as_deref().unwrap_or_default().contains("empty"));
}

#[tokio::test]
async fn strict_mode_skips_policies_with_high_priority_gaps() {
    let orchestrator = orchestrator_with(
        MemoryStore::with(organization(), answers(), access_control_evidence()),
        StaticTemplateLibrary::default(),
        GenerationOptions {
            require_high_priority_evidence: true,
            include_evidence_summary: false,
        },
    );

    let report = orchestrator.generate_all(&org_id()).await.expect("batch runs");
    assert_eq!(report.generated, 1);
    assert_eq!(report.skipped, 8);

    let generated = report
        .outcomes
        .iter()
        .find(|outcome| outcome.status == PolicyStatus::Generated)
        .expect("one generated policy");
    assert_eq!(generated.policy, PolicyId::AccessControl);
    let content = &generated.document.as_ref().expect("document").content;
    assert!(!content.contains(EVIDENCE_SUMMARY_HEADING));

    let contingency = report
        .outcomes
        .iter()
        .find(|outcome| outcome.policy == PolicyId::ContingencyPlan)
        .expect("contingency outcome");
    assert_eq!(
        contingency.reason.as_deref(),
        Some("missing high-priority evidence: backup-verification, disaster-recovery-plan")
    );
}

#[tokio::test]
async fn incomplete_organization_blocks_generation() {
    let mut organization = organization();
    organization.ein.clear();
    organization.security_officer.email.clear();
    organization.authorized_representative = None;
    let orchestrator = orchestrator_with(
        MemoryStore::with(organization, answers(), Vec::new()),
        StaticTemplateLibrary::default(),
        GenerationOptions::default(),
    );

    match orchestrator.generate_all(&org_id()).await {
        Err(GenerationError::IncompleteOrganization(error)) => {
            assert_eq!(
                error.missing,
                vec!["ein", "security_officer.email", "authorized_representative"]
            );
        }
        other => panic!("expected incomplete organization, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_organization_and_store_failures_are_request_errors() {
    let missing = orchestrator()
        .generate_policy(&OrganizationId::new("nobody"), PolicyId::AccessControl)
        .await;
    assert!(matches!(missing, Err(GenerationError::OrganizationNotFound(_))));

    let offline = DocumentOrchestrator::standard(
        Arc::new(UnavailableStore),
        Arc::new(StaticTemplateLibrary::default()),
        GenerationOptions::default(),
    );
    let result = offline.generate_all(&org_id()).await;
    assert!(matches!(result, Err(GenerationError::Store(_))));
}

#[tokio::test]
async fn evidence_report_scores_coverage_and_register() {
    let report = orchestrator()
        .evidence_report(&org_id(), PolicyId::AccessControl)
        .await
        .expect("report");
    assert!(report.validation.can_generate);
    assert_eq!(report.validation.coverage_percent, 100);
    assert_eq!(report.register.on_file(), 2);
    assert_eq!(report.register.entries.len(), 5);
}

#[tokio::test]
async fn organization_and_evidence_text_never_becomes_markup() {
    let mut organization = organization();
    organization.legal_name = "Harbor {{#REMEDIATION_COMMITMENT:everything:low:never}} LLC".into();
    let evidence = vec![
        record("Okta MFA enforcement export", Some("mfa-configuration"), 3),
        record("Access Review Log {{Evidence: Device Inventory}}", None, 4),
    ];
    let orchestrator = orchestrator_with(
        MemoryStore::with(organization, answers(), evidence),
        StaticTemplateLibrary::default(),
        GenerationOptions::default(),
    );

    let outcome = orchestrator
        .generate_policy(&org_id(), PolicyId::AccessControl)
        .await
        .expect("policy runs");
    let document = outcome.document.expect("document");

    assert!(document.unresolved_markup.is_empty());
    assert!(document
        .content
        .contains("Harbor {{#REMEDIATION_COMMITMENT:everything:low:never}} LLC"));
    assert!(!document.content.contains("Remediation Commitment (Low Priority)"));
    assert!(document
        .content
        .contains("Access Review Log {{Evidence: Device Inventory}}, uploaded February 4, 2026"));
    assert!(!document.content.contains("Evidence Required: Device Inventory"));
}
