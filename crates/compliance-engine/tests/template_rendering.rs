//! Integration tests for the bundled policy templates.
//!
//! Every template is rendered against a complete organization with both an
//! empty questionnaire and a mature one; neither may leave markup behind.

use chrono::NaiveDate;
use compliance_engine::workflows::documents::{
    Address, Contact, EntityType, OrganizationData, OrganizationId, PolicyId,
};
use compliance_engine::workflows::questionnaire::{keys, normalize, AnswerMap};
use compliance_engine::workflows::templates::{
    builtin_template, render, render_with, unresolved_markup, RenderContext, NOT_ASSIGNED,
};

fn organization() -> OrganizationData {
    OrganizationData {
        id: OrganizationId::new("org-cedar"),
        legal_name: "Cedar Ridge Pediatrics PC".to_string(),
        dba_name: None,
        address: Address {
            street: "18 Mill St".to_string(),
            city: "Burlington".to_string(),
            state: "VT".to_string(),
            postal_code: "05401".to_string(),
        },
        phone: Some("802-555-0142".to_string()),
        website: None,
        ein: "03-7654321".to_string(),
        npi: "1912345678".to_string(),
        license_numbers: vec!["VT-MD-0921".to_string()],
        clia_number: Some("47D0999999".to_string()),
        performs_lab_tests: true,
        entity_type: EntityType::CoveredEntity,
        privacy_officer: Contact::new("Ruth Okafor", "privacy@cedar.example"),
        security_officer: Contact::new("Sam Bell", "security@cedar.example"),
        authorized_representative: Some(Contact::new("Ana Cruz", "ana@cedar.example")),
        current_policy_id: None,
        policy_version: None,
        effective_date: NaiveDate::from_ymd_opt(2026, 4, 1),
        review_date: None,
    }
}

fn mature_answers() -> AnswerMap {
    [
        (keys::MFA, "yes-all"),
        (keys::PASSWORD_POLICY, "14 characters, complex"),
        (keys::UNIQUE_USER_IDS, "yes"),
        (keys::AUTOMATIC_LOGOFF, "yes-15"),
        (keys::ACCESS_REVIEWS, "quarterly"),
        (keys::ENCRYPTION_AT_REST, "full-disk"),
        (keys::ENCRYPTION_IN_TRANSIT, "yes"),
        (keys::ENCRYPTION_STANDARD, "AES-256"),
        (keys::AUDIT_LOGGING, "yes"),
        (keys::LOG_REVIEW, "weekly"),
        (keys::DATA_BACKUP, "daily"),
        (keys::BACKUP_LOCATION, "offsite"),
        (keys::BACKUP_TESTING, "quarterly"),
        (keys::DISASTER_RECOVERY, "tested"),
        (keys::RTO_HOURS, "24"),
        (keys::RISK_ASSESSMENT, "yes"),
        (keys::SECURITY_TRAINING, "annual"),
        (keys::SANCTIONS_POLICY, "yes"),
        (keys::BUSINESS_ASSOCIATE_AGREEMENTS, "yes-all"),
        (keys::INCIDENT_RESPONSE_PLAN, "yes"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}

#[test]
fn every_template_renders_without_leftover_markup() {
    let organization = organization();
    let empty = normalize(&AnswerMap::new());
    let mature = normalize(&mature_answers());

    for policy in PolicyId::ALL {
        for state in [&empty, &mature] {
            let text = render(builtin_template(policy), &organization, Some(state));
            assert!(
                unresolved_markup(&text).is_empty(),
                "{policy} left {:?}",
                unresolved_markup(&text)
            );
            assert!(!text.contains("\n\n\n"), "{policy} has blank runs");
        }
    }
}

#[test]
fn empty_questionnaire_produces_commitments() {
    let text = render(
        builtin_template(PolicyId::ContingencyPlan),
        &organization(),
        Some(&normalize(&AnswerMap::new())),
    );

    assert!(text.starts_with("# Cedar Ridge Pediatrics PC Contingency and Disaster Recovery Plan"));
    assert!(text.contains(
        "**Gap Acknowledgment:** The organization has determined that data backup is not yet"
    ));
    assert!(text.contains(
        "**Remediation Commitment (High Priority):** The organization commits to implementing disaster recovery plan within 60 days"
    ));
    assert!(!text.contains("Exact copies of ePHI"));
    assert!(text.contains(&format!("| Policy ID | {NOT_ASSIGNED} |")));
}

#[test]
fn mature_answers_produce_affirmative_text() {
    let text = render(
        builtin_template(PolicyId::ContingencyPlan),
        &organization(),
        Some(&normalize(&mature_answers())),
    );

    assert!(text.contains(
        "Exact copies of ePHI are backed up on a recurring schedule and stored off site."
    ));
    assert!(text.contains("Critical systems are restored within 24 hours."));
    assert!(!text.contains("Gap Acknowledgment:** The organization has determined that data backup"));
    assert!(text.contains("| Effective Date | April 1, 2026 |"));
}

#[test]
fn rendering_without_state_keeps_state_blocks() {
    let text = render(
        builtin_template(PolicyId::ContingencyPlan),
        &organization(),
        None,
    );
    assert!(text.contains("{{#IF_BACKUPS_ENABLED}}"));
    assert!(!text.contains("{{OrganizationName}}"));
}

#[test]
fn context_flags_drive_custom_templates() {
    let organization = organization();
    let context = RenderContext::new(&organization)
        .with_flag("IS_URGENT", true)
        .with_value("Ticket", "SEC-42");
    let text = render_with(
        "{{#IF_IS_URGENT}}Escalate {{Ticket}} for {{OrganizationName}}.\n{{/IF_IS_URGENT}}{{#IF_PERFORMS_LAB_TESTS}}CLIA {{CLIANumber}}{{/IF_PERFORMS_LAB_TESTS}}",
        &context,
    );
    assert_eq!(
        text,
        "Escalate SEC-42 for Cedar Ridge Pediatrics PC.\nCLIA 47D0999999"
    );
}
