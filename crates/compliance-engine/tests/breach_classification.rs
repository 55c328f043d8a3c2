//! Integration tests for breach classification and notice letters.

use chrono::NaiveDate;
use compliance_engine::workflows::breach::{
    breach_notice, classify, legal_defense_statement, notification_obligations, BreachDetails,
    EncryptionStatus, LegalStatus, LEGAL_DEFENSE_STATEMENT,
};
use compliance_engine::workflows::documents::{
    Address, Contact, EntityType, OrganizationData, OrganizationId,
};
use serde_json::json;

fn organization() -> OrganizationData {
    OrganizationData {
        id: OrganizationId::new("org-lakeside"),
        legal_name: "Lakeside Dental Group".to_string(),
        dba_name: None,
        address: Address {
            street: "5 Shore Rd".to_string(),
            city: "Madison".to_string(),
            state: "WI".to_string(),
            postal_code: "53703".to_string(),
        },
        phone: None,
        website: None,
        ein: "39-1112223".to_string(),
        npi: "1300000001".to_string(),
        license_numbers: vec!["WI-DDS-77".to_string()],
        clia_number: None,
        performs_lab_tests: false,
        entity_type: EntityType::CoveredEntity,
        privacy_officer: Contact {
            phone: Some("608-555-0110".to_string()),
            ..Contact::new("Jordan Vance", "privacy@lakeside.example")
        },
        security_officer: Contact::new("Priya Shah", "security@lakeside.example"),
        authorized_representative: Some(Contact::new("Jordan Vance", "jv@lakeside.example")),
        current_policy_id: None,
        policy_version: None,
        effective_date: None,
        review_date: None,
    }
}

fn details(at_rest: EncryptionStatus, in_transit: EncryptionStatus) -> BreachDetails {
    BreachDetails {
        encrypted_at_rest: at_rest,
        encrypted_in_transit: in_transit,
        individuals_affected: 120,
        discovered_on: NaiveDate::from_ymd_opt(2026, 5, 4),
        description: "An unencrypted backup drive was misplaced.".to_string(),
        phi_involved: vec!["names".to_string(), "treatment dates".to_string()],
        ..BreachDetails::default()
    }
}

fn notice_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 20).expect("valid date")
}

#[test]
fn classification_covers_every_encryption_combination() {
    use EncryptionStatus::{No, Unknown, Yes};

    let cases = [
        (Yes, Yes, LegalStatus::NotReportable),
        (Yes, No, LegalStatus::Reportable),
        (No, Yes, LegalStatus::Reportable),
        (No, No, LegalStatus::Reportable),
        (Unknown, Yes, LegalStatus::UnderInvestigation),
        (Yes, Unknown, LegalStatus::UnderInvestigation),
        (No, Unknown, LegalStatus::UnderInvestigation),
    ];
    for (at_rest, in_transit, expected) in cases {
        assert_eq!(
            classify(&details(at_rest, in_transit)),
            expected,
            "{at_rest:?}/{in_transit:?}"
        );
    }
}

#[test]
fn payloads_accept_camel_case_and_loose_casing() {
    let details: BreachDetails = serde_json::from_value(json!({
        "encryptedAtRest": "Yes",
        "encryptedInTransit": "yes",
        "individualsAffected": 3,
    }))
    .expect("payload parses");
    assert_eq!(classify(&details), LegalStatus::NotReportable);
    assert_eq!(
        legal_defense_statement(&details).as_deref(),
        Some(LEGAL_DEFENSE_STATEMENT)
    );

    let unknown: BreachDetails =
        serde_json::from_value(json!({ "encrypted_at_rest": "maybe" })).expect("payload parses");
    assert_eq!(unknown.encrypted_at_rest, EncryptionStatus::Unknown);
    assert_eq!(classify(&unknown), LegalStatus::UnderInvestigation);
    assert!(legal_defense_statement(&unknown).is_none());
}

#[test]
fn safe_harbor_letter_documents_the_determination() {
    let notice = breach_notice(
        &organization(),
        &details(EncryptionStatus::Yes, EncryptionStatus::Yes),
        notice_date(),
    );

    assert_eq!(notice.status, LegalStatus::NotReportable);
    assert!(!notice.obligations.notify_individuals);
    assert!(notice.letter.contains("## Incident Determination"));
    assert!(notice.letter.contains(LEGAL_DEFENSE_STATEMENT));
    assert!(!notice.letter.contains("## What Happened"));
    assert!(notice.letter.contains("May 20, 2026"));
}

#[test]
fn reportable_letter_names_contacts_and_defers_hhs_log() {
    let notice = breach_notice(
        &organization(),
        &details(EncryptionStatus::No, EncryptionStatus::No),
        notice_date(),
    );

    assert_eq!(notice.status, LegalStatus::Reportable);
    assert!(notice.legal_defense.is_none());
    assert_eq!(
        notice.obligations.individual_notice_due,
        NaiveDate::from_ymd_opt(2026, 7, 3)
    );
    assert_eq!(
        notice.obligations.hhs_notice_due,
        NaiveDate::from_ymd_opt(2027, 3, 1)
    );
    assert!(notice.letter.contains("An unencrypted backup drive was misplaced."));
    assert!(notice.letter.contains("Approximately\n120 individuals are affected."));
    assert!(notice.letter.contains("names, treatment dates"));
    assert!(notice
        .letter
        .contains("Contact Jordan Vance, Privacy Officer, at privacy@lakeside.example or\n608-555-0110."));
    assert!(!notice.letter.contains("notifying the Secretary"));
    assert!(!notice.letter.contains("{{"));
}

#[test]
fn investigation_letter_tracks_provisional_deadline() {
    let details = details(EncryptionStatus::Unknown, EncryptionStatus::Yes);
    let obligations = notification_obligations(&details);
    assert!(obligations.provisional);

    let notice = breach_notice(&organization(), &details, notice_date());
    assert_eq!(notice.status, LegalStatus::UnderInvestigation);
    assert!(notice.letter.contains("## Preliminary Notice"));
    assert!(notice.letter.contains("discovered on\nMay 4, 2026."));
    assert!(notice.letter.contains("Individual notice\nwould be due by July 3, 2026."));
}
