use crate::infra::{load_fixture, parse_date, InMemoryComplianceStore, OrganizationFixture};
use chrono::{Local, NaiveDate, TimeZone, Utc};
use clap::Args;
use compliance_engine::config::AppConfig;
use compliance_engine::error::AppError;
use compliance_engine::workflows::breach::{
    classify, legal_defense_statement, notification_obligations, BreachDetails,
    EncryptionStatus, NotificationObligations,
};
use compliance_engine::workflows::documents::{
    Address, BatchReport, Contact, DocumentOrchestrator, EntityType, GenerationOptions,
    OrganizationData, OrganizationId, PolicyId, PolicyOutcome,
};
use compliance_engine::workflows::evidence::{EvidenceRecord, EvidenceType, EvidenceValidation};
use compliance_engine::workflows::questionnaire::keys;
use compliance_engine::workflows::templates::StaticTemplateLibrary;
use std::path::PathBuf;
use std::sync::Arc;

type FixtureOrchestrator = DocumentOrchestrator<InMemoryComplianceStore, StaticTemplateLibrary>;

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// Organization fixture (JSON with organization, answers, evidence)
    #[arg(long)]
    pub(crate) fixture: PathBuf,
    /// Generate a single policy instead of the full set
    #[arg(long)]
    pub(crate) policy: Option<PolicyId>,
    /// Skip policies whose high-priority evidence is missing
    #[arg(long)]
    pub(crate) strict: bool,
    /// Omit the evidence summary section
    #[arg(long)]
    pub(crate) no_summary: bool,
    /// Write each generated policy to `<dir>/<policy>.md`
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct BreachClassifyArgs {
    /// Was the PHI encrypted at rest? (yes, no, unknown)
    #[arg(long)]
    pub(crate) at_rest: EncryptionStatus,
    /// Was the PHI encrypted in transit? (yes, no, unknown)
    #[arg(long)]
    pub(crate) in_transit: EncryptionStatus,
    /// Number of individuals affected
    #[arg(long, default_value_t = 0)]
    pub(crate) affected: u32,
    /// Discovery date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) discovered: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct EvidenceRegisterArgs {
    /// Organization fixture (JSON with organization, answers, evidence)
    #[arg(long)]
    pub(crate) fixture: PathBuf,
    /// Policy whose evidence register is printed
    #[arg(long)]
    pub(crate) policy: PolicyId,
    /// Emit CSV instead of a markdown table
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Policy to print in full (defaults to the access control policy)
    #[arg(long)]
    pub(crate) policy: Option<PolicyId>,
    /// Date printed on the sample breach letter (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) notice_date: Option<NaiveDate>,
}

fn fixture_orchestrator(
    fixture: OrganizationFixture,
    options: GenerationOptions,
) -> FixtureOrchestrator {
    DocumentOrchestrator::standard(
        Arc::new(InMemoryComplianceStore::with_fixtures([fixture])),
        Arc::new(StaticTemplateLibrary::default()),
        options,
    )
}

pub(crate) async fn run_generate(args: GenerateArgs) -> Result<(), AppError> {
    let GenerateArgs {
        fixture,
        policy,
        strict,
        no_summary,
        output,
    } = args;

    let config = AppConfig::load()?;
    let mut options = GenerationOptions::from(config.generation);
    options.require_high_priority_evidence |= strict;
    options.include_evidence_summary &= !no_summary;

    let fixture = load_fixture(&fixture)?;
    let id = fixture.id().clone();
    let orchestrator = fixture_orchestrator(fixture, options);

    let outcomes = match policy {
        Some(policy) => vec![orchestrator.generate_policy(&id, policy).await?],
        None => {
            let report = orchestrator.generate_all(&id).await?;
            render_batch_summary(&report);
            report.outcomes
        }
    };

    for outcome in &outcomes {
        match (&output, &outcome.document) {
            (Some(dir), Some(document)) => {
                std::fs::create_dir_all(dir)?;
                let path = dir.join(format!("{}.md", outcome.policy));
                std::fs::write(&path, &document.content)?;
                println!("- {} written to {}", outcome.policy.title(), path.display());
            }
            (None, Some(document)) if policy.is_some() => println!("{}", document.content),
            _ => render_outcome(outcome),
        }
    }

    Ok(())
}

pub(crate) fn run_breach_classify(args: BreachClassifyArgs) -> Result<(), AppError> {
    let details = BreachDetails {
        encrypted_at_rest: args.at_rest,
        encrypted_in_transit: args.in_transit,
        individuals_affected: args.affected,
        discovered_on: args.discovered,
        ..BreachDetails::default()
    };

    println!("Breach determination: {}", classify(&details));
    if let Some(statement) = legal_defense_statement(&details) {
        println!("\nLegal defense\n{statement}");
    }
    render_obligations(&notification_obligations(&details));
    Ok(())
}

pub(crate) async fn run_evidence_register(args: EvidenceRegisterArgs) -> Result<(), AppError> {
    let fixture = load_fixture(&args.fixture)?;
    let id = fixture.id().clone();
    let orchestrator = fixture_orchestrator(fixture, GenerationOptions::default());
    let report = orchestrator.evidence_report(&id, args.policy).await?;

    if args.csv {
        print!("{}", report.register.to_csv()?);
        return Ok(());
    }

    println!("{} evidence register", args.policy.title());
    render_validation(&report.validation);
    println!();
    print!("{}", report.register.to_markdown());
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        policy,
        notice_date,
    } = args;
    let policy = policy.unwrap_or(PolicyId::AccessControl);
    let notice_date = notice_date.unwrap_or_else(|| Local::now().date_naive());

    let fixture = sample_fixture();
    let id = fixture.id().clone();
    let organization = fixture.organization.clone();
    let orchestrator = fixture_orchestrator(fixture, GenerationOptions::default());

    println!("Compliance document demo for {}", organization.legal_name);
    let report = orchestrator.generate_all(&id).await?;
    render_batch_summary(&report);
    for outcome in &report.outcomes {
        render_outcome(outcome);
    }

    if let Some(document) = report
        .outcomes
        .iter()
        .find(|outcome| outcome.policy == policy)
        .and_then(|outcome| outcome.document.as_ref())
    {
        println!("\n{}\n", "=".repeat(72));
        println!("{}", document.content);
    }

    println!("\nBreach notice demo (laptop theft, unencrypted disk)");
    let details = BreachDetails {
        encrypted_at_rest: EncryptionStatus::No,
        encrypted_in_transit: EncryptionStatus::Yes,
        individuals_affected: 740,
        discovered_on: notice_date.checked_sub_days(chrono::Days::new(10)),
        residents_by_state: [("MN".to_string(), 702), ("WI".to_string(), 38)]
            .into_iter()
            .collect(),
        description: "A workstation laptop was stolen from a clinician's vehicle.".to_string(),
        phi_involved: vec![
            "patient names".to_string(),
            "appointment dates".to_string(),
            "diagnosis codes".to_string(),
        ],
        ..BreachDetails::default()
    };
    let notice = orchestrator.breach_notice(&id, &details, notice_date).await?;
    render_obligations(&notice.obligations);
    println!("\n{}", notice.letter);
    Ok(())
}

fn render_batch_summary(report: &BatchReport) {
    println!(
        "Organization {}: {} generated, {} skipped, {} failed",
        report.organization, report.generated, report.skipped, report.failed
    );
}

fn render_outcome(outcome: &PolicyOutcome) {
    let reason = outcome
        .reason
        .as_deref()
        .map(|reason| format!(" ({reason})"))
        .unwrap_or_default();
    println!(
        "- {}: {} | evidence coverage {}%{}",
        outcome.policy.title(),
        outcome.status.label(),
        outcome.evidence.coverage_percent,
        reason
    );
}

fn render_validation(validation: &EvidenceValidation) {
    println!(
        "High-priority coverage: {}% ({} of {})",
        validation.coverage_percent, validation.required_present, validation.required_total
    );
    if !validation.missing_high_priority.is_empty() {
        println!(
            "Missing high priority: {}",
            validation.missing_high_priority.join(", ")
        );
    }
    if !validation.missing_medium_priority.is_empty() {
        println!(
            "Missing medium priority: {}",
            validation.missing_medium_priority.join(", ")
        );
    }
}

fn render_obligations(obligations: &NotificationObligations) {
    let date = |value: Option<NaiveDate>| {
        value
            .map(|date| date.to_string())
            .unwrap_or_else(|| "discovery date required".to_string())
    };

    if !obligations.notify_individuals {
        println!("\nNotification obligations: none");
        return;
    }
    let heading = if obligations.provisional {
        "Notification obligations (provisional)"
    } else {
        "Notification obligations"
    };
    println!("\n{heading}");
    println!("- Individuals: by {}", date(obligations.individual_notice_due));
    if obligations.notify_hhs_immediately {
        println!("- HHS: by {}", date(obligations.hhs_notice_due));
    } else {
        println!("- HHS annual log: by {}", date(obligations.hhs_notice_due));
    }
    if obligations.media_notice_required {
        let states = if obligations.media_notice_states.is_empty() {
            "affected area".to_string()
        } else {
            obligations.media_notice_states.join(", ")
        };
        println!(
            "- Media ({states}): by {}",
            date(obligations.media_notice_due)
        );
    }
}

pub(crate) fn sample_fixture() -> OrganizationFixture {
    let organization = OrganizationData {
        id: OrganizationId::new("org-northwind"),
        legal_name: "Northwind Family Medicine PLLC".to_string(),
        dba_name: Some("Northwind Clinic".to_string()),
        address: Address {
            street: "410 Lake Street".to_string(),
            city: "Duluth".to_string(),
            state: "MN".to_string(),
            postal_code: "55802".to_string(),
        },
        phone: Some("218-555-0175".to_string()),
        website: Some("https://northwind.example".to_string()),
        ein: "41-2223334".to_string(),
        npi: "1679555012".to_string(),
        license_numbers: vec!["MN-CL-20931".to_string()],
        clia_number: Some("24D2098765".to_string()),
        performs_lab_tests: true,
        entity_type: EntityType::CoveredEntity,
        privacy_officer: Contact {
            phone: Some("218-555-0176".to_string()),
            title: Some("Practice Manager".to_string()),
            ..Contact::new("Elena Marsh", "privacy@northwind.example")
        },
        security_officer: Contact::new("Theo Grant", "it@northwind.example"),
        authorized_representative: Some(Contact {
            title: Some("Medical Director".to_string()),
            ..Contact::new("Dr. Naomi Fisk", "nfisk@northwind.example")
        }),
        current_policy_id: Some("NW-HIPAA-2026".to_string()),
        policy_version: Some("1.2".to_string()),
        effective_date: NaiveDate::from_ymd_opt(2026, 1, 1),
        review_date: NaiveDate::from_ymd_opt(2027, 1, 1),
    };

    let answers = [
        (keys::MFA, "yes-remote"),
        (keys::PASSWORD_POLICY, "10 characters"),
        (keys::UNIQUE_USER_IDS, "yes"),
        (keys::AUTOMATIC_LOGOFF, "yes-15"),
        (keys::ACCESS_CONTROL_MODEL, "role-based"),
        (keys::ACCESS_REVIEWS, "annual"),
        (keys::REMOTE_ACCESS, "vpn"),
        (keys::ENCRYPTION_AT_REST, "partial"),
        (keys::ENCRYPTION_IN_TRANSIT, "tls-1.2"),
        (keys::AUDIT_LOGGING, "centralized"),
        (keys::LOG_REVIEW, "monthly"),
        (keys::DATA_BACKUP, "daily"),
        (keys::BACKUP_LOCATION, "cloud"),
        (keys::DISASTER_RECOVERY, "documented"),
        (keys::RISK_ASSESSMENT, "yes-outdated"),
        (keys::SECURITY_TRAINING, "annual"),
        (keys::BUSINESS_ASSOCIATE_AGREEMENTS, "yes-some"),
        (keys::INCIDENT_RESPONSE_PLAN, "documented"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect();

    let uploaded = |month, day| {
        Utc.with_ymd_and_hms(2026, month, day, 9, 0, 0)
            .single()
            .unwrap_or_default()
    };
    let record = |id: &str, title: &str, field_id: &str, evidence_type, uploaded_at| {
        EvidenceRecord {
            id: id.to_string(),
            title: title.to_string(),
            evidence_type,
            uploaded_at,
            attested_at: None,
            file_name: None,
            file_reference: None,
            field_id: Some(field_id.to_string()),
        }
    };

    let mut privacy_designation = record(
        "nw-001",
        "Privacy Officer Designation - E. Marsh",
        "privacy-officer-designation",
        EvidenceType::Attestation,
        uploaded(1, 5),
    );
    privacy_designation.attested_at = Some(uploaded(1, 6));

    let evidence = vec![
        privacy_designation,
        record(
            "nw-002",
            "Duo MFA policy export",
            "mfa-configuration",
            EvidenceType::Screenshot,
            uploaded(2, 12),
        ),
        record(
            "nw-003",
            "2025 Annual Access Review",
            "access-review-log",
            EvidenceType::Log,
            uploaded(1, 20),
        ),
        record(
            "nw-004",
            "Veeam restore test January",
            "backup-verification",
            EvidenceType::Log,
            uploaded(1, 31),
        ),
        record(
            "nw-005",
            "HIPAA training completions 2025",
            "workforce-training-records",
            EvidenceType::Document,
            uploaded(1, 15),
        ),
    ];

    OrganizationFixture {
        organization,
        answers,
        evidence,
    }
}
