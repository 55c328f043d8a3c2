use super::answers::{
    keys, normalize_token, AccessControlModelAnswer, Affirmation, AnswerMap, AuditLoggingAnswer,
    AutomaticLogoffAnswer, BackupAnswer, BackupLocationAnswer, BusinessAssociateAnswer,
    DeviceDisposalAnswer, EmailEncryptionAnswer, EncryptionAtRestAnswer,
    EncryptionInTransitAnswer, EndpointProtectionAnswer, FacilityAccessAnswer, FirewallAnswer,
    LogReviewAnswer, MfaAnswer, PasswordPolicyAnswer, PatchManagementAnswer,
    PenetrationTestingAnswer, PlanAnswer, RemoteAccessAnswer, ReviewCadenceAnswer,
    RiskAssessmentAnswer, TerminationAnswer, TrainingAnswer, VulnerabilityScanningAnswer,
    DEFAULT_PASSWORD_LENGTH,
};
use super::state::{
    AccessModel, BaaCoverage, BackupFrequency, ComplianceState, DisposalMethod,
    EncryptionScope, EncryptionStandard, EndpointProtection, LogReviewFrequency, MfaScope,
    PatchManagement, RemoteAccessMethod, ReviewFrequency, TrainingFrequency,
};

/// HIPAA documentation retention minimum (45 CFR 164.316(b)(2)).
pub const DEFAULT_LOG_RETENTION_YEARS: u32 = 6;
/// Outer bound for individual breach notice (45 CFR 164.404(b)).
pub const DEFAULT_BREACH_NOTIFICATION_DAYS: u32 = 60;

/// Reduce raw questionnaire answers to a fully populated [`ComplianceState`].
///
/// Total over any answer map: every field falls back to its conservative
/// default when the answer is absent or outside the question's vocabulary.
pub fn normalize(answers: &AnswerMap) -> ComplianceState {
    let answer = |key: &str| answers.get(key).map(String::as_str);
    let yes = |key: &str| Affirmation::parse(answer(key)).is_yes();

    let mfa = MfaAnswer::parse(answer(keys::MFA));
    let password = PasswordPolicyAnswer::parse(answer(keys::PASSWORD_POLICY));
    let logoff = AutomaticLogoffAnswer::parse(answer(keys::AUTOMATIC_LOGOFF));
    let access_model = AccessControlModelAnswer::parse(answer(keys::ACCESS_CONTROL_MODEL));
    let remote_access = RemoteAccessAnswer::parse(answer(keys::REMOTE_ACCESS));
    let at_rest = EncryptionAtRestAnswer::parse(answer(keys::ENCRYPTION_AT_REST));
    let in_transit = EncryptionInTransitAnswer::parse(answer(keys::ENCRYPTION_IN_TRANSIT));
    let audit = AuditLoggingAnswer::parse(answer(keys::AUDIT_LOGGING));
    let backup = BackupAnswer::parse(answer(keys::DATA_BACKUP));
    let disaster_recovery = PlanAnswer::parse(answer(keys::DISASTER_RECOVERY));
    let risk = RiskAssessmentAnswer::parse(answer(keys::RISK_ASSESSMENT));
    let training = TrainingAnswer::parse(answer(keys::SECURITY_TRAINING));
    let termination = TerminationAnswer::parse(answer(keys::TERMINATION_PROCEDURE));
    let baa = BusinessAssociateAnswer::parse(answer(keys::BUSINESS_ASSOCIATE_AGREEMENTS));
    let incident = PlanAnswer::parse(answer(keys::INCIDENT_RESPONSE_PLAN));
    let endpoint = EndpointProtectionAnswer::parse(answer(keys::ENDPOINT_PROTECTION));

    let encryption_at_rest = matches!(
        at_rest,
        EncryptionAtRestAnswer::Yes
            | EncryptionAtRestAnswer::FullDisk
            | EncryptionAtRestAnswer::Database
    );
    let encryption_in_transit = matches!(
        in_transit,
        EncryptionInTransitAnswer::Yes
            | EncryptionInTransitAnswer::Tls12
            | EncryptionInTransitAnswer::Tls13
    );
    let remote_access_method = remote_access_method(remote_access);
    let endpoint_protection = match endpoint {
        EndpointProtectionAnswer::Edr => EndpointProtection::Edr,
        EndpointProtectionAnswer::Antivirus => EndpointProtection::Antivirus,
        EndpointProtectionAnswer::No | EndpointProtectionAnswer::Unrecognized => {
            EndpointProtection::None
        }
    };

    ComplianceState {
        mfa_enabled: matches!(
            mfa,
            MfaAnswer::Yes | MfaAnswer::YesAll | MfaAnswer::YesRemote
        ),
        mfa_scope: mfa_scope(mfa),
        password_policy_enforced: matches!(password, PasswordPolicyAnswer::Enforced { .. }),
        password_min_length: match password {
            PasswordPolicyAnswer::Enforced { min_length, .. } => min_length,
            PasswordPolicyAnswer::NoPolicy | PasswordPolicyAnswer::Unrecognized => {
                DEFAULT_PASSWORD_LENGTH
            }
        },
        password_complexity_required: matches!(
            password,
            PasswordPolicyAnswer::Enforced { complex: true, .. }
        ),
        password_rotation_days: parse_count(answer(keys::PASSWORD_ROTATION_DAYS), 0),
        unique_user_ids: yes(keys::UNIQUE_USER_IDS),
        automatic_logoff: !matches!(
            logoff,
            AutomaticLogoffAnswer::No | AutomaticLogoffAnswer::Unrecognized
        ),
        session_timeout_minutes: match logoff {
            AutomaticLogoffAnswer::Yes | AutomaticLogoffAnswer::After15Minutes => 15,
            AutomaticLogoffAnswer::After30Minutes => 30,
            AutomaticLogoffAnswer::No | AutomaticLogoffAnswer::Unrecognized => 0,
        },
        access_control_model: match access_model {
            AccessControlModelAnswer::RoleBased => AccessModel::RoleBased,
            AccessControlModelAnswer::Discretionary => AccessModel::Discretionary,
            AccessControlModelAnswer::No | AccessControlModelAnswer::Unrecognized => {
                AccessModel::None
            }
        },
        role_based_access: access_model == AccessControlModelAnswer::RoleBased,
        access_review_frequency: review_frequency(ReviewCadenceAnswer::parse(answer(
            keys::ACCESS_REVIEWS,
        ))),
        emergency_access_procedure: yes(keys::EMERGENCY_ACCESS),
        privileged_access_management: yes(keys::PRIVILEGED_ACCESS),
        remote_access_method,
        remote_access_secured: matches!(
            remote_access_method,
            RemoteAccessMethod::Vpn | RemoteAccessMethod::ZeroTrust
        ),

        encryption_at_rest,
        encryption_in_transit,
        encryption_standard: encryption_standard(answer(keys::ENCRYPTION_STANDARD)),
        encryption_scope: encryption_scope(encryption_at_rest, encryption_in_transit),
        device_encryption: yes(keys::DEVICE_ENCRYPTION),
        email_encryption: matches!(
            EmailEncryptionAnswer::parse(answer(keys::EMAIL_ENCRYPTION)),
            EmailEncryptionAnswer::Always | EmailEncryptionAnswer::PhiOnly
        ),

        audit_logging_enabled: !matches!(
            audit,
            AuditLoggingAnswer::No | AuditLoggingAnswer::Unrecognized
        ),
        centralized_logging: matches!(
            audit,
            AuditLoggingAnswer::Centralized | AuditLoggingAnswer::Siem
        ),
        log_review_frequency: match LogReviewAnswer::parse(answer(keys::LOG_REVIEW)) {
            LogReviewAnswer::Daily => LogReviewFrequency::Daily,
            LogReviewAnswer::Weekly => LogReviewFrequency::Weekly,
            LogReviewAnswer::Monthly => LogReviewFrequency::Monthly,
            LogReviewAnswer::Never | LogReviewAnswer::Unrecognized => LogReviewFrequency::Never,
        },
        log_retention_years: parse_count(
            answer(keys::LOG_RETENTION_YEARS),
            DEFAULT_LOG_RETENTION_YEARS,
        ),
        intrusion_detection: yes(keys::INTRUSION_DETECTION),
        integrity_controls: yes(keys::INTEGRITY_CONTROLS),

        backups_enabled: !matches!(backup, BackupAnswer::No | BackupAnswer::Unrecognized),
        backup_frequency: match backup {
            BackupAnswer::Daily => BackupFrequency::Daily,
            BackupAnswer::Weekly => BackupFrequency::Weekly,
            BackupAnswer::Monthly | BackupAnswer::Yes => BackupFrequency::Monthly,
            BackupAnswer::No | BackupAnswer::Unrecognized => BackupFrequency::None,
        },
        offsite_backups: matches!(
            BackupLocationAnswer::parse(answer(keys::BACKUP_LOCATION)),
            BackupLocationAnswer::Offsite
                | BackupLocationAnswer::Cloud
                | BackupLocationAnswer::Hybrid
        ),
        backup_testing_frequency: review_frequency(ReviewCadenceAnswer::parse(answer(
            keys::BACKUP_TESTING,
        ))),
        disaster_recovery_plan: matches!(
            disaster_recovery,
            PlanAnswer::Tested | PlanAnswer::Documented
        ),
        disaster_recovery_tested: disaster_recovery == PlanAnswer::Tested,
        recovery_time_objective_hours: parse_count(answer(keys::RTO_HOURS), 0),

        risk_assessment_completed: matches!(
            risk,
            RiskAssessmentAnswer::Annual | RiskAssessmentAnswer::Recent
        ),
        risk_assessment_frequency: match risk {
            RiskAssessmentAnswer::Annual => ReviewFrequency::Annual,
            RiskAssessmentAnswer::Recent | RiskAssessmentAnswer::Outdated => {
                ReviewFrequency::AdHoc
            }
            RiskAssessmentAnswer::No | RiskAssessmentAnswer::Unrecognized => {
                ReviewFrequency::Never
            }
        },
        vulnerability_scanning: !matches!(
            VulnerabilityScanningAnswer::parse(answer(keys::VULNERABILITY_SCANNING)),
            VulnerabilityScanningAnswer::No | VulnerabilityScanningAnswer::Unrecognized
        ),
        penetration_testing: matches!(
            PenetrationTestingAnswer::parse(answer(keys::PENETRATION_TESTING)),
            PenetrationTestingAnswer::Annual | PenetrationTestingAnswer::Yes
        ),
        patch_management: match PatchManagementAnswer::parse(answer(keys::PATCH_MANAGEMENT)) {
            PatchManagementAnswer::Automated => PatchManagement::Automated,
            PatchManagementAnswer::Manual => PatchManagement::Manual,
            PatchManagementAnswer::No | PatchManagementAnswer::Unrecognized => {
                PatchManagement::None
            }
        },

        security_training: !matches!(training, TrainingAnswer::No | TrainingAnswer::Unrecognized),
        training_frequency: match training {
            TrainingAnswer::Annual => TrainingFrequency::Annual,
            TrainingAnswer::Onboarding | TrainingAnswer::Yes => TrainingFrequency::OnboardingOnly,
            TrainingAnswer::No | TrainingAnswer::Unrecognized => TrainingFrequency::None,
        },
        phishing_simulations: yes(keys::PHISHING_SIMULATION),
        sanctions_policy: yes(keys::SANCTIONS_POLICY),
        background_checks: yes(keys::BACKGROUND_CHECKS),
        termination_procedure: matches!(
            termination,
            TerminationAnswer::SameDay | TerminationAnswer::Documented
        ),
        same_day_access_revocation: termination == TerminationAnswer::SameDay,
        workforce_size: parse_count(answer(keys::WORKFORCE_SIZE), 0),

        baa_management: matches!(
            baa,
            BusinessAssociateAnswer::All | BusinessAssociateAnswer::Yes
        ),
        baa_coverage: match baa {
            BusinessAssociateAnswer::All | BusinessAssociateAnswer::Yes => BaaCoverage::All,
            BusinessAssociateAnswer::Partial => BaaCoverage::Partial,
            BusinessAssociateAnswer::NotApplicable => BaaCoverage::NotApplicable,
            BusinessAssociateAnswer::No | BusinessAssociateAnswer::Unrecognized => {
                BaaCoverage::None
            }
        },
        business_associates: parse_list(answer(keys::BUSINESS_ASSOCIATES)),
        vendor_risk_assessment: yes(keys::VENDOR_ASSESSMENT),

        incident_response_plan: matches!(incident, PlanAnswer::Tested | PlanAnswer::Documented),
        incident_response_tested: incident == PlanAnswer::Tested,
        breach_notification_timeline_days: parse_count(
            answer(keys::BREACH_NOTIFICATION_DAYS),
            DEFAULT_BREACH_NOTIFICATION_DAYS,
        ),
        security_officer_designated: yes(keys::SECURITY_OFFICER),
        privacy_officer_designated: yes(keys::PRIVACY_OFFICER),

        facility_access_controls: !matches!(
            FacilityAccessAnswer::parse(answer(keys::FACILITY_ACCESS)),
            FacilityAccessAnswer::No | FacilityAccessAnswer::Unrecognized
        ),
        workstation_security: yes(keys::WORKSTATION_SECURITY),
        device_disposal: match DeviceDisposalAnswer::parse(answer(keys::DEVICE_DISPOSAL)) {
            DeviceDisposalAnswer::CertifiedDestruction => DisposalMethod::CertifiedDestruction,
            DeviceDisposalAnswer::Wipe => DisposalMethod::SecureWipe,
            DeviceDisposalAnswer::No | DeviceDisposalAnswer::Unrecognized => DisposalMethod::None,
        },
        visitor_logs: yes(keys::VISITOR_LOGS),

        firewall_enabled: matches!(
            FirewallAnswer::parse(answer(keys::FIREWALL)),
            FirewallAnswer::Managed | FirewallAnswer::Yes
        ),
        endpoint_protection,
        antivirus_enabled: endpoint_protection != EndpointProtection::None,
        ehr_system: parse_optional_name(answer(keys::EHR_SYSTEM)),
        cloud_providers: parse_list(answer(keys::CLOUD_PROVIDERS)),
        phi_locations: parse_list(answer(keys::PHI_LOCATIONS)),
        telehealth_enabled: yes(keys::TELEHEALTH),
        patient_portal: yes(keys::PATIENT_PORTAL),

        notice_of_privacy_practices: yes(keys::NOTICE_OF_PRIVACY_PRACTICES),
        minimum_necessary_policy: yes(keys::MINIMUM_NECESSARY),
    }
}

fn mfa_scope(answer: MfaAnswer) -> MfaScope {
    match answer {
        MfaAnswer::YesAll => MfaScope::AllUsers,
        MfaAnswer::YesRemote => MfaScope::RemoteOnly,
        // An unqualified "yes" is credited with the narrowest scope.
        MfaAnswer::Yes => MfaScope::PrivilegedOnly,
        MfaAnswer::No | MfaAnswer::Unrecognized => MfaScope::None,
    }
}

fn review_frequency(answer: ReviewCadenceAnswer) -> ReviewFrequency {
    match answer {
        ReviewCadenceAnswer::Quarterly => ReviewFrequency::Quarterly,
        ReviewCadenceAnswer::SemiAnnual => ReviewFrequency::SemiAnnual,
        ReviewCadenceAnswer::Annual => ReviewFrequency::Annual,
        ReviewCadenceAnswer::Never | ReviewCadenceAnswer::Unrecognized => ReviewFrequency::Never,
    }
}

fn remote_access_method(answer: RemoteAccessAnswer) -> RemoteAccessMethod {
    match answer {
        RemoteAccessAnswer::Vpn => RemoteAccessMethod::Vpn,
        RemoteAccessAnswer::ZeroTrust => RemoteAccessMethod::ZeroTrust,
        RemoteAccessAnswer::Rdp => RemoteAccessMethod::DirectRdp,
        RemoteAccessAnswer::No | RemoteAccessAnswer::Unrecognized => RemoteAccessMethod::None,
    }
}

/// The encryption standard answer is free text, so substrings are checked from
/// the strongest claim down and the first hit wins.
fn encryption_standard(raw: Option<&str>) -> EncryptionStandard {
    let Some(raw) = raw else {
        return EncryptionStandard::None;
    };
    let token = normalize_token(raw);
    if token.is_empty() || token == "none" || token == "no" {
        return EncryptionStandard::None;
    }

    let compact = token.replace('-', "");
    if compact.contains("aes256") || compact.contains("256") {
        EncryptionStandard::Aes256
    } else if compact.contains("aes128") || compact.contains("128") {
        EncryptionStandard::Aes128
    } else if compact.contains("fips") {
        EncryptionStandard::Fips140
    } else if compact.contains("aes") {
        EncryptionStandard::AesUnspecified
    } else {
        EncryptionStandard::Other
    }
}

fn encryption_scope(at_rest: bool, in_transit: bool) -> EncryptionScope {
    match (at_rest, in_transit) {
        (true, true) => EncryptionScope::Full,
        (true, false) => EncryptionScope::AtRestOnly,
        (false, true) => EncryptionScope::InTransitOnly,
        (false, false) => EncryptionScope::None,
    }
}

fn parse_count(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let mut items: Vec<String> = Vec::new();
    for item in raw.split([',', ';', '\n']) {
        let item = item.trim();
        if item.is_empty() || item.eq_ignore_ascii_case("none") {
            continue;
        }
        if !items.iter().any(|existing| existing.eq_ignore_ascii_case(item)) {
            items.push(item.to_string());
        }
    }
    items
}

fn parse_optional_name(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .filter(|value| !matches!(normalize_token(value).as_str(), "none" | "no" | "n/a"))
        .map(str::to_string)
}
