//! Closed answer vocabularies for every questionnaire key the normalizer reads.
//!
//! Each question gets its own enum with an `Unrecognized` variant. Absent keys
//! and tokens outside the vocabulary both parse to `Unrecognized`, which the
//! normalizer always maps to the conservative branch.

use std::collections::BTreeMap;

/// Raw questionnaire answers keyed by stable question identifiers.
pub type AnswerMap = BTreeMap<String, String>;

/// Stable question identifiers.
pub mod keys {
    pub const MFA: &str = "multi-factor-authentication";
    pub const PASSWORD_POLICY: &str = "password-policy";
    pub const PASSWORD_ROTATION_DAYS: &str = "password-rotation-days";
    pub const UNIQUE_USER_IDS: &str = "unique-user-ids";
    pub const AUTOMATIC_LOGOFF: &str = "automatic-logoff";
    pub const ACCESS_CONTROL_MODEL: &str = "access-control-model";
    pub const ACCESS_REVIEWS: &str = "access-reviews";
    pub const EMERGENCY_ACCESS: &str = "emergency-access";
    pub const PRIVILEGED_ACCESS: &str = "privileged-access-management";
    pub const REMOTE_ACCESS: &str = "remote-access";
    pub const ENCRYPTION_AT_REST: &str = "encryption-at-rest";
    pub const ENCRYPTION_IN_TRANSIT: &str = "encryption-in-transit";
    pub const ENCRYPTION_STANDARD: &str = "encryption-standard";
    pub const DEVICE_ENCRYPTION: &str = "mobile-device-encryption";
    pub const EMAIL_ENCRYPTION: &str = "email-encryption";
    pub const AUDIT_LOGGING: &str = "audit-logging";
    pub const LOG_REVIEW: &str = "log-review";
    pub const LOG_RETENTION_YEARS: &str = "log-retention-years";
    pub const INTRUSION_DETECTION: &str = "intrusion-detection";
    pub const INTEGRITY_CONTROLS: &str = "integrity-controls";
    pub const DATA_BACKUP: &str = "data-backup";
    pub const BACKUP_LOCATION: &str = "backup-location";
    pub const BACKUP_TESTING: &str = "backup-testing";
    pub const DISASTER_RECOVERY: &str = "disaster-recovery";
    pub const RTO_HOURS: &str = "recovery-time-objective-hours";
    pub const RISK_ASSESSMENT: &str = "risk-assessment";
    pub const VULNERABILITY_SCANNING: &str = "vulnerability-scanning";
    pub const PENETRATION_TESTING: &str = "penetration-testing";
    pub const PATCH_MANAGEMENT: &str = "patch-management";
    pub const SECURITY_TRAINING: &str = "security-training";
    pub const PHISHING_SIMULATION: &str = "phishing-simulation";
    pub const SANCTIONS_POLICY: &str = "sanctions-policy";
    pub const BACKGROUND_CHECKS: &str = "background-checks";
    pub const TERMINATION_PROCEDURE: &str = "termination-procedure";
    pub const WORKFORCE_SIZE: &str = "workforce-size";
    pub const BUSINESS_ASSOCIATE_AGREEMENTS: &str = "business-associate-agreements";
    pub const BUSINESS_ASSOCIATES: &str = "business-associates";
    pub const VENDOR_ASSESSMENT: &str = "vendor-risk-assessment";
    pub const INCIDENT_RESPONSE_PLAN: &str = "incident-response-plan";
    pub const BREACH_NOTIFICATION_DAYS: &str = "breach-notification-days";
    pub const SECURITY_OFFICER: &str = "security-officer";
    pub const PRIVACY_OFFICER: &str = "privacy-officer";
    pub const FACILITY_ACCESS: &str = "facility-access";
    pub const WORKSTATION_SECURITY: &str = "workstation-security";
    pub const DEVICE_DISPOSAL: &str = "device-disposal";
    pub const VISITOR_LOGS: &str = "visitor-logs";
    pub const FIREWALL: &str = "firewall";
    pub const ENDPOINT_PROTECTION: &str = "endpoint-protection";
    pub const EHR_SYSTEM: &str = "ehr-system";
    pub const CLOUD_PROVIDERS: &str = "cloud-providers";
    pub const PHI_LOCATIONS: &str = "phi-locations";
    pub const TELEHEALTH: &str = "telehealth";
    pub const PATIENT_PORTAL: &str = "patient-portal";
    pub const NOTICE_OF_PRIVACY_PRACTICES: &str = "notice-of-privacy-practices";
    pub const MINIMUM_NECESSARY: &str = "minimum-necessary-policy";
}

/// Canonical token form: trimmed, lowercase, spaces and underscores as hyphens.
pub(crate) fn normalize_token(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

macro_rules! answer_vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => [$($token:literal),+ $(,)?]),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant,)+
            Unrecognized,
        }

        impl $name {
            pub fn parse(raw: Option<&str>) -> Self {
                let Some(raw) = raw else {
                    return Self::Unrecognized;
                };
                match normalize_token(raw).as_str() {
                    $($($token)|+ => Self::$variant,)+
                    _ => Self::Unrecognized,
                }
            }
        }
    };
}

answer_vocabulary! {
    /// Plain yes/no questions.
    Affirmation {
        Yes => ["yes", "y", "true", "implemented"],
        No => ["no", "n", "false", "not-implemented"],
        Unsure => ["unsure", "unknown", "not-sure"],
    }
}

impl Affirmation {
    pub fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }
}

answer_vocabulary! {
    MfaAnswer {
        Yes => ["yes"],
        YesAll => ["yes-all", "all-users"],
        YesRemote => ["yes-remote", "remote-only"],
        No => ["no", "none"],
    }
}

answer_vocabulary! {
    AutomaticLogoffAnswer {
        Yes => ["yes"],
        After15Minutes => ["yes-15", "15-minutes"],
        After30Minutes => ["yes-30", "30-minutes"],
        No => ["no", "none"],
    }
}

answer_vocabulary! {
    AccessControlModelAnswer {
        RoleBased => ["role-based", "rbac", "yes"],
        Discretionary => ["discretionary", "individual", "user-based"],
        No => ["no", "none"],
    }
}

answer_vocabulary! {
    /// Cadence answers shared by access reviews and backup testing.
    ReviewCadenceAnswer {
        Quarterly => ["quarterly"],
        SemiAnnual => ["semi-annual", "semi-annually", "twice-yearly"],
        Annual => ["annual", "annually", "yearly"],
        Never => ["never", "no", "none"],
    }
}

answer_vocabulary! {
    LogReviewAnswer {
        Daily => ["daily"],
        Weekly => ["weekly"],
        Monthly => ["monthly"],
        Never => ["never", "no", "none"],
    }
}

answer_vocabulary! {
    RemoteAccessAnswer {
        Vpn => ["vpn", "yes-vpn"],
        ZeroTrust => ["zero-trust", "ztna"],
        Rdp => ["rdp", "remote-desktop"],
        No => ["none", "no"],
    }
}

answer_vocabulary! {
    EncryptionAtRestAnswer {
        Yes => ["yes"],
        FullDisk => ["yes-full-disk", "full-disk"],
        Database => ["yes-database", "database"],
        Partial => ["partial", "yes-partial"],
        No => ["no", "none"],
    }
}

answer_vocabulary! {
    EncryptionInTransitAnswer {
        Yes => ["yes"],
        Tls12 => ["tls-1.2", "yes-tls12", "tls12"],
        Tls13 => ["tls-1.3", "yes-tls13", "tls13"],
        No => ["no", "none"],
    }
}

answer_vocabulary! {
    EmailEncryptionAnswer {
        Always => ["yes", "always"],
        PhiOnly => ["phi-only", "yes-phi"],
        No => ["no", "never"],
    }
}

answer_vocabulary! {
    AuditLoggingAnswer {
        Local => ["yes", "local"],
        Centralized => ["centralized", "yes-centralized"],
        Siem => ["siem", "yes-siem"],
        No => ["no", "none"],
    }
}

answer_vocabulary! {
    BackupAnswer {
        Daily => ["yes-daily", "daily"],
        Weekly => ["yes-weekly", "weekly"],
        Monthly => ["yes-monthly", "monthly"],
        Yes => ["yes"],
        No => ["no", "none"],
    }
}

answer_vocabulary! {
    BackupLocationAnswer {
        Offsite => ["offsite", "off-site"],
        Cloud => ["cloud"],
        Hybrid => ["both", "hybrid"],
        Onsite => ["onsite", "on-site", "local"],
    }
}

answer_vocabulary! {
    /// Plan questions answered as documented-and-tested, documented, or absent.
    PlanAnswer {
        Tested => ["tested", "yes-tested"],
        Documented => ["documented", "yes-documented", "yes"],
        No => ["no", "none"],
    }
}

answer_vocabulary! {
    RiskAssessmentAnswer {
        Annual => ["yes-annual", "annual"],
        Recent => ["yes-recent", "yes"],
        Outdated => ["yes-outdated", "outdated"],
        No => ["no", "never"],
    }
}

answer_vocabulary! {
    VulnerabilityScanningAnswer {
        Continuous => ["continuous", "yes-continuous"],
        Monthly => ["monthly", "yes-monthly"],
        Quarterly => ["quarterly", "yes-quarterly"],
        Yes => ["yes"],
        No => ["no", "never"],
    }
}

answer_vocabulary! {
    PenetrationTestingAnswer {
        Annual => ["yes-annual", "annual"],
        Yes => ["yes"],
        No => ["no", "never"],
    }
}

answer_vocabulary! {
    PatchManagementAnswer {
        Automated => ["automated", "yes-automated"],
        Manual => ["manual", "yes-manual", "yes"],
        No => ["no", "none"],
    }
}

answer_vocabulary! {
    TrainingAnswer {
        Annual => ["yes-annual", "annual"],
        Onboarding => ["yes-onboarding", "onboarding"],
        Yes => ["yes"],
        No => ["no", "none"],
    }
}

answer_vocabulary! {
    TerminationAnswer {
        SameDay => ["same-day", "yes-same-day"],
        Documented => ["yes", "documented"],
        No => ["no", "none"],
    }
}

answer_vocabulary! {
    BusinessAssociateAnswer {
        All => ["yes-all", "all"],
        Partial => ["yes-some", "some", "partial"],
        Yes => ["yes"],
        No => ["no", "none"],
        NotApplicable => ["n/a", "na", "not-applicable", "no-vendors"],
    }
}

answer_vocabulary! {
    FacilityAccessAnswer {
        Badge => ["badge", "keycard", "yes-badge"],
        Keys => ["keys", "key", "yes-keys"],
        Yes => ["yes"],
        No => ["no", "none"],
    }
}

answer_vocabulary! {
    DeviceDisposalAnswer {
        CertifiedDestruction => ["certified-destruction", "destruction", "shred"],
        Wipe => ["wipe", "secure-wipe", "yes"],
        No => ["no", "none"],
    }
}

answer_vocabulary! {
    FirewallAnswer {
        Managed => ["managed", "yes-managed"],
        Yes => ["yes"],
        No => ["no", "none"],
    }
}

answer_vocabulary! {
    EndpointProtectionAnswer {
        Edr => ["edr", "yes-edr"],
        Antivirus => ["antivirus", "yes-antivirus", "yes"],
        No => ["no", "none"],
    }
}

/// Password policy answers are free-form ("12-char-complex", "8 characters"),
/// so the minimum length is read from the first matching length substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordPolicyAnswer {
    NoPolicy,
    Enforced { min_length: u32, complex: bool },
    Unrecognized,
}

pub(crate) const DEFAULT_PASSWORD_LENGTH: u32 = 8;

impl PasswordPolicyAnswer {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Unrecognized;
        };
        let token = normalize_token(raw);
        if token.is_empty() {
            return Self::Unrecognized;
        }
        if matches!(token.as_str(), "no" | "none") {
            return Self::NoPolicy;
        }

        let complex = token.contains("complex");
        let min_length = ["12", "10", "8"]
            .iter()
            .find(|length| token.contains(*length))
            .and_then(|length| length.parse().ok());

        match min_length {
            Some(min_length) => Self::Enforced {
                min_length,
                complex,
            },
            None if complex || token == "yes" || token == "standard" => Self::Enforced {
                min_length: DEFAULT_PASSWORD_LENGTH,
                complex,
            },
            None => Self::Unrecognized,
        }
    }
}
