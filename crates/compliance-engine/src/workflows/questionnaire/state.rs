use serde::{Deserialize, Serialize};

macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

state_enum! {
    MfaScope {
        None => "none",
        RemoteOnly => "remote-only",
        PrivilegedOnly => "privileged-only",
        AllUsers => "all-users",
    }
}

state_enum! {
    AccessModel {
        None => "none",
        Discretionary => "discretionary",
        RoleBased => "role-based",
    }
}

state_enum! {
    /// Periodic cadence for reviews and tests.
    ReviewFrequency {
        Never => "never",
        AdHoc => "ad-hoc",
        Annual => "annual",
        SemiAnnual => "semi-annual",
        Quarterly => "quarterly",
    }
}

state_enum! {
    LogReviewFrequency {
        Never => "never",
        Monthly => "monthly",
        Weekly => "weekly",
        Daily => "daily",
    }
}

state_enum! {
    RemoteAccessMethod {
        None => "none",
        DirectRdp => "direct-rdp",
        Vpn => "vpn",
        ZeroTrust => "zero-trust",
    }
}

state_enum! {
    EncryptionStandard {
        None => "none",
        Other => "other",
        AesUnspecified => "aes",
        Fips140 => "fips-140",
        Aes128 => "aes-128",
        Aes256 => "aes-256",
    }
}

state_enum! {
    EncryptionScope {
        None => "none",
        AtRestOnly => "at-rest-only",
        InTransitOnly => "in-transit-only",
        Full => "full",
    }
}

state_enum! {
    BackupFrequency {
        None => "none",
        Monthly => "monthly",
        Weekly => "weekly",
        Daily => "daily",
    }
}

state_enum! {
    PatchManagement {
        None => "none",
        Manual => "manual",
        Automated => "automated",
    }
}

state_enum! {
    TrainingFrequency {
        None => "none",
        OnboardingOnly => "onboarding-only",
        Annual => "annual",
    }
}

state_enum! {
    BaaCoverage {
        None => "none",
        Partial => "partial",
        All => "all",
        NotApplicable => "not-applicable",
    }
}

state_enum! {
    DisposalMethod {
        None => "none",
        SecureWipe => "secure-wipe",
        CertifiedDestruction => "certified-destruction",
    }
}

state_enum! {
    EndpointProtection {
        None => "none",
        Antivirus => "antivirus",
        Edr => "edr",
    }
}

/// Normalized, typed snapshot of an organization's security controls.
///
/// Built fresh from the stored answers on every generation request and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceState {
    // Access control
    pub mfa_enabled: bool,
    pub mfa_scope: MfaScope,
    pub password_policy_enforced: bool,
    pub password_min_length: u32,
    pub password_complexity_required: bool,
    pub password_rotation_days: u32,
    pub unique_user_ids: bool,
    pub automatic_logoff: bool,
    pub session_timeout_minutes: u32,
    pub access_control_model: AccessModel,
    pub role_based_access: bool,
    pub access_review_frequency: ReviewFrequency,
    pub emergency_access_procedure: bool,
    pub privileged_access_management: bool,
    pub remote_access_method: RemoteAccessMethod,
    pub remote_access_secured: bool,

    // Encryption
    pub encryption_at_rest: bool,
    pub encryption_in_transit: bool,
    pub encryption_standard: EncryptionStandard,
    pub encryption_scope: EncryptionScope,
    pub device_encryption: bool,
    pub email_encryption: bool,

    // Audit controls
    pub audit_logging_enabled: bool,
    pub centralized_logging: bool,
    pub log_review_frequency: LogReviewFrequency,
    pub log_retention_years: u32,
    pub intrusion_detection: bool,
    pub integrity_controls: bool,

    // Contingency
    pub backups_enabled: bool,
    pub backup_frequency: BackupFrequency,
    pub offsite_backups: bool,
    pub backup_testing_frequency: ReviewFrequency,
    pub disaster_recovery_plan: bool,
    pub disaster_recovery_tested: bool,
    pub recovery_time_objective_hours: u32,

    // Risk management
    pub risk_assessment_completed: bool,
    pub risk_assessment_frequency: ReviewFrequency,
    pub vulnerability_scanning: bool,
    pub penetration_testing: bool,
    pub patch_management: PatchManagement,

    // Workforce
    pub security_training: bool,
    pub training_frequency: TrainingFrequency,
    pub phishing_simulations: bool,
    pub sanctions_policy: bool,
    pub background_checks: bool,
    pub termination_procedure: bool,
    pub same_day_access_revocation: bool,
    pub workforce_size: u32,

    // Business associates
    pub baa_management: bool,
    pub baa_coverage: BaaCoverage,
    pub business_associates: Vec<String>,
    pub vendor_risk_assessment: bool,

    // Incident response
    pub incident_response_plan: bool,
    pub incident_response_tested: bool,
    pub breach_notification_timeline_days: u32,
    pub security_officer_designated: bool,
    pub privacy_officer_designated: bool,

    // Physical safeguards
    pub facility_access_controls: bool,
    pub workstation_security: bool,
    pub device_disposal: DisposalMethod,
    pub visitor_logs: bool,

    // Technical environment
    pub firewall_enabled: bool,
    pub endpoint_protection: EndpointProtection,
    pub antivirus_enabled: bool,
    pub ehr_system: Option<String>,
    pub cloud_providers: Vec<String>,
    pub phi_locations: Vec<String>,
    pub telehealth_enabled: bool,
    pub patient_portal: bool,

    // Privacy rule
    pub notice_of_privacy_practices: bool,
    pub minimum_necessary_policy: bool,
}

/// Borrowed view of a single state field used by template conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateValue<'a> {
    Flag(bool),
    Text(&'a str),
    Number(u32),
    List(&'a [String]),
    Absent,
}

impl StateValue<'_> {
    /// Type-dependent "control not in place" predicate.
    pub fn is_missing(&self) -> bool {
        match self {
            StateValue::Flag(value) => !value,
            StateValue::Text(value) => {
                let trimmed = value.trim();
                trimmed.is_empty() || trimmed == "none" || trimmed == "never"
            }
            StateValue::Number(value) => *value == 0,
            StateValue::List(values) => values.is_empty(),
            StateValue::Absent => true,
        }
    }

    pub fn as_number(&self) -> Option<u32> {
        match self {
            StateValue::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl ComplianceState {
    /// Field names accepted by [`ComplianceState::field`], in declaration order.
    pub const FIELD_NAMES: &'static [&'static str] = &[
        "mfa_enabled",
        "mfa_scope",
        "password_policy_enforced",
        "password_min_length",
        "password_complexity_required",
        "password_rotation_days",
        "unique_user_ids",
        "automatic_logoff",
        "session_timeout_minutes",
        "access_control_model",
        "role_based_access",
        "access_review_frequency",
        "emergency_access_procedure",
        "privileged_access_management",
        "remote_access_method",
        "remote_access_secured",
        "encryption_at_rest",
        "encryption_in_transit",
        "encryption_standard",
        "encryption_scope",
        "device_encryption",
        "email_encryption",
        "audit_logging_enabled",
        "centralized_logging",
        "log_review_frequency",
        "log_retention_years",
        "intrusion_detection",
        "integrity_controls",
        "backups_enabled",
        "backup_frequency",
        "offsite_backups",
        "backup_testing_frequency",
        "disaster_recovery_plan",
        "disaster_recovery_tested",
        "recovery_time_objective_hours",
        "risk_assessment_completed",
        "risk_assessment_frequency",
        "vulnerability_scanning",
        "penetration_testing",
        "patch_management",
        "security_training",
        "training_frequency",
        "phishing_simulations",
        "sanctions_policy",
        "background_checks",
        "termination_procedure",
        "same_day_access_revocation",
        "workforce_size",
        "baa_management",
        "baa_coverage",
        "business_associates",
        "vendor_risk_assessment",
        "incident_response_plan",
        "incident_response_tested",
        "breach_notification_timeline_days",
        "security_officer_designated",
        "privacy_officer_designated",
        "facility_access_controls",
        "workstation_security",
        "device_disposal",
        "visitor_logs",
        "firewall_enabled",
        "endpoint_protection",
        "antivirus_enabled",
        "ehr_system",
        "cloud_providers",
        "phi_locations",
        "telehealth_enabled",
        "patient_portal",
        "notice_of_privacy_practices",
        "minimum_necessary_policy",
    ];

    /// Look up a field by its snake_case name. Returns `None` for names that
    /// are not part of the state so callers can fail open.
    pub fn field(&self, name: &str) -> Option<StateValue<'_>> {
        use StateValue::{Absent, Flag, List, Number, Text};

        let value = match name {
            "mfa_enabled" => Flag(self.mfa_enabled),
            "mfa_scope" => Text(self.mfa_scope.as_str()),
            "password_policy_enforced" => Flag(self.password_policy_enforced),
            "password_min_length" => Number(self.password_min_length),
            "password_complexity_required" => Flag(self.password_complexity_required),
            "password_rotation_days" => Number(self.password_rotation_days),
            "unique_user_ids" => Flag(self.unique_user_ids),
            "automatic_logoff" => Flag(self.automatic_logoff),
            "session_timeout_minutes" => Number(self.session_timeout_minutes),
            "access_control_model" => Text(self.access_control_model.as_str()),
            "role_based_access" => Flag(self.role_based_access),
            "access_review_frequency" => Text(self.access_review_frequency.as_str()),
            "emergency_access_procedure" => Flag(self.emergency_access_procedure),
            "privileged_access_management" => Flag(self.privileged_access_management),
            "remote_access_method" => Text(self.remote_access_method.as_str()),
            "remote_access_secured" => Flag(self.remote_access_secured),
            "encryption_at_rest" => Flag(self.encryption_at_rest),
            "encryption_in_transit" => Flag(self.encryption_in_transit),
            "encryption_standard" => Text(self.encryption_standard.as_str()),
            "encryption_scope" => Text(self.encryption_scope.as_str()),
            "device_encryption" => Flag(self.device_encryption),
            "email_encryption" => Flag(self.email_encryption),
            "audit_logging_enabled" => Flag(self.audit_logging_enabled),
            "centralized_logging" => Flag(self.centralized_logging),
            "log_review_frequency" => Text(self.log_review_frequency.as_str()),
            "log_retention_years" => Number(self.log_retention_years),
            "intrusion_detection" => Flag(self.intrusion_detection),
            "integrity_controls" => Flag(self.integrity_controls),
            "backups_enabled" => Flag(self.backups_enabled),
            "backup_frequency" => Text(self.backup_frequency.as_str()),
            "offsite_backups" => Flag(self.offsite_backups),
            "backup_testing_frequency" => Text(self.backup_testing_frequency.as_str()),
            "disaster_recovery_plan" => Flag(self.disaster_recovery_plan),
            "disaster_recovery_tested" => Flag(self.disaster_recovery_tested),
            "recovery_time_objective_hours" => Number(self.recovery_time_objective_hours),
            "risk_assessment_completed" => Flag(self.risk_assessment_completed),
            "risk_assessment_frequency" => Text(self.risk_assessment_frequency.as_str()),
            "vulnerability_scanning" => Flag(self.vulnerability_scanning),
            "penetration_testing" => Flag(self.penetration_testing),
            "patch_management" => Text(self.patch_management.as_str()),
            "security_training" => Flag(self.security_training),
            "training_frequency" => Text(self.training_frequency.as_str()),
            "phishing_simulations" => Flag(self.phishing_simulations),
            "sanctions_policy" => Flag(self.sanctions_policy),
            "background_checks" => Flag(self.background_checks),
            "termination_procedure" => Flag(self.termination_procedure),
            "same_day_access_revocation" => Flag(self.same_day_access_revocation),
            "workforce_size" => Number(self.workforce_size),
            "baa_management" => Flag(self.baa_management),
            "baa_coverage" => Text(self.baa_coverage.as_str()),
            "business_associates" => List(&self.business_associates),
            "vendor_risk_assessment" => Flag(self.vendor_risk_assessment),
            "incident_response_plan" => Flag(self.incident_response_plan),
            "incident_response_tested" => Flag(self.incident_response_tested),
            "breach_notification_timeline_days" => {
                Number(self.breach_notification_timeline_days)
            }
            "security_officer_designated" => Flag(self.security_officer_designated),
            "privacy_officer_designated" => Flag(self.privacy_officer_designated),
            "facility_access_controls" => Flag(self.facility_access_controls),
            "workstation_security" => Flag(self.workstation_security),
            "device_disposal" => Text(self.device_disposal.as_str()),
            "visitor_logs" => Flag(self.visitor_logs),
            "firewall_enabled" => Flag(self.firewall_enabled),
            "endpoint_protection" => Text(self.endpoint_protection.as_str()),
            "antivirus_enabled" => Flag(self.antivirus_enabled),
            "ehr_system" => match self.ehr_system.as_deref() {
                Some(system) => Text(system),
                None => Absent,
            },
            "cloud_providers" => List(&self.cloud_providers),
            "phi_locations" => List(&self.phi_locations),
            "telehealth_enabled" => Flag(self.telehealth_enabled),
            "patient_portal" => Flag(self.patient_portal),
            "notice_of_privacy_practices" => Flag(self.notice_of_privacy_practices),
            "minimum_necessary_policy" => Flag(self.minimum_necessary_policy),
            _ => return None,
        };

        Some(value)
    }

    /// Names of fields whose controls are currently missing.
    pub fn gaps(&self) -> Vec<&'static str> {
        Self::FIELD_NAMES
            .iter()
            .copied()
            .filter(|name| {
                self.field(name)
                    .map(|value| value.is_missing())
                    .unwrap_or(false)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_predicate_is_type_dependent() {
        assert!(StateValue::Flag(false).is_missing());
        assert!(!StateValue::Flag(true).is_missing());
        assert!(StateValue::Text("none").is_missing());
        assert!(StateValue::Text("never").is_missing());
        assert!(StateValue::Text("").is_missing());
        assert!(!StateValue::Text("quarterly").is_missing());
        assert!(StateValue::Number(0).is_missing());
        assert!(!StateValue::Number(6).is_missing());
        assert!(StateValue::List(&[]).is_missing());
        assert!(StateValue::Absent.is_missing());
    }

    #[test]
    fn enum_labels_match_serialized_form() {
        let json = serde_json::to_string(&MfaScope::AllUsers).expect("serializes");
        assert_eq!(json, "\"all-users\"");
        assert_eq!(EncryptionStandard::Aes256.as_str(), "aes-256");
    }
}
