use chrono::NaiveDate;

use crate::workflows::documents::{Contact, EntityType, OrganizationData};

pub const NOT_PROVIDED: &str = "Not Provided";
pub const NOT_ASSIGNED: &str = "Not Assigned";

/// Long-form calendar date used everywhere a date reaches document prose.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn or_marker(value: Option<&str>, marker: &str) -> String {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => marker.to_string(),
    }
}

fn provided(value: &str) -> String {
    or_marker(Some(value), NOT_PROVIDED)
}

fn representative(org: &OrganizationData) -> Option<&Contact> {
    org.authorized_representative.as_ref()
}

fn date_or_marker(date: Option<NaiveDate>) -> String {
    date.map(format_long_date)
        .unwrap_or_else(|| NOT_PROVIDED.to_string())
}

/// Resolve an organization placeholder. Unknown names return `None` and stay
/// in the text for later stages.
pub(crate) fn organization_placeholder(org: &OrganizationData, name: &str) -> Option<String> {
    let value = match name {
        "OrganizationName" | "LegalName" => provided(&org.legal_name),
        "DBAName" => or_marker(org.dba_name.as_deref(), NOT_PROVIDED),
        "DisplayName" => match org.dba_name.as_deref().map(str::trim) {
            Some(dba) if !dba.is_empty() => dba.to_string(),
            _ => provided(&org.legal_name),
        },
        "Address" => org
            .address
            .single_line()
            .unwrap_or_else(|| NOT_PROVIDED.to_string()),
        "Street" => provided(&org.address.street),
        "City" => provided(&org.address.city),
        "State" => provided(&org.address.state),
        "PostalCode" => provided(&org.address.postal_code),
        "Phone" => or_marker(org.phone.as_deref(), NOT_PROVIDED),
        "Website" => or_marker(org.website.as_deref(), NOT_PROVIDED),
        "EIN" => provided(&org.ein),
        "NPI" => provided(&org.npi),
        "CLIANumber" => or_marker(org.clia_number.as_deref(), NOT_PROVIDED),
        "LicenseNumbers" => {
            let licenses: Vec<&str> = org
                .license_numbers
                .iter()
                .map(|license| license.trim())
                .filter(|license| !license.is_empty())
                .collect();
            if licenses.is_empty() {
                NOT_PROVIDED.to_string()
            } else {
                licenses.join(", ")
            }
        }
        "EntityType" => org.entity_type.label().to_string(),
        "PrivacyOfficerName" => provided(&org.privacy_officer.name),
        "PrivacyOfficerEmail" => provided(&org.privacy_officer.email),
        "PrivacyOfficerPhone" => or_marker(org.privacy_officer.phone.as_deref(), NOT_PROVIDED),
        "SecurityOfficerName" => provided(&org.security_officer.name),
        "SecurityOfficerEmail" => provided(&org.security_officer.email),
        "SecurityOfficerPhone" => or_marker(org.security_officer.phone.as_deref(), NOT_PROVIDED),
        "AuthorizedRepresentativeName" => {
            or_marker(representative(org).map(|rep| rep.name.as_str()), NOT_PROVIDED)
        }
        "AuthorizedRepresentativeTitle" => or_marker(
            representative(org).and_then(|rep| rep.title.as_deref()),
            NOT_PROVIDED,
        ),
        "AuthorizedRepresentativeEmail" => {
            or_marker(representative(org).map(|rep| rep.email.as_str()), NOT_PROVIDED)
        }
        "PolicyId" => or_marker(org.current_policy_id.as_deref(), NOT_ASSIGNED),
        "PolicyVersion" => or_marker(org.policy_version.as_deref(), NOT_ASSIGNED),
        "EffectiveDate" => date_or_marker(org.effective_date),
        "ReviewDate" => date_or_marker(org.review_date),
        _ => return None,
    };

    Some(value)
}

/// Organization-derived booleans available to `{{#IF_...}}` blocks.
pub(crate) fn organization_condition(org: &OrganizationData, name: &str) -> Option<bool> {
    let present = |value: Option<&str>| value.map(|v| !v.trim().is_empty()).unwrap_or(false);

    let value = match name {
        "HAS_DBA" => present(org.dba_name.as_deref()),
        "HAS_WEBSITE" => present(org.website.as_deref()),
        "HAS_NPI" => present(Some(org.npi.as_str())),
        "HAS_CLIA" => present(org.clia_number.as_deref()),
        "PERFORMS_LAB_TESTS" => org.performs_lab_tests,
        "IS_COVERED_ENTITY" => matches!(
            org.entity_type,
            EntityType::CoveredEntity | EntityType::HybridEntity
        ),
        "IS_BUSINESS_ASSOCIATE" => org.entity_type == EntityType::BusinessAssociate,
        "IS_HYBRID_ENTITY" => org.entity_type == EntityType::HybridEntity,
        "HAS_AUTHORIZED_REPRESENTATIVE" => org
            .authorized_representative
            .as_ref()
            .map(|rep| !rep.name.trim().is_empty())
            .unwrap_or(false),
        "HAS_SEPARATE_SECURITY_OFFICER" => {
            let privacy = org.privacy_officer.name.trim();
            let security = org.security_officer.name.trim();
            !security.is_empty() && !security.eq_ignore_ascii_case(privacy)
        }
        _ => return None,
    };

    Some(value)
}
