use chrono::NaiveDate;
use serde::Serialize;

use super::classifier::{classify, legal_defense_statement, BreachDetails, LegalStatus};
use super::obligations::{notification_obligations, NotificationObligations};
use crate::workflows::documents::OrganizationData;
use crate::workflows::templates::{format_long_date, render_with, RenderContext, NOT_PROVIDED};

const BREACH_NOTICE_TEMPLATE: &str = include_str!("../../../templates/breach-notice.md");

/// Classification, duties, and the rendered letter for one incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreachNotice {
    pub status: LegalStatus,
    pub legal_defense: Option<String>,
    pub obligations: NotificationObligations,
    pub letter: String,
}

fn date_value(date: Option<NaiveDate>) -> String {
    date.map(format_long_date)
        .unwrap_or_else(|| NOT_PROVIDED.to_string())
}

pub fn breach_notice(
    organization: &OrganizationData,
    details: &BreachDetails,
    notice_date: NaiveDate,
) -> BreachNotice {
    let status = classify(details);
    let legal_defense = legal_defense_statement(details);
    let obligations = notification_obligations(details);

    let description = match details.description.trim() {
        "" => NOT_PROVIDED.to_string(),
        text => text.to_string(),
    };
    let phi_involved = if details.phi_involved.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        details.phi_involved.join(", ")
    };

    let context = RenderContext::new(organization)
        .with_flag("IS_REPORTABLE", status == LegalStatus::Reportable)
        .with_flag("IS_NOT_REPORTABLE", status == LegalStatus::NotReportable)
        .with_flag(
            "IS_UNDER_INVESTIGATION",
            status == LegalStatus::UnderInvestigation,
        )
        .with_flag(
            "REQUIRES_IMMEDIATE_HHS_NOTICE",
            obligations.notify_hhs_immediately,
        )
        .with_flag("REQUIRES_MEDIA_NOTICE", obligations.media_notice_required)
        .with_value("NoticeDate", format_long_date(notice_date))
        .with_value("DiscoveryDate", date_value(details.discovered_on))
        .with_value("IndividualsAffected", details.individuals_affected.to_string())
        .with_value("BreachDescription", description)
        .with_value("PhiInvolved", phi_involved)
        .with_value(
            "IndividualNoticeDeadline",
            date_value(obligations.individual_notice_due),
        )
        .with_value("HhsNoticeDeadline", date_value(obligations.hhs_notice_due))
        .with_value(
            "LegalDefenseStatement",
            legal_defense.clone().unwrap_or_default(),
        );

    BreachNotice {
        status,
        legal_defense,
        obligations,
        letter: render_with(BREACH_NOTICE_TEMPLATE, &context),
    }
}
