use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::classifier::{classify, BreachDetails, LegalStatus};

/// Days after discovery for individual notice and, for large breaches,
/// HHS and media notice.
pub const NOTIFICATION_WINDOW_DAYS: u64 = 60;
/// Affected-individual count at which HHS must be notified contemporaneously.
pub const HHS_IMMEDIATE_THRESHOLD: u32 = 500;
/// Residents of a single state above which media notice is required.
pub const MEDIA_NOTICE_THRESHOLD: u32 = 500;

/// Regulatory notification duties derived from a breach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationObligations {
    pub status: LegalStatus,
    /// Set while encryption status is unconfirmed; deadlines are shown so
    /// they are not missed if the incident turns out to be reportable.
    pub provisional: bool,
    pub notify_individuals: bool,
    pub individual_notice_due: Option<NaiveDate>,
    pub notify_hhs_immediately: bool,
    pub hhs_notice_due: Option<NaiveDate>,
    pub media_notice_required: bool,
    pub media_notice_states: Vec<String>,
    pub media_notice_due: Option<NaiveDate>,
}

impl NotificationObligations {
    pub fn none(status: LegalStatus) -> Self {
        Self {
            status,
            provisional: false,
            notify_individuals: false,
            individual_notice_due: None,
            notify_hhs_immediately: false,
            hhs_notice_due: None,
            media_notice_required: false,
            media_notice_states: Vec::new(),
            media_notice_due: None,
        }
    }
}

fn within_window(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(NOTIFICATION_WINDOW_DAYS))
}

/// HHS deadline for breaches under the immediate threshold: 60 days after
/// the end of the calendar year of discovery.
fn annual_log_deadline(discovered: NaiveDate) -> Option<NaiveDate> {
    use chrono::Datelike;

    NaiveDate::from_ymd_opt(discovered.year(), 12, 31).and_then(within_window)
}

pub fn notification_obligations(details: &BreachDetails) -> NotificationObligations {
    let status = classify(details);
    if status == LegalStatus::NotReportable {
        return NotificationObligations::none(status);
    }

    let large = details.individuals_affected >= HHS_IMMEDIATE_THRESHOLD;
    let media_notice_states: Vec<String> = details
        .residents_by_state
        .iter()
        .filter(|(_, residents)| **residents > MEDIA_NOTICE_THRESHOLD)
        .map(|(state, _)| state.clone())
        .collect();
    let media_notice_required = if details.residents_by_state.is_empty() {
        details.individuals_affected > MEDIA_NOTICE_THRESHOLD
    } else {
        !media_notice_states.is_empty()
    };

    let discovered = details.discovered_on;
    let individual_notice_due = discovered.and_then(within_window);
    let hhs_notice_due = discovered.and_then(|date| {
        if large {
            within_window(date)
        } else {
            annual_log_deadline(date)
        }
    });

    NotificationObligations {
        status,
        provisional: status == LegalStatus::UnderInvestigation,
        notify_individuals: true,
        individual_notice_due,
        notify_hhs_immediately: large,
        hhs_notice_due,
        media_notice_required,
        media_notice_states,
        media_notice_due: if media_notice_required {
            individual_notice_due
        } else {
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::breach::EncryptionStatus;

    fn reportable(affected: u32, discovered: &str) -> BreachDetails {
        BreachDetails {
            encrypted_at_rest: EncryptionStatus::No,
            encrypted_in_transit: EncryptionStatus::Yes,
            individuals_affected: affected,
            discovered_on: Some(discovered.parse().expect("valid date")),
            ..BreachDetails::default()
        }
    }

    #[test]
    fn small_breach_reports_to_hhs_after_year_end() {
        let obligations = notification_obligations(&reportable(12, "2026-04-10"));
        assert!(obligations.notify_individuals);
        assert_eq!(obligations.individual_notice_due, NaiveDate::from_ymd_opt(2026, 6, 9));
        assert!(!obligations.notify_hhs_immediately);
        assert_eq!(obligations.hhs_notice_due, NaiveDate::from_ymd_opt(2027, 3, 1));
        assert!(!obligations.media_notice_required);
    }

    #[test]
    fn large_breach_requires_immediate_hhs_and_media_notice() {
        let mut details = reportable(900, "2026-04-10");
        details.residents_by_state.insert("OR".into(), 700);
        details.residents_by_state.insert("WA".into(), 200);

        let obligations = notification_obligations(&details);
        assert!(obligations.notify_hhs_immediately);
        assert_eq!(obligations.hhs_notice_due, NaiveDate::from_ymd_opt(2026, 6, 9));
        assert!(obligations.media_notice_required);
        assert_eq!(obligations.media_notice_states, vec!["OR".to_string()]);
    }

    #[test]
    fn safe_harbor_has_no_duties_and_investigation_is_provisional() {
        let mut details = reportable(900, "2026-04-10");
        details.encrypted_at_rest = EncryptionStatus::Yes;
        let obligations = notification_obligations(&details);
        assert_eq!(obligations, NotificationObligations::none(LegalStatus::NotReportable));

        details.encrypted_in_transit = EncryptionStatus::Unknown;
        let obligations = notification_obligations(&details);
        assert!(obligations.provisional);
        assert!(obligations.individual_notice_due.is_some());
    }
}
