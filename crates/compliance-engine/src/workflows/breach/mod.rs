//! Breach legal classification, notification duties, and notice letters.

mod classifier;
mod notice;
mod obligations;

pub use classifier::{
    classify, legal_defense_statement, BreachDetails, EncryptionStatus, LegalStatus,
    LEGAL_DEFENSE_STATEMENT,
};
pub use notice::{breach_notice, BreachNotice};
pub use obligations::{
    notification_obligations, NotificationObligations, HHS_IMMEDIATE_THRESHOLD,
    MEDIA_NOTICE_THRESHOLD, NOTIFICATION_WINDOW_DAYS,
};
