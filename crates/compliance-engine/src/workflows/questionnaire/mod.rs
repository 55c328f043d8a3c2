//! Questionnaire answers and their normalization into a typed compliance state.

pub mod answers;
mod normalizer;
mod state;

pub use answers::{keys, AnswerMap};
pub use normalizer::{normalize, DEFAULT_BREACH_NOTIFICATION_DAYS, DEFAULT_LOG_RETENTION_YEARS};
pub use state::{
    AccessModel, BaaCoverage, BackupFrequency, ComplianceState, DisposalMethod,
    EncryptionScope, EncryptionStandard, EndpointProtection, LogReviewFrequency, MfaScope,
    PatchManagement, RemoteAccessMethod, ReviewFrequency, StateValue, TrainingFrequency,
};
