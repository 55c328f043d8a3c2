use async_trait::async_trait;

use super::domain::{OrganizationData, OrganizationId};
use crate::workflows::evidence::EvidenceRecord;
use crate::workflows::questionnaire::AnswerMap;

/// Persistent store holding organizations, their questionnaire answers, and
/// uploaded evidence. The only I/O boundary of document generation.
#[async_trait]
pub trait ComplianceStore: Send + Sync {
    async fn organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<OrganizationData>, StoreError>;

    async fn answers(&self, id: &OrganizationId) -> Result<AnswerMap, StoreError>;

    async fn evidence(&self, id: &OrganizationId) -> Result<Vec<EvidenceRecord>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("stored record is malformed: {0}")]
    Corrupt(String),
}
