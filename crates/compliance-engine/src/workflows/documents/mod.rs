//! Organization facts, the store boundary, and the orchestrator that turns
//! answers, templates, and evidence into finished policy documents.

pub mod domain;
pub mod orchestrator;
pub mod router;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    Address, Contact, EntityType, OrganizationData, OrganizationId, PolicyId, UnknownPolicy,
};
pub use orchestrator::{
    BatchReport, DocumentOrchestrator, EvidenceReport, GeneratedDocument, GenerationError,
    GenerationOptions, OrganizationValidationError, PolicyOutcome, PolicyStatus,
};
pub use router::document_router;
pub use store::{ComplianceStore, StoreError};
