//! Evidence catalog, per-policy injection map, and the engine that resolves
//! evidence references inside rendered documents.

mod catalog;
pub mod domain;
mod injection;
mod mapping;
mod register;

pub use catalog::EvidenceCatalog;
pub use domain::{
    EvidenceCategory, EvidenceFieldConfig, EvidencePriority, EvidenceRecord, EvidenceType,
};
pub use injection::{
    EvidenceInjector, EvidenceValidation, EVIDENCE_APPENDIX_HEADING, EVIDENCE_REFERENCES_HEADING,
};
pub use mapping::{
    DateField, EvidenceInjectionPoint, EvidenceSection, InjectionPosition, InjectionType,
    PolicyEvidenceMap, PolicyEvidenceMapping,
};
pub use register::{
    generate_evidence_id, summary_section, EvidenceRegister, RegisterEntry, RegisterExportError,
    RegisterStatus, EVIDENCE_SUMMARY_HEADING,
};
