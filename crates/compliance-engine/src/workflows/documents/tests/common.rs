use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::documents::{
    Address, ComplianceStore, Contact, DocumentOrchestrator, EntityType, GenerationOptions,
    OrganizationData, OrganizationId, StoreError,
};
use crate::workflows::evidence::{EvidenceRecord, EvidenceType};
use crate::workflows::questionnaire::{keys, AnswerMap};
use crate::workflows::templates::StaticTemplateLibrary;

pub(super) const ORG_ID: &str = "org-harbor";

pub(super) fn organization() -> OrganizationData {
    OrganizationData {
        id: OrganizationId::new(ORG_ID),
        legal_name: "Harbor Family Clinic LLC".to_string(),
        dba_name: Some("Harbor Health".to_string()),
        address: Address {
            street: "200 Pier Ave".to_string(),
            city: "Astoria".to_string(),
            state: "OR".to_string(),
            postal_code: "97103".to_string(),
        },
        phone: Some("503-555-0100".to_string()),
        website: Some("https://harbor.example".to_string()),
        ein: "93-1234567".to_string(),
        npi: "1457390001".to_string(),
        license_numbers: vec!["OR-CL-4411".to_string()],
        clia_number: None,
        performs_lab_tests: false,
        entity_type: EntityType::CoveredEntity,
        privacy_officer: Contact::new("Dana Reyes", "privacy@harbor.example"),
        security_officer: Contact::new("Lee Park", "security@harbor.example"),
        authorized_representative: Some(Contact {
            title: Some("Managing Partner".to_string()),
            ..Contact::new("Morgan Ellis", "morgan@harbor.example")
        }),
        current_policy_id: Some("HFC-2026".to_string()),
        policy_version: Some("1.0".to_string()),
        effective_date: NaiveDate::from_ymd_opt(2026, 1, 15),
        review_date: NaiveDate::from_ymd_opt(2027, 1, 15),
    }
}

pub(super) fn answers() -> AnswerMap {
    [
        (keys::MFA, "yes-all"),
        (keys::PASSWORD_POLICY, "12 characters, complex"),
        (keys::ENCRYPTION_AT_REST, "full-disk"),
        (keys::ENCRYPTION_IN_TRANSIT, "yes"),
        (keys::DATA_BACKUP, "daily"),
        (keys::RISK_ASSESSMENT, "yes"),
        (keys::SECURITY_TRAINING, "annual"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}

pub(super) fn record(title: &str, field_id: Option<&str>, day: u32) -> EvidenceRecord {
    EvidenceRecord {
        id: format!("ev-{day:02}"),
        title: title.to_string(),
        evidence_type: EvidenceType::Document,
        uploaded_at: Utc
            .with_ymd_and_hms(2026, 2, day, 10, 0, 0)
            .single()
            .expect("valid timestamp"),
        attested_at: None,
        file_name: None,
        file_reference: None,
        field_id: field_id.map(str::to_string),
    }
}

/// Evidence covering every high-priority item of the access control policy.
pub(super) fn access_control_evidence() -> Vec<EvidenceRecord> {
    vec![
        record("Okta MFA enforcement export", Some("mfa-configuration"), 3),
        record("Access Review Log Q1", None, 4),
    ]
}

#[derive(Default)]
pub(super) struct MemoryStore {
    organizations: Mutex<HashMap<OrganizationId, OrganizationData>>,
    answers: Mutex<HashMap<OrganizationId, AnswerMap>>,
    evidence: Mutex<HashMap<OrganizationId, Vec<EvidenceRecord>>>,
}

impl MemoryStore {
    pub(super) fn with(
        organization: OrganizationData,
        answers: AnswerMap,
        evidence: Vec<EvidenceRecord>,
    ) -> Self {
        let store = Self::default();
        let id = organization.id.clone();
        store
            .answers
            .lock()
            .expect("answers mutex poisoned")
            .insert(id.clone(), answers);
        store
            .evidence
            .lock()
            .expect("evidence mutex poisoned")
            .insert(id.clone(), evidence);
        store
            .organizations
            .lock()
            .expect("organization mutex poisoned")
            .insert(id, organization);
        store
    }
}

#[async_trait]
impl ComplianceStore for MemoryStore {
    async fn organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<OrganizationData>, StoreError> {
        Ok(self
            .organizations
            .lock()
            .expect("organization mutex poisoned")
            .get(id)
            .cloned())
    }

    async fn answers(&self, id: &OrganizationId) -> Result<AnswerMap, StoreError> {
        Ok(self
            .answers
            .lock()
            .expect("answers mutex poisoned")
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    async fn evidence(&self, id: &OrganizationId) -> Result<Vec<EvidenceRecord>, StoreError> {
        Ok(self
            .evidence
            .lock()
            .expect("evidence mutex poisoned")
            .get(id)
            .cloned()
            .unwrap_or_default())
    }
}

pub(super) struct UnavailableStore;

#[async_trait]
impl ComplianceStore for UnavailableStore {
    async fn organization(
        &self,
        _id: &OrganizationId,
    ) -> Result<Option<OrganizationData>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn answers(&self, _id: &OrganizationId) -> Result<AnswerMap, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn evidence(&self, _id: &OrganizationId) -> Result<Vec<EvidenceRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn orchestrator_with(
    store: MemoryStore,
    templates: StaticTemplateLibrary,
    options: GenerationOptions,
) -> DocumentOrchestrator<MemoryStore, StaticTemplateLibrary> {
    DocumentOrchestrator::standard(Arc::new(store), Arc::new(templates), options)
}

pub(super) fn orchestrator() -> DocumentOrchestrator<MemoryStore, StaticTemplateLibrary> {
    orchestrator_with(
        MemoryStore::with(organization(), answers(), access_control_evidence()),
        StaticTemplateLibrary::default(),
        GenerationOptions::default(),
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
