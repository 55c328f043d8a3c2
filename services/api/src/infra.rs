use async_trait::async_trait;
use chrono::NaiveDate;
use compliance_engine::error::AppError;
use compliance_engine::workflows::documents::{
    ComplianceStore, OrganizationData, OrganizationId, StoreError,
};
use compliance_engine::workflows::evidence::EvidenceRecord;
use compliance_engine::workflows::questionnaire::AnswerMap;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Everything the engine needs about one organization, as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OrganizationFixture {
    pub(crate) organization: OrganizationData,
    #[serde(default)]
    pub(crate) answers: AnswerMap,
    #[serde(default)]
    pub(crate) evidence: Vec<EvidenceRecord>,
}

impl OrganizationFixture {
    pub(crate) fn id(&self) -> &OrganizationId {
        &self.organization.id
    }
}

pub(crate) fn load_fixture(path: &Path) -> Result<OrganizationFixture, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryComplianceStore {
    fixtures: Arc<Mutex<HashMap<OrganizationId, OrganizationFixture>>>,
}

impl InMemoryComplianceStore {
    pub(crate) fn with_fixtures(fixtures: impl IntoIterator<Item = OrganizationFixture>) -> Self {
        let fixtures: HashMap<_, _> = fixtures
            .into_iter()
            .map(|fixture| (fixture.id().clone(), fixture))
            .collect();
        Self {
            fixtures: Arc::new(Mutex::new(fixtures)),
        }
    }

    pub(crate) fn insert(&self, fixture: OrganizationFixture) -> Result<(), StoreError> {
        let mut guard = self.fixtures.lock().map_err(|_| poisoned())?;
        guard.insert(fixture.id().clone(), fixture);
        Ok(())
    }

    fn read<T>(
        &self,
        id: &OrganizationId,
        select: impl FnOnce(&OrganizationFixture) -> T,
    ) -> Result<Option<T>, StoreError> {
        let guard = self
            .fixtures
            .lock()
            .map_err(|_| poisoned())?;
        Ok(guard.get(id).map(select))
    }
}

#[async_trait]
impl ComplianceStore for InMemoryComplianceStore {
    async fn organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<OrganizationData>, StoreError> {
        self.read(id, |fixture| fixture.organization.clone())
    }

    async fn answers(&self, id: &OrganizationId) -> Result<AnswerMap, StoreError> {
        Ok(self
            .read(id, |fixture| fixture.answers.clone())?
            .unwrap_or_default())
    }

    async fn evidence(&self, id: &OrganizationId) -> Result<Vec<EvidenceRecord>, StoreError> {
        Ok(self
            .read(id, |fixture| fixture.evidence.clone())?
            .unwrap_or_default())
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("fixture store mutex poisoned".to_string())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
