use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{OrganizationData, OrganizationId, PolicyId};
use super::store::{ComplianceStore, StoreError};
use crate::config::GenerationConfig;
use crate::workflows::breach::{breach_notice, BreachDetails, BreachNotice};
use crate::workflows::evidence::{
    summary_section, EvidenceCatalog, EvidenceInjector, EvidenceRecord, EvidenceRegister,
    EvidenceValidation, PolicyEvidenceMap,
};
use crate::workflows::questionnaire::{normalize, ComplianceState};
use crate::workflows::templates::{
    guard, render_guarded, unguard, unresolved_markup, RenderContext, TemplateSource,
};

/// Per-request generation switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationOptions {
    pub require_high_priority_evidence: bool,
    pub include_evidence_summary: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        GenerationConfig::default().into()
    }
}

impl From<GenerationConfig> for GenerationOptions {
    fn from(config: GenerationConfig) -> Self {
        Self {
            require_high_priority_evidence: config.require_high_priority_evidence,
            include_evidence_summary: config.include_evidence_summary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyStatus {
    Generated,
    Skipped,
    Failed,
}

impl PolicyStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PolicyStatus::Generated => "generated",
            PolicyStatus::Skipped => "skipped",
            PolicyStatus::Failed => "failed",
        }
    }
}

/// Final text for one policy plus the markup that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedDocument {
    pub policy: PolicyId,
    pub title: &'static str,
    pub content: String,
    pub unresolved_markup: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyOutcome {
    pub policy: PolicyId,
    pub status: PolicyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub evidence: EvidenceValidation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<GeneratedDocument>,
}

/// Outcome of generating the full policy set for one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub organization: OrganizationId,
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<PolicyOutcome>,
}

impl BatchReport {
    fn new(organization: OrganizationId, outcomes: Vec<PolicyOutcome>) -> Self {
        let count = |status| {
            outcomes
                .iter()
                .filter(|outcome| outcome.status == status)
                .count()
        };
        Self {
            organization,
            generated: count(PolicyStatus::Generated),
            skipped: count(PolicyStatus::Skipped),
            failed: count(PolicyStatus::Failed),
            outcomes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceReport {
    pub validation: EvidenceValidation,
    pub register: EvidenceRegister,
}

/// Organization facts required before any document is generated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("organization {organization} is missing required fields: {}", .missing.join(", "))]
pub struct OrganizationValidationError {
    pub organization: OrganizationId,
    pub missing: Vec<&'static str>,
}

/// Request-level failure. Per-policy problems are reported through
/// [`PolicyOutcome`] instead.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("organization {0} not found")]
    OrganizationNotFound(OrganizationId),
    #[error(transparent)]
    IncompleteOrganization(#[from] OrganizationValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

struct GenerationInputs {
    organization: OrganizationData,
    state: ComplianceState,
    evidence: Vec<EvidenceRecord>,
}

/// Ties normalization, rendering, and evidence injection together per
/// organization. The only component that talks to the store.
pub struct DocumentOrchestrator<S, T> {
    store: Arc<S>,
    templates: Arc<T>,
    injector: EvidenceInjector,
    options: GenerationOptions,
}

impl<S, T> DocumentOrchestrator<S, T>
where
    S: ComplianceStore + 'static,
    T: TemplateSource + 'static,
{
    pub fn new(
        store: Arc<S>,
        templates: Arc<T>,
        catalog: Arc<EvidenceCatalog>,
        map: Arc<PolicyEvidenceMap>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            store,
            templates,
            injector: EvidenceInjector::new(catalog, map),
            options,
        }
    }

    /// Orchestrator wired with the standard catalog and evidence map.
    pub fn standard(store: Arc<S>, templates: Arc<T>, options: GenerationOptions) -> Self {
        let catalog = Arc::new(EvidenceCatalog::standard());
        let map = Arc::new(PolicyEvidenceMap::standard(&catalog));
        Self::new(store, templates, catalog, map, options)
    }

    pub fn options(&self) -> GenerationOptions {
        self.options
    }

    pub fn injector(&self) -> &EvidenceInjector {
        &self.injector
    }

    /// Fetch the organization and refuse to go further while required
    /// fields are missing.
    async fn complete_organization(
        &self,
        id: &OrganizationId,
    ) -> Result<OrganizationData, GenerationError> {
        let organization = self
            .store
            .organization(id)
            .await?
            .ok_or_else(|| GenerationError::OrganizationNotFound(id.clone()))?;

        let missing = organization.missing_required_fields();
        if !missing.is_empty() {
            warn!(organization = %id, missing = ?missing, "organization data incomplete");
            return Err(OrganizationValidationError {
                organization: id.clone(),
                missing,
            }
            .into());
        }
        Ok(organization)
    }

    async fn load(&self, id: &OrganizationId) -> Result<GenerationInputs, GenerationError> {
        let organization = self.complete_organization(id).await?;
        let answers = self.store.answers(id).await?;
        let evidence = self.store.evidence(id).await?;
        debug!(
            organization = %id,
            answers = answers.len(),
            evidence = evidence.len(),
            "generation inputs loaded"
        );

        Ok(GenerationInputs {
            organization,
            state: normalize(&answers),
            evidence,
        })
    }

    pub async fn generate_policy(
        &self,
        id: &OrganizationId,
        policy: PolicyId,
    ) -> Result<PolicyOutcome, GenerationError> {
        self.generate_policy_with(id, policy, self.options).await
    }

    pub async fn generate_policy_with(
        &self,
        id: &OrganizationId,
        policy: PolicyId,
        options: GenerationOptions,
    ) -> Result<PolicyOutcome, GenerationError> {
        let inputs = self.load(id).await?;
        Ok(self.build(&inputs, policy, options))
    }

    pub async fn generate_all(&self, id: &OrganizationId) -> Result<BatchReport, GenerationError> {
        self.generate_all_with(id, self.options).await
    }

    /// Generate every policy in order. A skipped or failed policy never stops
    /// the rest of the batch.
    pub async fn generate_all_with(
        &self,
        id: &OrganizationId,
        options: GenerationOptions,
    ) -> Result<BatchReport, GenerationError> {
        let inputs = self.load(id).await?;
        let outcomes = PolicyId::ALL
            .into_iter()
            .map(|policy| self.build(&inputs, policy, options))
            .collect();

        let report = BatchReport::new(id.clone(), outcomes);
        info!(
            organization = %id,
            generated = report.generated,
            skipped = report.skipped,
            failed = report.failed,
            "policy batch complete"
        );
        Ok(report)
    }

    pub async fn evidence_report(
        &self,
        id: &OrganizationId,
        policy: PolicyId,
    ) -> Result<EvidenceReport, GenerationError> {
        let inputs = self.load(id).await?;
        Ok(EvidenceReport {
            validation: self.injector.validate(policy, &inputs.evidence),
            register: EvidenceRegister::build(&self.injector, policy, &inputs.evidence),
        })
    }

    pub async fn breach_notice(
        &self,
        id: &OrganizationId,
        details: &BreachDetails,
        notice_date: NaiveDate,
    ) -> Result<BreachNotice, GenerationError> {
        let organization = self.complete_organization(id).await?;
        let notice = breach_notice(&organization, details, notice_date);
        info!(organization = %id, status = %notice.status, "breach notice prepared");
        Ok(notice)
    }

    fn build(
        &self,
        inputs: &GenerationInputs,
        policy: PolicyId,
        options: GenerationOptions,
    ) -> PolicyOutcome {
        let id = &inputs.organization.id;
        let validation = self.injector.validate(policy, &inputs.evidence);
        let outcome = |status, reason: Option<String>, document| PolicyOutcome {
            policy,
            status,
            reason,
            evidence: validation.clone(),
            document,
        };

        if options.require_high_priority_evidence && !validation.can_generate {
            let reason = format!(
                "missing high-priority evidence: {}",
                validation.missing_high_priority.join(", ")
            );
            warn!(organization = %id, %policy, %reason, "policy skipped");
            return outcome(PolicyStatus::Skipped, Some(reason), None);
        }

        let template = match self.templates.base_content(policy) {
            Ok(Some(template)) => template,
            Ok(None) => {
                let reason = format!("no base content supplied for {policy}");
                warn!(organization = %id, %policy, %reason, "policy skipped");
                return outcome(PolicyStatus::Skipped, Some(reason), None);
            }
            Err(error) => {
                warn!(organization = %id, %policy, error = %error, "policy failed");
                return outcome(PolicyStatus::Failed, Some(error.to_string()), None);
            }
        };

        let document = self.compose(inputs, policy, &template, &validation, options);
        if !document.unresolved_markup.is_empty() {
            warn!(
                organization = %id,
                %policy,
                unresolved = ?document.unresolved_markup,
                "document contains unresolved markup"
            );
        }
        info!(
            organization = %id,
            %policy,
            coverage = validation.coverage_percent,
            "policy generated"
        );
        outcome(PolicyStatus::Generated, None, Some(document))
    }

    fn compose(
        &self,
        inputs: &GenerationInputs,
        policy: PolicyId,
        template: &str,
        validation: &EvidenceValidation,
        options: GenerationOptions,
    ) -> GeneratedDocument {
        let context = RenderContext::new(&inputs.organization).with_state(Some(&inputs.state));
        let rendered = render_guarded(template, &context);
        let mut content = self
            .injector
            .inject_guarded(&rendered, policy, &inputs.evidence);

        if options.include_evidence_summary {
            let register = EvidenceRegister::build(&self.injector, policy, &inputs.evidence);
            if !content.ends_with('\n') {
                content.push('\n');
            }
            content.push('\n');
            content.push_str(&guard(&summary_section(validation, &register)));
        }

        GeneratedDocument {
            policy,
            title: policy.title(),
            unresolved_markup: unresolved_markup(&content),
            content: unguard(&content),
        }
    }
}
