use std::collections::BTreeMap;

use crate::workflows::documents::PolicyId;

const MASTER_SECURITY_POLICY: &str = include_str!("../../../templates/master-security-policy.md");
const RISK_ASSESSMENT: &str = include_str!("../../../templates/risk-assessment.md");
const ACCESS_CONTROL: &str = include_str!("../../../templates/access-control.md");
const INCIDENT_RESPONSE: &str = include_str!("../../../templates/incident-response.md");
const BREACH_NOTIFICATION: &str = include_str!("../../../templates/breach-notification.md");
const BUSINESS_ASSOCIATE: &str = include_str!("../../../templates/business-associate.md");
const WORKFORCE_TRAINING: &str = include_str!("../../../templates/workforce-training.md");
const CONTINGENCY_PLAN: &str = include_str!("../../../templates/contingency-plan.md");
const NOTICE_OF_PRIVACY_PRACTICES: &str =
    include_str!("../../../templates/notice-of-privacy-practices.md");

/// Built-in base content for a policy.
pub fn builtin_template(policy: PolicyId) -> &'static str {
    match policy {
        PolicyId::MasterSecurityPolicy => MASTER_SECURITY_POLICY,
        PolicyId::RiskAssessment => RISK_ASSESSMENT,
        PolicyId::AccessControl => ACCESS_CONTROL,
        PolicyId::IncidentResponse => INCIDENT_RESPONSE,
        PolicyId::BreachNotification => BREACH_NOTIFICATION,
        PolicyId::BusinessAssociate => BUSINESS_ASSOCIATE,
        PolicyId::WorkforceTraining => WORKFORCE_TRAINING,
        PolicyId::ContingencyPlan => CONTINGENCY_PLAN,
        PolicyId::NoticeOfPrivacyPractices => NOTICE_OF_PRIVACY_PRACTICES,
    }
}

/// Error raised when base content exists but cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template for {0} is empty")]
    Empty(PolicyId),
    #[error("template for {policy} unavailable: {reason}")]
    Unavailable { policy: PolicyId, reason: String },
}

/// Source of base policy content. `Ok(None)` means no content is supplied
/// for the policy, which skips it rather than failing.
pub trait TemplateSource: Send + Sync {
    fn base_content(&self, policy: PolicyId) -> Result<Option<String>, TemplateError>;
}

/// In-process template set, defaulting to the built-in content.
#[derive(Debug, Clone)]
pub struct StaticTemplateLibrary {
    templates: BTreeMap<PolicyId, String>,
}

impl Default for StaticTemplateLibrary {
    fn default() -> Self {
        Self {
            templates: PolicyId::ALL
                .into_iter()
                .map(|policy| (policy, builtin_template(policy).to_string()))
                .collect(),
        }
    }
}

impl StaticTemplateLibrary {
    pub fn empty() -> Self {
        Self {
            templates: BTreeMap::new(),
        }
    }

    pub fn without(mut self, policy: PolicyId) -> Self {
        self.templates.remove(&policy);
        self
    }

    pub fn with_override(mut self, policy: PolicyId, content: impl Into<String>) -> Self {
        self.templates.insert(policy, content.into());
        self
    }
}

impl TemplateSource for StaticTemplateLibrary {
    fn base_content(&self, policy: PolicyId) -> Result<Option<String>, TemplateError> {
        match self.templates.get(&policy) {
            Some(content) if content.trim().is_empty() => Err(TemplateError::Empty(policy)),
            Some(content) => Ok(Some(content.clone())),
            None => Ok(None),
        }
    }
}
