use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{OrganizationId, PolicyId};
use super::orchestrator::{DocumentOrchestrator, GenerationError, GenerationOptions, PolicyStatus};
use super::store::ComplianceStore;
use crate::workflows::breach::{
    classify, legal_defense_statement, notification_obligations, BreachDetails,
};
use crate::workflows::questionnaire::{normalize, AnswerMap};
use crate::workflows::templates::TemplateSource;

type SharedOrchestrator<S, T> = Arc<DocumentOrchestrator<S, T>>;

/// Router builder exposing questionnaire, breach, evidence, and generation
/// endpoints.
pub fn document_router<S, T>(orchestrator: SharedOrchestrator<S, T>) -> Router
where
    S: ComplianceStore + 'static,
    T: TemplateSource + 'static,
{
    Router::new()
        .route("/api/v1/questionnaire/normalize", post(normalize_handler))
        .route("/api/v1/breach/classify", post(classify_handler))
        .route(
            "/api/v1/organizations/:org_id/policies/:policy_id/evidence",
            get(evidence_handler::<S, T>),
        )
        .route(
            "/api/v1/organizations/:org_id/policies/:policy_id/generate",
            post(generate_policy_handler::<S, T>),
        )
        .route(
            "/api/v1/organizations/:org_id/documents",
            post(generate_all_handler::<S, T>),
        )
        .route(
            "/api/v1/organizations/:org_id/breach/notice",
            post(breach_notice_handler::<S, T>),
        )
        .with_state(orchestrator)
}

/// Optional per-request overrides of the configured generation options.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerationQuery {
    strict: Option<bool>,
    summary: Option<bool>,
}

impl GenerationQuery {
    fn apply(&self, defaults: GenerationOptions) -> GenerationOptions {
        GenerationOptions {
            require_high_priority_evidence: self
                .strict
                .unwrap_or(defaults.require_high_priority_evidence),
            include_evidence_summary: self.summary.unwrap_or(defaults.include_evidence_summary),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BreachNoticeRequest {
    #[serde(flatten)]
    details: BreachDetails,
    #[serde(default, alias = "noticeDate")]
    notice_date: Option<NaiveDate>,
}

pub(crate) fn status_for(error: &GenerationError) -> StatusCode {
    match error {
        GenerationError::OrganizationNotFound(_) => StatusCode::NOT_FOUND,
        GenerationError::IncompleteOrganization(_) => StatusCode::BAD_REQUEST,
        GenerationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: GenerationError) -> Response {
    let mut payload = json!({ "error": error.to_string() });
    if let GenerationError::IncompleteOrganization(validation) = &error {
        payload["missing_fields"] = json!(validation.missing);
    }
    (status_for(&error), axum::Json(payload)).into_response()
}

fn parse_policy(raw: &str) -> Result<PolicyId, Response> {
    raw.parse::<PolicyId>().map_err(|error| {
        let payload = json!({ "error": error.to_string() });
        (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
    })
}

pub(crate) async fn normalize_handler(axum::Json(answers): axum::Json<AnswerMap>) -> Response {
    let state = normalize(&answers);
    let payload = json!({
        "gaps": state.gaps(),
        "state": state,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn classify_handler(
    axum::Json(details): axum::Json<BreachDetails>,
) -> Response {
    let payload = json!({
        "status": classify(&details),
        "legal_defense": legal_defense_statement(&details),
        "obligations": notification_obligations(&details),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn evidence_handler<S, T>(
    State(orchestrator): State<SharedOrchestrator<S, T>>,
    Path((org_id, policy_id)): Path<(String, String)>,
) -> Response
where
    S: ComplianceStore + 'static,
    T: TemplateSource + 'static,
{
    let policy = match parse_policy(&policy_id) {
        Ok(policy) => policy,
        Err(response) => return response,
    };
    match orchestrator
        .evidence_report(&OrganizationId(org_id), policy)
        .await
    {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn generate_policy_handler<S, T>(
    State(orchestrator): State<SharedOrchestrator<S, T>>,
    Path((org_id, policy_id)): Path<(String, String)>,
    Query(query): Query<GenerationQuery>,
) -> Response
where
    S: ComplianceStore + 'static,
    T: TemplateSource + 'static,
{
    let policy = match parse_policy(&policy_id) {
        Ok(policy) => policy,
        Err(response) => return response,
    };
    let options = query.apply(orchestrator.options());
    match orchestrator
        .generate_policy_with(&OrganizationId(org_id), policy, options)
        .await
    {
        Ok(outcome) => {
            let status = match outcome.status {
                PolicyStatus::Generated | PolicyStatus::Skipped => StatusCode::OK,
                PolicyStatus::Failed => StatusCode::UNPROCESSABLE_ENTITY,
            };
            (status, axum::Json(outcome)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn generate_all_handler<S, T>(
    State(orchestrator): State<SharedOrchestrator<S, T>>,
    Path(org_id): Path<String>,
    Query(query): Query<GenerationQuery>,
) -> Response
where
    S: ComplianceStore + 'static,
    T: TemplateSource + 'static,
{
    let options = query.apply(orchestrator.options());
    match orchestrator
        .generate_all_with(&OrganizationId(org_id), options)
        .await
    {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn breach_notice_handler<S, T>(
    State(orchestrator): State<SharedOrchestrator<S, T>>,
    Path(org_id): Path<String>,
    axum::Json(request): axum::Json<BreachNoticeRequest>,
) -> Response
where
    S: ComplianceStore + 'static,
    T: TemplateSource + 'static,
{
    let notice_date = request
        .notice_date
        .unwrap_or_else(|| Utc::now().date_naive());
    match orchestrator
        .breach_notice(&OrganizationId(org_id), &request.details, notice_date)
        .await
    {
        Ok(notice) => (StatusCode::OK, axum::Json(notice)).into_response(),
        Err(error) => error_response(error),
    }
}
