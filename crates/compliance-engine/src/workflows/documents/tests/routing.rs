use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::documents::router::{self, document_router, GenerationQuery};
use crate::workflows::documents::{DocumentOrchestrator, GenerationOptions, PolicyId};
use crate::workflows::templates::StaticTemplateLibrary;

fn post_json(uri: &str, body: Value) -> Request<axum::body::Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&body).expect("serialize body"),
        ))
        .expect("request builds")
}

fn app() -> axum::Router {
    document_router(Arc::new(orchestrator()))
}

#[tokio::test]
async fn normalize_route_returns_state_and_gaps() {
    let response = app()
        .oneshot(post_json(
            "/api/v1/questionnaire/normalize",
            json!({ "multi-factor-authentication": "yes-all" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["state"]["mfa_enabled"], json!(true));
    assert!(payload["gaps"].as_array().is_some_and(|gaps| !gaps.is_empty()));
}

#[tokio::test]
async fn classify_route_reports_safe_harbor() {
    let response = app()
        .oneshot(post_json(
            "/api/v1/breach/classify",
            json!({
                "encryptedAtRest": "yes",
                "encryptedInTransit": "YES",
                "individualsAffected": 1200,
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], json!("Not Reportable"));
    assert!(payload["legal_defense"]
        .as_str()
        .is_some_and(|text| text.contains("45 CFR 164.402")));
    assert_eq!(payload["obligations"]["notify_individuals"], json!(false));
}

#[tokio::test]
async fn evidence_route_returns_validation_and_register() {
    let response = app()
        .oneshot(
            Request::get("/api/v1/organizations/org-harbor/policies/access-control/evidence")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["validation"]["coverage_percent"], json!(100));
    assert_eq!(payload["register"]["entries"][0]["code"], json!("EV-AC-001"));
}

#[tokio::test]
async fn unknown_policy_and_organization_are_not_found() {
    let response = app()
        .oneshot(post_json(
            "/api/v1/organizations/org-harbor/policies/telehealth/generate",
            json!({}),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app()
        .oneshot(post_json("/api/v1/organizations/org-nobody/documents", json!({})))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("organization org-nobody not found"));
}

#[tokio::test]
async fn generate_route_honours_query_overrides() {
    let response = app()
        .oneshot(post_json(
            "/api/v1/organizations/org-harbor/policies/contingency-plan/generate?strict=true",
            json!({}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], json!("skipped"));
    assert!(payload.get("document").is_none());

    let response = app()
        .oneshot(post_json(
            "/api/v1/organizations/org-harbor/policies/contingency-plan/generate?summary=false",
            json!({}),
        ))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], json!("generated"));
    let content = payload["document"]["content"].as_str().expect("content");
    assert!(!content.contains("## Evidence Summary"));
}

#[tokio::test]
async fn documents_route_returns_batch_counts() {
    let response = app()
        .oneshot(post_json("/api/v1/organizations/org-harbor/documents", json!({})))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["generated"], json!(9));
    assert_eq!(payload["outcomes"].as_array().map(Vec::len), Some(9));
}

#[tokio::test]
async fn generate_handler_reports_unprocessable_for_failed_policy() {
    let orchestrator = Arc::new(orchestrator_with(
        MemoryStore::with(organization(), answers(), Vec::new()),
        StaticTemplateLibrary::default().with_override(PolicyId::AccessControl, ""),
        GenerationOptions::default(),
    ));

    let response = router::generate_policy_handler::<MemoryStore, StaticTemplateLibrary>(
        State(orchestrator),
        Path((ORG_ID.to_string(), "access-control".to_string())),
        Query(GenerationQuery::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], json!("failed"));
}

#[tokio::test]
async fn documents_handler_lists_missing_fields_for_incomplete_organization() {
    let mut organization = organization();
    organization.npi.clear();
    let orchestrator = Arc::new(orchestrator_with(
        MemoryStore::with(organization, answers(), Vec::new()),
        StaticTemplateLibrary::default(),
        GenerationOptions::default(),
    ));

    let response = router::generate_all_handler::<MemoryStore, StaticTemplateLibrary>(
        State(orchestrator),
        Path(ORG_ID.to_string()),
        Query(GenerationQuery::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["missing_fields"], json!(["npi"]));
}

#[tokio::test]
async fn documents_handler_returns_internal_error_when_store_is_down() {
    let orchestrator = Arc::new(DocumentOrchestrator::standard(
        Arc::new(UnavailableStore),
        Arc::new(StaticTemplateLibrary::default()),
        GenerationOptions::default(),
    ));

    let response = router::generate_all_handler::<UnavailableStore, StaticTemplateLibrary>(
        State(orchestrator),
        Path(ORG_ID.to_string()),
        Query(GenerationQuery::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn breach_notice_route_renders_reportable_letter() {
    let response = app()
        .oneshot(post_json(
            "/api/v1/organizations/org-harbor/breach/notice",
            json!({
                "encrypted_at_rest": "no",
                "encrypted_in_transit": "yes",
                "individuals_affected": 640,
                "discovered_on": "2026-03-02",
                "residents_by_state": { "OR": 610, "WA": 30 },
                "description": "A laptop was stolen from a staff vehicle.",
                "phi_involved": ["names", "dates of service"],
                "notice_date": "2026-03-20",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], json!("Reportable"));
    assert_eq!(payload["obligations"]["media_notice_states"], json!(["OR"]));
    let letter = payload["letter"].as_str().expect("letter");
    assert!(letter.contains("March 20, 2026"));
    assert!(letter.contains("A laptop was stolen from a staff vehicle."));
    assert!(letter.contains("names, dates of service"));
    assert!(letter.contains("We are notifying the Secretary"));
    assert!(!letter.contains("{{"));
}

#[tokio::test]
async fn breach_notice_route_requires_complete_organization() {
    let mut organization = organization();
    organization.ein.clear();
    organization.npi.clear();
    let app = document_router(Arc::new(orchestrator_with(
        MemoryStore::with(organization, answers(), Vec::new()),
        StaticTemplateLibrary::default(),
        GenerationOptions::default(),
    )));

    let response = app
        .oneshot(post_json(
            "/api/v1/organizations/org-harbor/breach/notice",
            json!({
                "encrypted_at_rest": "no",
                "encrypted_in_transit": "no",
                "individuals_affected": 12,
                "discovered_on": "2026-03-02",
                "notice_date": "2026-03-20",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["missing_fields"], json!(["ein", "npi"]));
    assert!(payload.get("letter").is_none());
}

#[tokio::test]
async fn breach_description_is_quoted_verbatim_in_letter() {
    let response = app()
        .oneshot(post_json(
            "/api/v1/organizations/org-harbor/breach/notice",
            json!({
                "encrypted_at_rest": "no",
                "encrypted_in_transit": "no",
                "individuals_affected": 3,
                "discovered_on": "2026-03-02",
                "description": "{{#REMEDIATION_COMMITMENT:x:low:never}}",
                "notice_date": "2026-03-20",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let letter = payload["letter"].as_str().expect("letter");
    assert!(letter.contains("{{#REMEDIATION_COMMITMENT:x:low:never}}"));
    assert!(!letter.contains("Remediation Commitment"));
}
