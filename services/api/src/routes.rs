use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use compliance_engine::workflows::documents::{
    document_router, ComplianceStore, DocumentOrchestrator,
};
use compliance_engine::workflows::evidence::{EvidenceCatalog, EvidenceFieldConfig};
use compliance_engine::workflows::templates::TemplateSource;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<S, T>(
    orchestrator: Arc<DocumentOrchestrator<S, T>>,
) -> axum::Router
where
    S: ComplianceStore + 'static,
    T: TemplateSource + 'static,
{
    document_router(orchestrator)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/evidence/catalog",
            axum::routing::get(evidence_catalog_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Every evidence kind the engine tracks, in catalog order.
pub(crate) async fn evidence_catalog_endpoint() -> Json<Vec<EvidenceFieldConfig>> {
    Json(EvidenceCatalog::standard().iter().cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::sample_fixture;
    use crate::infra::InMemoryComplianceStore;
    use axum::body::Body;
    use axum::http::Request;
    use compliance_engine::workflows::documents::GenerationOptions;
    use compliance_engine::workflows::templates::StaticTemplateLibrary;
    use tower::ServiceExt;

    fn app() -> axum::Router {
        let orchestrator = Arc::new(DocumentOrchestrator::standard(
            Arc::new(InMemoryComplianceStore::with_fixtures([sample_fixture()])),
            Arc::new(StaticTemplateLibrary::default()),
            GenerationOptions::default(),
        ));
        with_service_routes(orchestrator)
    }

    async fn read_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1 << 22)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn health_route_reports_ok() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn catalog_route_lists_evidence_kinds() {
        let Json(fields) = evidence_catalog_endpoint().await;
        assert_eq!(fields.len(), EvidenceCatalog::standard().len());
        assert_eq!(fields[0].id, "privacy-officer-designation");
    }

    #[tokio::test]
    async fn document_routes_are_mounted() {
        let response = app()
            .oneshot(
                Request::post("/api/v1/organizations/org-northwind/policies/access-control/generate")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["status"], "generated");
        assert!(payload["document"]["content"]
            .as_str()
            .is_some_and(|content| content.starts_with("# Northwind Clinic Access Control Policy")));
    }
}
