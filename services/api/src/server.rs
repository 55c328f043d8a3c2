use crate::cli::ServeArgs;
use crate::infra::{load_fixture, AppState, InMemoryComplianceStore};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use compliance_engine::config::AppConfig;
use compliance_engine::error::AppError;
use compliance_engine::telemetry;
use compliance_engine::workflows::documents::{
    DocumentOrchestrator, GenerationError, GenerationOptions,
};
use compliance_engine::workflows::templates::StaticTemplateLibrary;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = InMemoryComplianceStore::default();
    for path in &args.fixtures {
        let fixture = load_fixture(path)?;
        info!(organization = %fixture.id(), path = %path.display(), "fixture loaded");
        store.insert(fixture).map_err(GenerationError::from)?;
    }

    let orchestrator = Arc::new(DocumentOrchestrator::standard(
        Arc::new(store),
        Arc::new(StaticTemplateLibrary::default()),
        GenerationOptions::from(config.generation),
    ));

    let app = with_service_routes(orchestrator)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "compliance document engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
