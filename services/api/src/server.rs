use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::assistant_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ev_assist::assistant::applications::{ApplicationService, JsonFileStore};
use ev_assist::assistant::chat::ChatEngine;
use ev_assist::assistant::intent::IntentClassifier;
use ev_assist::assistant::knowledge::KnowledgeBase;
use ev_assist::config::AppConfig;
use ev_assist::error::AppError;
use ev_assist::telemetry;
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

    let store = Arc::new(JsonFileStore::open(config.storage.applications_path())?);
    let knowledge = KnowledgeBase::load(&config.storage.faq_path())?;
    let applications = Arc::new(ApplicationService::new(store));
    let engine = Arc::new(ChatEngine::new(
        IntentClassifier::new(),
        knowledge,
        applications.clone(),
    ));

    let app = assistant_routes(engine, applications)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "ev charging assistant ready");

    axum::serve(listener, app).await?;
    Ok(())
}
