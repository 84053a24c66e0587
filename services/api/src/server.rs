use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDecisionStore, InMemorySubmissionStore};
use crate::routes::with_appraisal_routes;
use appraisal::config::AppConfig;
use appraisal::error::AppError;
use appraisal::intake::{AppraisalService, SessionRegistry};
use appraisal::publications::{PublicationCatalog, PublicationDataset};
use appraisal::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(PublicationCatalog::default());
    if let Some(path) = config.publications.seed_csv.as_ref() {
        match PublicationDataset::from_path(path) {
            Ok(dataset) => {
                catalog.replace(dataset);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "publication seed not loaded");
            }
        }
    }

    let service = Arc::new(AppraisalService::new(
        Arc::new(InMemorySubmissionStore::default()),
        Arc::new(InMemoryDecisionStore::default()),
        catalog,
    ));
    let sessions = Arc::new(SessionRegistry::new(config.auth.clone()));

    let app = with_appraisal_routes(service, sessions)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "faculty appraisal portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
