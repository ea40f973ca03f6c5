use crate::cli::ServeArgs;
use crate::infra::{
    seed_demo_records, AppState, InMemoryNotificationPublisher, InMemoryVerificationRepository,
};
use crate::routes::with_verification_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use finmatch::config::AppConfig;
use finmatch::error::AppError;
use finmatch::telemetry;
use finmatch::workflows::verification::VerificationService;
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

    let repository = Arc::new(InMemoryVerificationRepository::default());
    seed_demo_records(&repository);
    let notifier = Arc::new(InMemoryNotificationPublisher::default());
    let verification_service = Arc::new(VerificationService::new(
        repository,
        notifier,
        config.verification,
    ));

    let app = with_verification_routes(verification_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "worker verification service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
