use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryRoster};
use crate::routes::with_workforce_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use staffdesk::config::AppConfig;
use staffdesk::error::AppError;
use staffdesk::telemetry;
use staffdesk::workflows::assignments::AssignmentService;
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

    let roster = Arc::new(InMemoryRoster::seeded());
    let assignment_service = Arc::new(AssignmentService::new(roster, config.assignments));
    let payroll_config = Arc::new(config.payroll.clone());

    let app = with_workforce_routes(assignment_service, payroll_config)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        currency = %config.payroll.currency,
        max_batch_size = config.assignments.max_batch_size,
        "staffdesk service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
