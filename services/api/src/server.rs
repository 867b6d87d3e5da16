use crate::cli::ServeArgs;
use crate::error::AppError;
use crate::infra::{build_analysis_service, AppState};
use crate::routes::contract_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use keiyaku_ai::config::AppConfig;
use keiyaku_ai::telemetry;
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

    let analysis_service = Arc::new(build_analysis_service(&config.analyzer));

    let app = contract_router(analysis_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "contract analysis service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
