use crate::cli::ServeArgs;
use crate::infra::{http_directory, AppState};
use crate::routes::with_applicant_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recruit_desk::config::AppConfig;
use recruit_desk::error::AppError;
use recruit_desk::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let directory = http_directory(&config)?;
    let warm = directory.refresh().await;
    if !warm.fetch_errors().is_empty() {
        warn!(
            upstream = %config.upstream.base_url,
            errors = warm.fetch_errors().len(),
            "initial board load incomplete; views will retry on request"
        );
    }

    let app = with_applicant_routes(directory)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        upstream = %config.upstream.base_url,
        "recruit desk api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
