use metrics_exporter_prometheus::PrometheusHandle;
use recruit_desk::applicants::{ApplicantDirectory, ApplicationStatus, HttpJobBoard};
use recruit_desk::config::AppConfig;
use recruit_desk::error::AppError;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn http_directory(
    config: &AppConfig,
) -> Result<Arc<ApplicantDirectory<HttpJobBoard>>, AppError> {
    let source = HttpJobBoard::new(&config.upstream)?;
    Ok(Arc::new(ApplicantDirectory::new(
        Arc::new(source),
        config.views,
    )))
}

pub(crate) fn parse_status(value: &str) -> Result<ApplicationStatus, String> {
    value
        .parse::<ApplicationStatus>()
        .map_err(|err| err.to_string())
}
