use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::aggregate::{BoardTotals, CompanyAggregate};
use super::client::{ApplicationPatch, JobBoardSource};
use super::directory::ApplicantDirectory;
use super::domain::ApplicationId;
use super::errors::{DirectoryError, ValidationError};
use super::filter::{FilterState, Page, Paginated};
use super::grouping::JoinedApplication;
use super::snapshot::{BoardSnapshot, CollectionError, LoadState};

/// Router builder exposing the derived applicant views.
pub fn applicant_router<S>(directory: Arc<ApplicantDirectory<S>>) -> Router
where
    S: JobBoardSource + 'static,
{
    Router::new()
        .route("/api/v1/companies", get(companies_handler::<S>))
        .route("/api/v1/companies/:slug", get(company_handler::<S>))
        .route(
            "/api/v1/companies/:slug/applications",
            get(company_applications_handler::<S>),
        )
        .route(
            "/api/v1/applications/recent",
            get(recent_applications_handler::<S>),
        )
        .route(
            "/api/v1/applications/:application_id",
            patch(update_application_handler::<S>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<S>))
        .with_state(directory)
}

/// Query string accepted by the list endpoints. `All` (or absence) disables a filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub tab: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl ListParams {
    pub fn filter(&self) -> Result<FilterState, ValidationError> {
        FilterState::parse(
            self.search.as_deref(),
            self.status.as_deref(),
            self.job_type.as_deref(),
            self.tab.as_deref(),
        )
    }

    pub fn page(&self, default_per_page: usize) -> Page {
        Page::new(self.page.unwrap_or(1), self.per_page.unwrap_or(0)).normalized(default_per_page)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CompanyListResponse {
    pub companies: Paginated<CompanyAggregate>,
    pub load_state: LoadState,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fetch_errors: Vec<CollectionError>,
}

#[derive(Debug, Serialize)]
pub struct CompanyApplicationsResponse {
    pub company: CompanyAggregate,
    pub applications: Paginated<JoinedApplication>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fetch_errors: Vec<CollectionError>,
}

#[derive(Debug, Serialize)]
pub struct RecentApplicationsResponse {
    pub applications: Vec<JoinedApplication>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fetch_errors: Vec<CollectionError>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub totals: BoardTotals,
    pub load_state: LoadState,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fetch_errors: Vec<CollectionError>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, axum::Json(payload)).into_response()
}

fn fetch_errors(snapshot: &BoardSnapshot) -> Vec<CollectionError> {
    snapshot.fetch_errors().to_vec()
}

pub(crate) async fn companies_handler<S>(
    State(directory): State<Arc<ApplicantDirectory<S>>>,
    Query(params): Query<ListParams>,
) -> Response
where
    S: JobBoardSource + 'static,
{
    let filter = match params.filter() {
        Ok(filter) => filter,
        Err(err) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
    };
    let page = params.page(directory.views().page_size);

    let snapshot = directory.refresh().await;
    let body = CompanyListResponse {
        companies: snapshot.companies(&filter, page),
        load_state: snapshot.load_state(),
        fetch_errors: fetch_errors(&snapshot),
    };
    (StatusCode::OK, axum::Json(body)).into_response()
}

pub(crate) async fn company_handler<S>(
    State(directory): State<Arc<ApplicantDirectory<S>>>,
    Path(slug): Path<String>,
) -> Response
where
    S: JobBoardSource + 'static,
{
    let snapshot = directory.refresh().await;
    match snapshot.company(&slug) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(err) => error_response(StatusCode::NOT_FOUND, err.to_string()),
    }
}

pub(crate) async fn company_applications_handler<S>(
    State(directory): State<Arc<ApplicantDirectory<S>>>,
    Path(slug): Path<String>,
    Query(params): Query<ListParams>,
) -> Response
where
    S: JobBoardSource + 'static,
{
    let filter = match params.filter() {
        Ok(filter) => filter,
        Err(err) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
    };
    let page = params.page(directory.views().page_size);

    let snapshot = directory.refresh().await;
    let detail = match snapshot.company(&slug) {
        Ok(detail) => detail,
        Err(err) => return error_response(StatusCode::NOT_FOUND, err.to_string()),
    };
    match snapshot.company_applications(&slug, &filter, page) {
        Ok(applications) => {
            let body = CompanyApplicationsResponse {
                company: detail.aggregate,
                applications,
                fetch_errors: fetch_errors(&snapshot),
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(err) => error_response(StatusCode::NOT_FOUND, err.to_string()),
    }
}

pub(crate) async fn recent_applications_handler<S>(
    State(directory): State<Arc<ApplicantDirectory<S>>>,
    Query(params): Query<RecentParams>,
) -> Response
where
    S: JobBoardSource + 'static,
{
    let limit = params.limit.unwrap_or(directory.views().recent_limit);
    let snapshot = directory.refresh().await;
    let body = RecentApplicationsResponse {
        applications: snapshot.recent_applications(limit),
        fetch_errors: fetch_errors(&snapshot),
    };
    (StatusCode::OK, axum::Json(body)).into_response()
}

pub(crate) async fn dashboard_handler<S>(
    State(directory): State<Arc<ApplicantDirectory<S>>>,
) -> Response
where
    S: JobBoardSource + 'static,
{
    let snapshot = directory.refresh().await;
    let body = DashboardResponse {
        totals: snapshot.totals(),
        load_state: snapshot.load_state(),
        fetch_errors: fetch_errors(&snapshot),
    };
    (StatusCode::OK, axum::Json(body)).into_response()
}

pub(crate) async fn update_application_handler<S>(
    State(directory): State<Arc<ApplicantDirectory<S>>>,
    Path(application_id): Path<String>,
    axum::Json(patch): axum::Json<ApplicationPatch>,
) -> Response
where
    S: JobBoardSource + 'static,
{
    let id = ApplicationId(application_id);
    match directory.update_application(&id, patch).await {
        Ok(updated) => (StatusCode::OK, axum::Json(updated)).into_response(),
        Err(DirectoryError::Validation(err)) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        Err(DirectoryError::Fetch(err)) => error_response(StatusCode::BAD_GATEWAY, err.to_string()),
        Err(DirectoryError::NotFound(err)) => {
            error_response(StatusCode::NOT_FOUND, err.to_string())
        }
    }
}
