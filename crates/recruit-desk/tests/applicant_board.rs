use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use recruit_desk::applicants::{
    applicant_router, ApplicantDirectory, ApplicationStatus, FilterState, HttpJobBoard, Page,
    UNKNOWN_COMPANY,
};
use recruit_desk::config::{UpstreamConfig, ViewConfig};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_store(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "docs": [
                { "_id": "j1", "title": "Backend Engineer", "company": "Acme",
                  "location": "Berlin", "type": "job" },
                { "_id": "j2", "title": "Design Intern", "company": "Acme",
                  "location": "Berlin", "type": "internship" }
            ]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "docs": [
                { "_id": "a1", "name": "Ada", "email": "ada@example.com",
                  "jobId": "j1", "status": "hired", "createdAt": "2025-03-01T09:00:00Z" },
                { "_id": "a2", "name": "Linus", "email": "linus@example.com",
                  "jobId": "j2", "status": "applied", "createdAt": "2025-03-03T09:00:00Z" },
                { "_id": "a3", "name": "Grace", "email": "grace@example.com",
                  "jobId": "j9", "status": "rejected", "createdAt": "2025-03-02T09:00:00Z" }
            ] }
        })))
        .mount(server)
        .await;
}

fn directory(server: &MockServer) -> Arc<ApplicantDirectory<HttpJobBoard>> {
    let upstream = UpstreamConfig::new(format!("{}/api", server.uri()), 5).expect("valid url");
    let source = HttpJobBoard::new(&upstream).expect("client builds");
    Arc::new(ApplicantDirectory::new(
        Arc::new(source),
        ViewConfig::default(),
    ))
}

async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn refresh_derives_company_views_from_the_store() {
    let server = MockServer::start().await;
    mount_store(&server).await;
    let directory = directory(&server);

    let snapshot = directory.refresh().await;
    let companies = snapshot.companies(&FilterState::default(), Page::new(1, 10));

    assert_eq!(companies.total_items, 2);
    let acme = &companies.items[0];
    assert_eq!(acme.company, "Acme");
    assert_eq!(acme.location, "Berlin");
    assert_eq!(acme.job_applications, 1);
    assert_eq!(acme.internship_applications, 1);
    assert_eq!(companies.items[1].company, UNKNOWN_COMPANY);

    let recent = snapshot.recent_applications(2);
    let ids: Vec<&str> = recent.iter().map(|j| j.application.id.0.as_str()).collect();
    assert_eq!(ids, vec!["a2", "a3"]);

    let totals = snapshot.totals();
    assert_eq!(totals.total_applications, 3);
    assert_eq!(
        totals.job_applications + totals.internship_applications,
        totals.total_applications
    );
}

#[tokio::test]
async fn store_outage_is_reported_alongside_stale_data() {
    let server = MockServer::start().await;
    mount_store(&server).await;
    let directory = directory(&server);
    directory.refresh().await;

    server.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance window"))
        .mount(&server)
        .await;

    let snapshot = directory.refresh().await;
    assert_eq!(snapshot.fetch_errors().len(), 2);
    assert_eq!(snapshot.fetch_errors()[1].status, Some(503));
    assert_eq!(snapshot.aggregates().len(), 2);
    assert_eq!(snapshot.totals().status_counts.hired, 1);
}

#[tokio::test]
async fn router_patch_round_trips_through_the_store() {
    let server = MockServer::start().await;
    mount_store(&server).await;
    Mock::given(method("PATCH"))
        .and(path("/api/applications/a2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "a2", "name": "Linus", "email": "linus@example.com",
            "jobId": "j2", "status": "shortlisted", "notes": "strong portfolio"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let directory = directory(&server);
    directory.refresh().await;
    let router = applicant_router(Arc::clone(&directory));

    let response = router
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/v1/applications/a2")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "status": "shortlisted", "notes": "strong portfolio" }).to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("route response");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "shortlisted");

    let snapshot = directory.snapshot().await;
    let acme = snapshot.company("acme").expect("acme exists");
    assert_eq!(acme.aggregate.status_counts.shortlisted, 1);
    assert_eq!(acme.aggregate.status_counts.applied, 0);
    assert_eq!(
        snapshot
            .application(&recruit_desk::applicants::ApplicationId("a2".to_string()))
            .map(|application| application.status),
        Some(ApplicationStatus::Shortlisted)
    );
}
