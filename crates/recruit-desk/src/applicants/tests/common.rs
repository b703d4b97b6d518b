use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::applicants::client::{
    ApplicationPatch, ApplicationQuery, FetchError, JobBoardSource, JobQuery,
};
use crate::applicants::domain::{
    ApplicationId, ApplicationStatus, Job, JobApplication, JobId, JobType,
};
use crate::applicants::{applicant_router, ApplicantDirectory};
use crate::config::ViewConfig;

pub(super) fn job(id: &str, company: &str, job_type: JobType) -> Job {
    Job {
        id: JobId(id.to_string()),
        title: format!("{} role {id}", job_type.label()),
        company: company.to_string(),
        location: format!("{company} HQ"),
        job_type,
        salary: None,
        category: "engineering".to_string(),
        status: "active".to_string(),
    }
}

pub(super) fn application(id: &str, job_id: &str, status: ApplicationStatus) -> JobApplication {
    JobApplication {
        id: ApplicationId(id.to_string()),
        name: format!("Candidate {id}"),
        email: format!("{id}@example.com"),
        phone: None,
        job_id: JobId(job_id.to_string()),
        status,
        notes: None,
        cover_letter: None,
        resume: None,
        created_at: None,
        updated_at: None,
    }
}

pub(super) fn created(day: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).single()
}

/// Two Acme listings and an application pointing at a job that does not exist.
pub(super) fn acme_jobs() -> Vec<Job> {
    vec![
        job("j1", "Acme", JobType::Job),
        job("j2", "Acme", JobType::Internship),
    ]
}

pub(super) fn acme_applications() -> Vec<JobApplication> {
    vec![
        application("a1", "j1", ApplicationStatus::Hired),
        application("a2", "j2", ApplicationStatus::Applied),
        application("a3", "j9", ApplicationStatus::Rejected),
    ]
}

/// A wider board used by the search and pagination tests.
pub(super) fn board_jobs() -> Vec<Job> {
    vec![
        job("j1", "Acme", JobType::Job),
        job("j2", "Acme", JobType::Internship),
        job("j3", "Blue Sky Labs", JobType::Job),
        job("j4", "Copper Works", JobType::Internship),
    ]
}

pub(super) fn board_applications() -> Vec<JobApplication> {
    let mut applications = vec![
        application("a1", "j1", ApplicationStatus::Hired),
        application("a2", "j2", ApplicationStatus::Applied),
        application("a3", "j3", ApplicationStatus::UnderReview),
        application("a4", "j3", ApplicationStatus::Shortlisted),
        application("a5", "j4", ApplicationStatus::InterviewScheduled),
        application("a6", "j9", ApplicationStatus::Rejected),
    ];
    for (day, application) in (1..).zip(applications.iter_mut()) {
        application.created_at = created(day);
    }
    applications[2].name = "Grace Hopper".to_string();
    applications[2].email = "grace@navy.example".to_string();
    applications
}

#[derive(Clone)]
struct Scripted<T> {
    delay: Duration,
    result: Result<Vec<T>, FetchError>,
}

/// In-memory store. Each list call consumes the next scripted response; the last one repeats.
#[derive(Default)]
pub(super) struct MemorySource {
    jobs: Mutex<VecDeque<Scripted<Job>>>,
    applications: Mutex<VecDeque<Scripted<JobApplication>>>,
    update_error: Mutex<Option<FetchError>>,
    update_calls: Mutex<Vec<(ApplicationId, ApplicationPatch)>>,
}

impl MemorySource {
    pub(super) fn with(jobs: Vec<Job>, applications: Vec<JobApplication>) -> Self {
        let source = Self::default();
        source.push_jobs(0, Ok(jobs));
        source.push_applications(0, Ok(applications));
        source
    }

    pub(super) fn push_jobs(&self, delay_ms: u64, result: Result<Vec<Job>, FetchError>) {
        self.jobs
            .lock()
            .expect("jobs mutex poisoned")
            .push_back(Scripted {
                delay: Duration::from_millis(delay_ms),
                result,
            });
    }

    pub(super) fn push_applications(
        &self,
        delay_ms: u64,
        result: Result<Vec<JobApplication>, FetchError>,
    ) {
        self.applications
            .lock()
            .expect("applications mutex poisoned")
            .push_back(Scripted {
                delay: Duration::from_millis(delay_ms),
                result,
            });
    }

    pub(super) fn fail_updates(&self, error: FetchError) {
        *self.update_error.lock().expect("update mutex poisoned") = Some(error);
    }

    pub(super) fn update_calls(&self) -> usize {
        self.update_calls.lock().expect("update mutex poisoned").len()
    }

    fn last_applications(&self) -> Vec<JobApplication> {
        let guard = self.applications.lock().expect("applications mutex poisoned");
        guard
            .back()
            .and_then(|scripted| scripted.result.clone().ok())
            .unwrap_or_default()
    }
}

fn next_script<T: Clone>(queue: &Mutex<VecDeque<Scripted<T>>>) -> Scripted<T> {
    let mut guard = queue.lock().expect("script mutex poisoned");
    if guard.len() > 1 {
        guard.pop_front().expect("non-empty queue")
    } else {
        guard.front().cloned().unwrap_or(Scripted {
            delay: Duration::ZERO,
            result: Ok(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl JobBoardSource for MemorySource {
    async fn list_jobs(&self, _query: &JobQuery) -> Result<Vec<Job>, FetchError> {
        let script = next_script(&self.jobs);
        tokio::time::sleep(script.delay).await;
        script.result
    }

    async fn list_applications(
        &self,
        _query: &ApplicationQuery,
    ) -> Result<Vec<JobApplication>, FetchError> {
        let script = next_script(&self.applications);
        tokio::time::sleep(script.delay).await;
        script.result
    }

    async fn update_application(
        &self,
        id: &ApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<JobApplication, FetchError> {
        self.update_calls
            .lock()
            .expect("update mutex poisoned")
            .push((id.clone(), patch.clone()));

        if let Some(error) = self.update_error.lock().expect("update mutex poisoned").clone() {
            return Err(error);
        }

        let mut record = self
            .last_applications()
            .into_iter()
            .find(|application| &application.id == id)
            .ok_or_else(|| {
                FetchError::http(reqwest::StatusCode::NOT_FOUND, "application not found")
            })?;
        if let Some(status) = patch.status {
            record.status = status;
        }
        if let Some(notes) = &patch.notes {
            record.notes = Some(notes.clone());
        }
        Ok(record)
    }
}

pub(super) fn directory(source: MemorySource) -> Arc<ApplicantDirectory<MemorySource>> {
    Arc::new(ApplicantDirectory::new(
        Arc::new(source),
        ViewConfig::default(),
    ))
}

pub(super) fn router_with(source: MemorySource) -> axum::Router {
    applicant_router(directory(source))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
