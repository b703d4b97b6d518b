use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::domain::{ApplicationId, ApplicationStatus, Job, JobApplication, JobId, JobType};
use super::envelope::{Envelope, RecordEnvelope};
use super::errors::ValidationError;
use crate::config::UpstreamConfig;

/// Optional filters forwarded to the jobs collection endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

/// Optional filters forwarded to the applications collection endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(rename = "jobId", skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

/// Fields an admin may change on an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ApplicationPatch {
    pub const MAX_NOTES_CHARS: usize = 2000;

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.status.is_none() && self.notes.is_none() {
            return Err(ValidationError::EmptyPatch);
        }
        if let Some(notes) = &self.notes {
            let actual = notes.chars().count();
            if actual > Self::MAX_NOTES_CHARS {
                return Err(ValidationError::NotesTooLong {
                    max: Self::MAX_NOTES_CHARS,
                    actual,
                });
            }
        }
        Ok(())
    }
}

/// Network or HTTP failure talking to the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    /// HTTP status when a response was received at all.
    pub status: Option<u16>,
    pub message: String,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "upstream returned {status}: {}", self.message),
            None => write!(f, "upstream request failed: {}", self.message),
        }
    }
}

impl std::error::Error for FetchError {}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: Some(status.as_u16()),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            status: err.status().map(|status| status.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Source of the two collections the applicant views are derived from.
#[async_trait]
pub trait JobBoardSource: Send + Sync {
    async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, FetchError>;
    async fn list_applications(
        &self,
        query: &ApplicationQuery,
    ) -> Result<Vec<JobApplication>, FetchError>;
    async fn update_application(
        &self,
        id: &ApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<JobApplication, FetchError>;
}

/// `JobBoardSource` backed by the store's REST API.
#[derive(Debug, Clone)]
pub struct HttpJobBoard {
    client: Client,
    base_url: String,
}

impl HttpJobBoard {
    pub fn new(config: &UpstreamConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{path}", self.base_url))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, FetchError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::http(status, error_message(status, &body)));
        }

        let body = response
            .text()
            .await
            .map_err(|err| FetchError::transport(format!("failed to read response body: {err}")))?;

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(error = %err, "successful response carried no JSON body");
                Ok(Value::Null)
            }
        }
    }
}

/// Prefers the store's own `message`/`error` field over the raw body.
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let from_json = parsed.as_ref().and_then(|value| {
        value
            .get("message")
            .or_else(|| value.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        None => body.trim().to_string(),
    }
}

#[async_trait]
impl JobBoardSource for HttpJobBoard {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, FetchError> {
        let body = self
            .send(self.request(Method::GET, "jobs").query(query))
            .await?;
        let jobs = Envelope::<Job>::flatten(body);
        debug!(count = jobs.len(), "fetched jobs");
        Ok(jobs)
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn list_applications(
        &self,
        query: &ApplicationQuery,
    ) -> Result<Vec<JobApplication>, FetchError> {
        let body = self
            .send(self.request(Method::GET, "applications").query(query))
            .await?;
        let applications = Envelope::<JobApplication>::flatten(body);
        debug!(count = applications.len(), "fetched applications");
        Ok(applications)
    }

    #[instrument(skip(self, patch), fields(base_url = %self.base_url, application_id = %id))]
    async fn update_application(
        &self,
        id: &ApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<JobApplication, FetchError> {
        let path = format!("applications/{}", id.0);
        let body = self
            .send(self.request(Method::PATCH, &path).json(patch))
            .await?;

        serde_json::from_value::<RecordEnvelope<JobApplication>>(body)
            .map(RecordEnvelope::into_record)
            .map_err(|err| FetchError::transport(format!("unexpected update response: {err}")))
    }
}
