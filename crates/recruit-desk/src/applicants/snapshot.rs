use serde::Serialize;

use super::aggregate::{aggregate_companies, BoardTotals, CompanyAggregate};
use super::client::FetchError;
use super::domain::{ApplicationId, Job, JobApplication};
use super::errors::NotFoundError;
use super::filter::{filter_applications, filter_companies, paginate, FilterState, Page, Paginated};
use super::grouping::{group_by_company, recent_applications, CompanyGroup, JoinedApplication};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Jobs,
    Applications,
}

impl Collection {
    pub const fn label(self) -> &'static str {
        match self {
            Collection::Jobs => "jobs",
            Collection::Applications => "applications",
        }
    }
}

/// A failed fetch, kept for inline display next to whatever data is still available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionError {
    pub collection: Collection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
}

impl CollectionError {
    pub fn new(collection: Collection, error: &FetchError) -> Self {
        Self {
            collection,
            status: error.status,
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadState {
    pub jobs_loaded: bool,
    pub applications_loaded: bool,
}

/// One company with its joined applications, as shown on the detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    pub aggregate: CompanyAggregate,
    pub applications: Vec<JoinedApplication>,
}

/// Immutable view of both collections plus everything derived from them.
///
/// `None` means the collection has not loaded yet. Missing jobs leave every application
/// under the unknown company; missing applications leave every view empty.
#[derive(Debug, Clone, Default)]
pub struct BoardSnapshot {
    generation: u64,
    jobs: Option<Vec<Job>>,
    applications: Option<Vec<JobApplication>>,
    fetch_errors: Vec<CollectionError>,
    groups: Vec<CompanyGroup>,
    aggregates: Vec<CompanyAggregate>,
}

impl BoardSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(jobs: Option<Vec<Job>>, applications: Option<Vec<JobApplication>>) -> Self {
        let groups = match &applications {
            Some(applications) => {
                group_by_company(jobs.as_deref().unwrap_or_default(), applications)
            }
            None => Vec::new(),
        };
        let aggregates = aggregate_companies(&groups);

        Self {
            generation: 0,
            jobs,
            applications,
            fetch_errors: Vec::new(),
            groups,
            aggregates,
        }
    }

    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_fetch_errors(mut self, fetch_errors: Vec<CollectionError>) -> Self {
        self.fetch_errors = fetch_errors;
        self
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn jobs(&self) -> Option<&[Job]> {
        self.jobs.as_deref()
    }

    pub fn applications(&self) -> Option<&[JobApplication]> {
        self.applications.as_deref()
    }

    pub fn fetch_errors(&self) -> &[CollectionError] {
        &self.fetch_errors
    }

    pub fn load_state(&self) -> LoadState {
        LoadState {
            jobs_loaded: self.jobs.is_some(),
            applications_loaded: self.applications.is_some(),
        }
    }

    pub fn groups(&self) -> &[CompanyGroup] {
        &self.groups
    }

    pub fn aggregates(&self) -> &[CompanyAggregate] {
        &self.aggregates
    }

    pub fn companies(&self, filter: &FilterState, page: Page) -> Paginated<CompanyAggregate> {
        paginate(filter_companies(&self.groups, &self.aggregates, filter), page)
    }

    pub fn company(&self, slug: &str) -> Result<CompanyDetail, NotFoundError> {
        let index = self.company_index(slug)?;
        Ok(CompanyDetail {
            aggregate: self.aggregates[index].clone(),
            applications: self.groups[index].applications.clone(),
        })
    }

    pub fn company_applications(
        &self,
        slug: &str,
        filter: &FilterState,
        page: Page,
    ) -> Result<Paginated<JoinedApplication>, NotFoundError> {
        let index = self.company_index(slug)?;
        let filtered = filter_applications(&self.groups[index].applications, filter);
        Ok(paginate(filtered, page))
    }

    pub fn recent_applications(&self, limit: usize) -> Vec<JoinedApplication> {
        recent_applications(
            self.groups.iter().flat_map(|group| &group.applications),
            limit,
        )
    }

    pub fn totals(&self) -> BoardTotals {
        BoardTotals::compute(self.jobs.as_deref().unwrap_or_default(), &self.groups)
    }

    pub fn application(&self, id: &ApplicationId) -> Option<&JobApplication> {
        self.applications
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|application| &application.id == id)
    }

    /// Rebuilds the snapshot with a store-confirmed record swapped in (or appended).
    /// Returns `None` while applications have never loaded, since a lone record would
    /// pass for the whole collection.
    pub fn with_application(&self, updated: JobApplication, generation: u64) -> Option<Self> {
        let mut applications = self.applications.clone()?;
        match applications
            .iter_mut()
            .find(|application| application.id == updated.id)
        {
            Some(existing) => *existing = updated,
            None => applications.push(updated),
        }

        Some(
            Self::new(self.jobs.clone(), Some(applications))
                .with_generation(generation)
                .with_fetch_errors(self.fetch_errors.clone()),
        )
    }

    fn company_index(&self, slug: &str) -> Result<usize, NotFoundError> {
        self.groups
            .iter()
            .position(|group| group.slug == slug)
            .ok_or_else(|| NotFoundError::Company {
                slug: slug.to_string(),
            })
    }
}
