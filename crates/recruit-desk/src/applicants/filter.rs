use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::aggregate::CompanyAggregate;
use super::domain::{ApplicationStatus, JobType};
use super::errors::ValidationError;
use super::grouping::{CompanyGroup, JoinedApplication};

const ALL: &str = "all";

fn is_all(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    fn matches(self, status: ApplicationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => expected == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if is_all(value) {
            return Ok(StatusFilter::All);
        }
        value
            .parse::<ApplicationStatus>()
            .map(StatusFilter::Only)
            .map_err(|_| ValidationError::InvalidFilter {
                field: "status",
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum TypeFilter {
    #[default]
    All,
    Only(JobType),
}

impl TypeFilter {
    fn matches(self, job_type: JobType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(expected) => expected == job_type,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if is_all(value) {
            return Ok(TypeFilter::All);
        }
        match value.trim().to_ascii_lowercase().as_str() {
            "job" | "jobs" => Ok(TypeFilter::Only(JobType::Job)),
            "internship" | "internships" => Ok(TypeFilter::Only(JobType::Internship)),
            _ => Err(ValidationError::InvalidFilter {
                field: "type",
                value: value.to_string(),
            }),
        }
    }
}

/// Tab strip on the applicant views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationTab {
    #[default]
    All,
    Jobs,
    Internships,
}

impl ApplicationTab {
    fn matches(self, job_type: JobType) -> bool {
        match self {
            ApplicationTab::All => true,
            ApplicationTab::Jobs => job_type == JobType::Job,
            ApplicationTab::Internships => job_type == JobType::Internship,
        }
    }
}

impl FromStr for ApplicationTab {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if is_all(value) {
            return Ok(ApplicationTab::All);
        }
        match value.trim().to_ascii_lowercase().as_str() {
            "job" | "jobs" => Ok(ApplicationTab::Jobs),
            "internship" | "internships" => Ok(ApplicationTab::Internships),
            _ => Err(ValidationError::InvalidFilter {
                field: "tab",
                value: value.to_string(),
            }),
        }
    }
}

/// View-local filter selections. All active predicates must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub search_term: String,
    pub status_filter: StatusFilter,
    pub type_filter: TypeFilter,
    pub active_tab: ApplicationTab,
}

impl FilterState {
    /// Builds a filter from loosely typed inputs such as query strings or CLI flags.
    pub fn parse(
        search: Option<&str>,
        status: Option<&str>,
        job_type: Option<&str>,
        tab: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            search_term: search.unwrap_or_default().to_string(),
            status_filter: status
                .map(str::parse::<StatusFilter>)
                .transpose()?
                .unwrap_or_default(),
            type_filter: job_type
                .map(str::parse::<TypeFilter>)
                .transpose()?
                .unwrap_or_default(),
            active_tab: tab
                .map(str::parse::<ApplicationTab>)
                .transpose()?
                .unwrap_or_default(),
        })
    }

    fn needle(&self) -> Option<String> {
        let trimmed = self.search_term.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    fn categorical_match(&self, joined: &JoinedApplication) -> bool {
        self.status_filter.matches(joined.application.status)
            && self.type_filter.matches(joined.job_type)
            && self.active_tab.matches(joined.job_type)
    }

    pub fn matches_application(&self, joined: &JoinedApplication) -> bool {
        let searched = match self.needle() {
            Some(needle) => application_contains(joined, &needle),
            None => true,
        };
        searched && self.categorical_match(joined)
    }

    /// A company passes when its name or location matches the search and some application
    /// satisfies the categorical filters, or when a single application satisfies every
    /// predicate at once.
    pub fn matches_company(&self, group: &CompanyGroup) -> bool {
        let header_searched = match self.needle() {
            Some(needle) => {
                contains(&group.company, &needle) || contains(&group.location, &needle)
            }
            None => true,
        };

        let categorical = self.is_categorically_open()
            || group
                .applications
                .iter()
                .any(|joined| self.categorical_match(joined));

        (header_searched && categorical)
            || group
                .applications
                .iter()
                .any(|joined| self.matches_application(joined))
    }

    fn is_categorically_open(&self) -> bool {
        self.status_filter == StatusFilter::All
            && self.type_filter == TypeFilter::All
            && self.active_tab == ApplicationTab::All
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn application_contains(joined: &JoinedApplication, needle: &str) -> bool {
    contains(&joined.application.name, needle)
        || contains(&joined.application.email, needle)
        || contains(&joined.company, needle)
        || contains(&joined.location, needle)
        || contains(&joined.position, needle)
}

pub fn filter_applications(
    applications: &[JoinedApplication],
    filter: &FilterState,
) -> Vec<JoinedApplication> {
    applications
        .iter()
        .filter(|joined| filter.matches_application(joined))
        .cloned()
        .collect()
}

/// Companies passing the filter, paired with their full (unfiltered) aggregates.
pub fn filter_companies(
    groups: &[CompanyGroup],
    aggregates: &[CompanyAggregate],
    filter: &FilterState,
) -> Vec<CompanyAggregate> {
    groups
        .iter()
        .zip(aggregates)
        .filter(|(group, _)| filter.matches_company(group))
        .map(|(_, aggregate)| aggregate.clone())
        .collect()
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: usize,
    pub per_page: usize,
}

impl Page {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// Page 0 becomes page 1; a zero page size takes the configured default.
    pub fn normalized(self, default_per_page: usize) -> Self {
        Self {
            page: self.page.max(1),
            per_page: if self.per_page == 0 {
                default_per_page.max(1)
            } else {
                self.per_page
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

pub fn paginate<T>(items: Vec<T>, page: Page) -> Paginated<T> {
    let page = page.normalized(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page.per_page);
    let start = (page.page - 1).saturating_mul(page.per_page);

    let items = items
        .into_iter()
        .skip(start)
        .take(page.per_page)
        .collect();

    Paginated {
        items,
        page: page.page,
        per_page: page.per_page,
        total_items,
        total_pages,
    }
}
