use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use super::domain::{Job, JobApplication, JobId, JobType};

pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const UNKNOWN_LOCATION: &str = "Location N/A";
pub const UNKNOWN_POSITION: &str = "Position N/A";

/// An application carrying the job its foreign key resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedApplication {
    pub application: JobApplication,
    pub company: String,
    pub location: String,
    pub position: String,
    pub job_type: JobType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<Job>,
}

impl JoinedApplication {
    pub fn resolve(application: &JobApplication, job: Option<&Job>) -> Self {
        let company = job
            .map(|job| job.company.trim())
            .filter(|company| !company.is_empty())
            .unwrap_or(UNKNOWN_COMPANY)
            .to_string();
        let location = job
            .map(|job| job.location.trim())
            .filter(|location| !location.is_empty())
            .unwrap_or(UNKNOWN_LOCATION)
            .to_string();
        let position = job
            .map(|job| job.title.trim())
            .filter(|title| !title.is_empty())
            .unwrap_or(UNKNOWN_POSITION)
            .to_string();

        Self {
            application: application.clone(),
            company,
            location,
            position,
            job_type: job.map(|job| job.job_type).unwrap_or(JobType::Job),
            job: job.cloned(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.job.is_some()
    }
}

/// Applications of one company, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyGroup {
    pub company: String,
    pub slug: String,
    pub location: String,
    pub applications: Vec<JoinedApplication>,
}

/// Joins every application to its job. Unresolvable applications are kept.
pub fn join_applications(jobs: &[Job], applications: &[JobApplication]) -> Vec<JoinedApplication> {
    let index = job_index(jobs);
    applications
        .iter()
        .map(|application| {
            JoinedApplication::resolve(application, index.get(&application.job_id).copied())
        })
        .collect()
}

/// Groups applications by resolved company name, ordered by name.
pub fn group_by_company(jobs: &[Job], applications: &[JobApplication]) -> Vec<CompanyGroup> {
    let mut buckets: BTreeMap<String, Vec<JoinedApplication>> = BTreeMap::new();
    for joined in join_applications(jobs, applications) {
        buckets.entry(joined.company.clone()).or_default().push(joined);
    }

    let mut slugs = SlugAllocator::default();
    buckets
        .into_iter()
        .map(|(company, applications)| {
            let location = applications
                .iter()
                .find(|joined| joined.is_resolved())
                .map(|joined| joined.location.clone())
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

            CompanyGroup {
                slug: slugs.allocate(&company),
                company,
                location,
                applications,
            }
        })
        .collect()
}

/// The first job wins when the store returns duplicate identifiers.
fn job_index(jobs: &[Job]) -> HashMap<&JobId, &Job> {
    let mut index = HashMap::with_capacity(jobs.len());
    for job in jobs {
        index.entry(&job.id).or_insert(job);
    }
    index
}

/// Newest first by creation time; undated applications sort last.
pub fn recent_applications<'a, I>(applications: I, limit: usize) -> Vec<JoinedApplication>
where
    I: IntoIterator<Item = &'a JoinedApplication>,
{
    let mut sorted: Vec<&JoinedApplication> = applications.into_iter().collect();
    sorted.sort_by(|left, right| {
        right
            .application
            .created_at
            .cmp(&left.application.created_at)
    });
    sorted.into_iter().take(limit).cloned().collect()
}

/// Lowercase alphanumeric runs joined by `-`.
pub fn company_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "company".to_string()
    } else {
        slug
    }
}

#[derive(Default)]
struct SlugAllocator {
    taken: HashSet<String>,
}

impl SlugAllocator {
    fn allocate(&mut self, company: &str) -> String {
        let base = company_slug(company);
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.taken.contains(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}
