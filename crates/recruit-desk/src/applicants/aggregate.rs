use serde::Serialize;

use super::domain::{ApplicationStatus, Job, JobType};
use super::grouping::{CompanyGroup, JoinedApplication};

/// Per-status counters. Every status has its own slot, so the slots always sum to the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub applied: usize,
    pub under_review: usize,
    pub shortlisted: usize,
    pub interview_scheduled: usize,
    pub hired: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: ApplicationStatus) {
        *self.slot_mut(status) += 1;
    }

    pub fn get(&self, status: ApplicationStatus) -> usize {
        match status {
            ApplicationStatus::Applied => self.applied,
            ApplicationStatus::UnderReview => self.under_review,
            ApplicationStatus::Shortlisted => self.shortlisted,
            ApplicationStatus::InterviewScheduled => self.interview_scheduled,
            ApplicationStatus::Hired => self.hired,
            ApplicationStatus::Rejected => self.rejected,
        }
    }

    pub fn sum(&self) -> usize {
        ApplicationStatus::ordered()
            .into_iter()
            .map(|status| self.get(status))
            .sum()
    }

    fn slot_mut(&mut self, status: ApplicationStatus) -> &mut usize {
        match status {
            ApplicationStatus::Applied => &mut self.applied,
            ApplicationStatus::UnderReview => &mut self.under_review,
            ApplicationStatus::Shortlisted => &mut self.shortlisted,
            ApplicationStatus::InterviewScheduled => &mut self.interview_scheduled,
            ApplicationStatus::Hired => &mut self.hired,
            ApplicationStatus::Rejected => &mut self.rejected,
        }
    }
}

/// Derived summary of one company's applications. Rebuilt, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyAggregate {
    pub company: String,
    pub slug: String,
    pub location: String,
    pub total_applications: usize,
    pub job_applications: usize,
    pub internship_applications: usize,
    pub status_counts: StatusCounts,
}

impl CompanyAggregate {
    pub fn from_group(group: &CompanyGroup) -> Self {
        let mut aggregate = Self {
            company: group.company.clone(),
            slug: group.slug.clone(),
            location: group.location.clone(),
            total_applications: 0,
            job_applications: 0,
            internship_applications: 0,
            status_counts: StatusCounts::default(),
        };

        for joined in &group.applications {
            aggregate.record(joined);
        }
        aggregate
    }

    fn record(&mut self, joined: &JoinedApplication) {
        self.total_applications += 1;
        match joined.job_type {
            JobType::Internship => self.internship_applications += 1,
            JobType::Job => self.job_applications += 1,
        }
        self.status_counts.record(joined.application.status);
    }
}

pub fn aggregate_companies(groups: &[CompanyGroup]) -> Vec<CompanyAggregate> {
    groups.iter().map(CompanyAggregate::from_group).collect()
}

/// Dashboard figures across the whole board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardTotals {
    pub companies: usize,
    pub job_listings: usize,
    pub internship_listings: usize,
    pub total_applications: usize,
    pub job_applications: usize,
    pub internship_applications: usize,
    pub unresolved_applications: usize,
    pub status_counts: StatusCounts,
}

impl BoardTotals {
    pub fn compute(jobs: &[Job], groups: &[CompanyGroup]) -> Self {
        let mut totals = Self {
            companies: groups.len(),
            ..Self::default()
        };

        for job in jobs {
            match job.job_type {
                JobType::Internship => totals.internship_listings += 1,
                JobType::Job => totals.job_listings += 1,
            }
        }

        for joined in groups.iter().flat_map(|group| &group.applications) {
            totals.total_applications += 1;
            match joined.job_type {
                JobType::Internship => totals.internship_applications += 1,
                JobType::Job => totals.job_applications += 1,
            }
            if !joined.is_resolved() {
                totals.unresolved_applications += 1;
            }
            totals.status_counts.record(joined.application.status);
        }

        totals
    }
}
