//! Applicant tracking views derived from the remote job and application collections.
//!
//! Jobs and applications are fetched independently, joined on the application's job id,
//! grouped by company, counted, and filtered. Every derived value is rebuilt from an
//! immutable [`BoardSnapshot`]; the [`ApplicantDirectory`] owns the only mutable pointer to
//! the current snapshot.

pub mod aggregate;
pub mod client;
pub mod directory;
pub mod domain;
pub mod envelope;
pub mod errors;
pub mod export;
pub mod filter;
pub mod grouping;
pub mod router;
pub mod sequencer;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use aggregate::{aggregate_companies, BoardTotals, CompanyAggregate, StatusCounts};
pub use client::{
    ApplicationPatch, ApplicationQuery, FetchError, HttpJobBoard, JobBoardSource, JobQuery,
};
pub use directory::ApplicantDirectory;
pub use domain::{ApplicationId, ApplicationStatus, Job, JobApplication, JobId, JobType};
pub use envelope::Envelope;
pub use errors::{DirectoryError, NotFoundError, ValidationError};
pub use export::write_companies_csv;
pub use filter::{
    filter_applications, filter_companies, paginate, ApplicationTab, FilterState, Page,
    Paginated, StatusFilter, TypeFilter,
};
pub use grouping::{
    company_slug, group_by_company, join_applications, recent_applications, CompanyGroup,
    JoinedApplication, UNKNOWN_COMPANY, UNKNOWN_LOCATION,
};
pub use router::applicant_router;
pub use snapshot::{BoardSnapshot, CollectionError, CompanyDetail, LoadState};
