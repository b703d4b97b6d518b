use std::io::Write;

use serde::Serialize;

use super::aggregate::CompanyAggregate;

#[derive(Debug, Serialize)]
struct CompanyRow<'a> {
    company: &'a str,
    slug: &'a str,
    location: &'a str,
    total: usize,
    job_applications: usize,
    internship_applications: usize,
    applied: usize,
    under_review: usize,
    shortlisted: usize,
    interview_scheduled: usize,
    hired: usize,
    rejected: usize,
}

impl<'a> From<&'a CompanyAggregate> for CompanyRow<'a> {
    fn from(aggregate: &'a CompanyAggregate) -> Self {
        let counts = &aggregate.status_counts;
        Self {
            company: &aggregate.company,
            slug: &aggregate.slug,
            location: &aggregate.location,
            total: aggregate.total_applications,
            job_applications: aggregate.job_applications,
            internship_applications: aggregate.internship_applications,
            applied: counts.applied,
            under_review: counts.under_review,
            shortlisted: counts.shortlisted,
            interview_scheduled: counts.interview_scheduled,
            hired: counts.hired,
            rejected: counts.rejected,
        }
    }
}

/// Writes one header row followed by one row per company.
pub fn write_companies_csv<W: Write>(
    writer: W,
    companies: &[CompanyAggregate],
) -> Result<(), csv::Error> {
    let mut csv = csv::Writer::from_writer(writer);
    for aggregate in companies {
        csv.serialize(CompanyRow::from(aggregate))?;
    }
    csv.flush()?;
    Ok(())
}
