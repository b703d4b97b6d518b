use crate::infra::http_directory;
use clap::Args;
use recruit_desk::applicants::{
    write_companies_csv, ApplicantDirectory, ApplicationId, ApplicationPatch, ApplicationStatus,
    CollectionError, CompanyAggregate, FilterState, JobBoardSource, JoinedApplication, Page,
    StatusCounts,
};
use recruit_desk::config::AppConfig;
use recruit_desk::error::AppError;
use recruit_desk::telemetry;
use std::fs::File;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct CompanyListArgs {
    /// Case-insensitive search over company, location and candidate details
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Only companies with applications in this status (or "All")
    #[arg(long)]
    pub(crate) status: Option<String>,
    /// Only companies with job or internship applications (or "All")
    #[arg(long = "type")]
    pub(crate) job_type: Option<String>,
    /// Tab selection: all, jobs or internships
    #[arg(long)]
    pub(crate) tab: Option<String>,
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub(crate) page: usize,
    /// Companies per page (defaults to APP_PAGE_SIZE)
    #[arg(long)]
    pub(crate) per_page: Option<usize>,
    /// Also write the listed companies to this CSV file
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct CompanyShowArgs {
    /// Company slug as printed by `companies list`
    pub(crate) slug: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RecentArgs {
    /// Number of applications to show (defaults to APP_RECENT_LIMIT)
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct ApplicationUpdateArgs {
    /// Application identifier
    pub(crate) id: String,
    /// New status, e.g. under_review or "Interview Scheduled"
    #[arg(long, value_parser = crate::infra::parse_status)]
    pub(crate) status: Option<ApplicationStatus>,
    /// Replacement notes (at most 2000 characters)
    #[arg(long)]
    pub(crate) notes: Option<String>,
}

/// Loads configuration and installs logging on stderr; stdout carries the report.
fn load_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init_with_writer(&config.telemetry, std::io::stderr)?;
    Ok(config)
}

pub(crate) async fn run_company_list(args: CompanyListArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let directory = http_directory(&config)?;
    print!("{}", company_list_report(&directory, &args).await?);
    Ok(())
}

pub(crate) async fn run_company_show(args: CompanyShowArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let directory = http_directory(&config)?;
    print!("{}", company_detail_report(&directory, &args.slug).await?);
    Ok(())
}

pub(crate) async fn run_recent_applications(args: RecentArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let directory = http_directory(&config)?;
    print!("{}", recent_applications_report(&directory, args.limit).await);
    Ok(())
}

pub(crate) async fn run_application_update(args: ApplicationUpdateArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let directory = http_directory(&config)?;
    print!("{}", application_update_report(&directory, args).await?);
    Ok(())
}

pub(crate) async fn company_list_report<S>(
    directory: &ApplicantDirectory<S>,
    args: &CompanyListArgs,
) -> Result<String, AppError>
where
    S: JobBoardSource + 'static,
{
    let filter = FilterState::parse(
        args.search.as_deref(),
        args.status.as_deref(),
        args.job_type.as_deref(),
        args.tab.as_deref(),
    )?;
    let page = Page::new(args.page, args.per_page.unwrap_or(0))
        .normalized(directory.views().page_size);

    let snapshot = directory.refresh().await;
    let companies = snapshot.companies(&filter, page);

    let mut lines = fetch_error_lines(snapshot.fetch_errors());
    if companies.total_items == 0 {
        lines.push("No companies match the current filters".to_string());
    } else {
        lines.push(format!(
            "Companies (page {} of {}, {} matching)",
            companies.page, companies.total_pages, companies.total_items
        ));
        lines.extend(companies.items.iter().map(company_line));
    }

    if let Some(path) = &args.csv {
        let file = File::create(path)?;
        write_companies_csv(file, &companies.items)?;
        lines.push(format!(
            "Wrote {} companies to {}",
            companies.items.len(),
            path.display()
        ));
    }

    Ok(render(lines))
}

pub(crate) async fn company_detail_report<S>(
    directory: &ApplicantDirectory<S>,
    slug: &str,
) -> Result<String, AppError>
where
    S: JobBoardSource + 'static,
{
    let snapshot = directory.refresh().await;
    let detail = snapshot.company(slug)?;
    let aggregate = &detail.aggregate;

    let mut lines = fetch_error_lines(snapshot.fetch_errors());
    lines.push(format!("{} ({})", aggregate.company, aggregate.slug));
    lines.push(format!("Location: {}", aggregate.location));
    lines.push(format!(
        "Applications: {} total, {} job, {} internship",
        aggregate.total_applications,
        aggregate.job_applications,
        aggregate.internship_applications
    ));
    lines.push(format!("Status: {}", status_breakdown(&aggregate.status_counts, true)));
    lines.push(String::new());
    lines.push("Applicants".to_string());
    lines.extend(detail.applications.iter().map(applicant_line));

    Ok(render(lines))
}

pub(crate) async fn recent_applications_report<S>(
    directory: &ApplicantDirectory<S>,
    limit: Option<usize>,
) -> String
where
    S: JobBoardSource + 'static,
{
    let limit = limit.unwrap_or(directory.views().recent_limit);
    let snapshot = directory.refresh().await;
    let recent = snapshot.recent_applications(limit);

    let mut lines = fetch_error_lines(snapshot.fetch_errors());
    if recent.is_empty() {
        lines.push("Recent applications: none".to_string());
    } else {
        lines.push("Recent applications".to_string());
        lines.extend(recent.iter().map(|joined| {
            format!(
                "- {} <{}> applied to {} at {} ({})",
                joined.application.name,
                joined.application.email,
                joined.position,
                joined.company,
                joined.application.status.display_name()
            )
        }));
    }

    render(lines)
}

pub(crate) async fn application_update_report<S>(
    directory: &ApplicantDirectory<S>,
    args: ApplicationUpdateArgs,
) -> Result<String, AppError>
where
    S: JobBoardSource + 'static,
{
    let id = ApplicationId(args.id);
    let patch = ApplicationPatch {
        status: args.status,
        notes: args.notes,
    };
    let updated = directory.update_application(&id, patch).await?;

    let mut lines = vec![format!(
        "Application {} updated: status {}",
        updated.id,
        updated.status.display_name()
    )];
    if let Some(notes) = &updated.notes {
        lines.push(format!("Notes: {notes}"));
    }
    Ok(render(lines))
}

fn company_line(aggregate: &CompanyAggregate) -> String {
    format!(
        "- {} [{}] {}: {} applications ({} job, {} internship) | {}",
        aggregate.company,
        aggregate.slug,
        aggregate.location,
        aggregate.total_applications,
        aggregate.job_applications,
        aggregate.internship_applications,
        status_breakdown(&aggregate.status_counts, false)
    )
}

fn applicant_line(joined: &JoinedApplication) -> String {
    format!(
        "- {} {} <{}>, {}, {}",
        joined.application.id,
        joined.application.name,
        joined.application.email,
        joined.position,
        joined.application.status.display_name()
    )
}

/// Status counters in lifecycle order; zero slots are dropped unless `include_zero`.
fn status_breakdown(counts: &StatusCounts, include_zero: bool) -> String {
    let parts: Vec<String> = ApplicationStatus::ordered()
        .into_iter()
        .filter(|status| include_zero || counts.get(*status) > 0)
        .map(|status| format!("{} {}", status.display_name(), counts.get(status)))
        .collect();

    if parts.is_empty() {
        "no applications".to_string()
    } else {
        parts.join(", ")
    }
}

fn fetch_error_lines(errors: &[CollectionError]) -> Vec<String> {
    errors
        .iter()
        .map(|error| {
            format!(
                "warning: {} unavailable ({})",
                error.collection.label(),
                error.message
            )
        })
        .collect()
}

fn render(lines: Vec<String>) -> String {
    let mut output = lines.join("\n");
    output.push('\n');
    output
}
