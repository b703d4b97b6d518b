use crate::reports::{
    run_application_update, run_company_list, run_company_show, run_recent_applications,
    ApplicationUpdateArgs, CompanyListArgs, CompanyShowArgs, RecentArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use recruit_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Recruit Desk",
    about = "Serve and inspect applicant views derived from the job board store",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Company listings aggregated from applications
    Companies {
        #[command(subcommand)]
        command: CompanyCommand,
    },
    /// Individual applications
    Applications {
        #[command(subcommand)]
        command: ApplicationCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CompanyCommand {
    /// List companies with per-status counts, optionally exporting them as CSV
    List(CompanyListArgs),
    /// Show one company and its applicants
    Show(CompanyShowArgs),
}

#[derive(Subcommand, Debug)]
enum ApplicationCommand {
    /// Most recent applications across every company
    Recent(RecentArgs),
    /// Change the status or notes of an application
    Update(ApplicationUpdateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Companies {
            command: CompanyCommand::List(args),
        } => run_company_list(args).await,
        Command::Companies {
            command: CompanyCommand::Show(args),
        } => run_company_show(args).await,
        Command::Applications {
            command: ApplicationCommand::Recent(args),
        } => run_recent_applications(args).await,
        Command::Applications {
            command: ApplicationCommand::Update(args),
        } => run_application_update(args).await,
    }
}
