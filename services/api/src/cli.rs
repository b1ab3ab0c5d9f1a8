use crate::commands::{run_resume_analysis, run_screening, ResumeAnalysisArgs, ScreenArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use recruit_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Recruitment Automation",
    about = "Screen job applications and analyze résumés from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch applications, filter candidates, and notify them (default command)
    Screen(ScreenArgs),
    /// Work with résumé files on disk
    Resumes {
        #[command(subcommand)]
        command: ResumesCommand,
    },
    /// Start the HTTP service exposing settings and on-demand screening
    Serve(ServeArgs),
}

#[derive(Subcommand, Debug)]
enum ResumesCommand {
    /// Count keyword occurrences in every résumé and print a summary report
    Analyze(ResumeAnalysisArgs),
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
        .unwrap_or_else(|| Command::Screen(ScreenArgs::default()));

    match command {
        Command::Screen(args) => run_screening(args).await,
        Command::Resumes {
            command: ResumesCommand::Analyze(args),
        } => run_resume_analysis(args),
        Command::Serve(args) => server::run(args).await,
    }
}
