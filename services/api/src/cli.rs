use crate::report::{
    run_diagnose, run_progress, run_questions, DiagnoseArgs, ProgressArgs, QuestionsArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use taiheki::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "COCOSiL Taiheki",
    about = "Serve or run the taiheki body-constitution diagnosis from the command line",
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
    /// Score a complete answer file and print the diagnosis
    Diagnose(DiagnoseArgs),
    /// Estimate the leading types from a partial answer file
    Progress(ProgressArgs),
    /// List the question catalogue
    Questions(QuestionsArgs),
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
        Command::Diagnose(args) => run_diagnose(args),
        Command::Progress(args) => run_progress(args),
        Command::Questions(args) => run_questions(args),
    }
}
