use crate::error::AppError;
use crate::infra::UnconfiguredAnalyzer;
use crate::server;
use clap::{Args, Parser, Subcommand};
use keiyaku_ai::analysis::AnalysisService;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "keiyaku-ai",
    about = "Hybrid legal-risk analysis for freelance service contracts",
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
    /// Run the deterministic rule check on a contract text file and print
    /// the report as JSON
    Check(CheckArgs),
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

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// UTF-8 contract text file to analyze
    #[arg(long)]
    pub(crate) file: PathBuf,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check(args) => run_check(args),
    }
}

fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let text = std::fs::read_to_string(&args.file)?;
    // The rule-only path never touches the analyzer, so no credential is
    // needed here.
    let service = AnalysisService::new(Arc::new(UnconfiguredAnalyzer), Duration::from_secs(1));
    let report = service.check(&text);
    println!(
        "{}",
        serde_json::to_string_pretty(&report).expect("report serializes")
    );
    Ok(())
}
