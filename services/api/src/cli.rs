use crate::demo::{run_demo, run_rules, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use leadscore::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Lead Scoring Orchestrator",
    about = "Demonstrate and run the lead scoring service from the command line",
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
    /// Run an end-to-end CLI demo covering scoring, insights, and the
    /// distribution query
    Demo(DemoArgs),
    /// Print the read-only scoring rubric
    Rules,
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
        Command::Demo(args) => run_demo(args),
        Command::Rules => run_rules(),
    }
}
