use crate::demo::{run_demo, run_stats, DemoArgs, StatsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use splitfee::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Split-fee Metrics Service",
    about = "Serve and inspect access-scoped placement metrics",
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
    /// Compute metrics for one caller token and print them as JSON
    Stats(StatsArgs),
    /// Print metrics for every built-in demo persona
    Demo(DemoArgs),
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
        Command::Stats(args) => run_stats(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
