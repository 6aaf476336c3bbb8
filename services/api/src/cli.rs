use crate::commands::{run_import, run_score, ImportArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tariff_risk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Tariff Risk Engine",
    about = "Score inventory line items for tariff risk and run the scoring service",
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
    /// Score a single line item and print the breakdown with advice
    Score(ScoreArgs),
    /// Score every row of an inventory CSV file
    Import(ImportArgs),
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
        Command::Score(args) => run_score(args).await,
        Command::Import(args) => run_import(args).await,
    }
}
