use crate::report::{run_holidays, run_schedule, HolidaysArgs, ScheduleArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rfs_planner::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "RFS Planner",
    about = "Plan data hall construction, commissioning and equipment releases",
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
    /// Compute a site schedule and print hall RFS and equipment tables
    Schedule(ScheduleArgs),
    /// List a country's observed holidays
    Holidays(HolidaysArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Equipment catalog CSV served when requests do not upload one
    #[arg(long)]
    pub(crate) equipment_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Schedule(args) => run_schedule(args),
        Command::Holidays(args) => run_holidays(args),
    }
}
