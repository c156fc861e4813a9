mod cli;
mod infra;
mod report;
mod routes;
mod server;

use rfs_planner::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
