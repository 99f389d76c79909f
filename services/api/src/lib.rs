mod cli;
mod infra;
mod routes;
mod server;

use interview_scheduler::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
