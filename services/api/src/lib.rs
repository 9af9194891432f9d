mod cli;
mod export;
mod infra;
mod routes;
mod server;

use tree_ledger::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
