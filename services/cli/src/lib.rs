mod cli;
mod commands;

use statemap::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
