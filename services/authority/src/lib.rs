//! Stand-in validation authority answering the checks issued by
//! `missive-ack`.

pub mod checks;
mod cli;
pub mod config;
pub mod error;
pub mod registry;
pub mod routes;
mod server;

use error::ServiceError;

pub async fn run() -> Result<(), ServiceError> {
    cli::run().await
}
