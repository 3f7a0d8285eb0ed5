use crate::error::ServiceError;
use crate::server;
use clap::{Args, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "missive-authority",
    about = "Serve the validation checks used by missive-ack",
    version
)]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the registry CSV of accepted identifiers and priorities
    #[arg(long)]
    pub(crate) registry: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), ServiceError> {
    let cli = Cli::parse();
    server::run(cli.serve).await
}
