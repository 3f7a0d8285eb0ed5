mod cli;

use missive_ack::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
