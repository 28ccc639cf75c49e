use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};
use workout_client::app::{Cli, run};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (outcome, output) = match run(cli).await {
        Ok(result) => result,
        Err(err) => {
            error!("{err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    print!("{output}");
    if outcome.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
