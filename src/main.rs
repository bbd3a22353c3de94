use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use backoff_retry::cli::CliArgs;
use backoff_retry::error::RetryError;
use backoff_retry::runner;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let config = args.into_config()?;
    let backoff = config.backoff();
    info!(
        program = %config.program,
        max_attempts = backoff.max_attempts,
        worst_case_wait_ms = backoff.total_delay().as_millis(),
        "running command with retry"
    );

    match runner::run_with_retry(&config).await {
        Ok(()) => Ok(()),
        Err(RetryError::Exhausted(err)) => Err(err).with_context(|| {
            format!(
                "`{}` failed after {} attempt(s)",
                config.program, backoff.max_attempts
            )
        }),
        Err(err @ RetryError::NoAttempts) => Err(err.into()),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("info,backoff_retry=debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
