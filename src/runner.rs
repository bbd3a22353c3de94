use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::cli::RunConfig;
use crate::error::{CommandError, RetryError};

/// Spawns the configured command once and waits for it to exit.
pub async fn run_once(config: &RunConfig) -> Result<(), CommandError> {
    debug!(program = %config.program, args = ?config.args, "spawning command");

    let status = Command::new(&config.program)
        .args(&config.args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|source| CommandError::Spawn {
            program: config.program.clone(),
            source,
        })?;

    if !status.success() {
        return Err(CommandError::ExitStatus {
            program: config.program.clone(),
            status,
        });
    }
    Ok(())
}

pub async fn run_with_retry(config: &RunConfig) -> Result<(), RetryError<CommandError>> {
    let backoff = config.backoff();
    let mut attempt = 0_u32;

    backoff
        .retry_async(|| {
            attempt += 1;
            info!(attempt, max_attempts = backoff.max_attempts, "starting attempt");
            run_once(config)
        })
        .await
}
