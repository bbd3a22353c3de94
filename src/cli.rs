use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;
use crate::retry::Backoff;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "backoff-retry",
    version,
    about = "Run a command until it succeeds, backing off exponentially between attempts"
)]
pub struct CliArgs {
    #[arg(long, default_value_t = 2000)]
    pub base_delay_ms: u64,

    #[arg(long, default_value_t = 5)]
    pub max_attempts: u32,

    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub program: String,
    pub args: Vec<String>,
    pub base_delay_ms: u64,
    pub max_attempts: u32,
    pub verbose: bool,
}

impl RunConfig {
    pub fn backoff(&self) -> Backoff {
        Backoff::new(Duration::from_millis(self.base_delay_ms), self.max_attempts)
    }
}

impl CliArgs {
    pub fn into_config(self) -> Result<RunConfig, ConfigError> {
        validate_range("base-delay-ms", self.base_delay_ms, 0, 60_000)?;
        validate_range("max-attempts", self.max_attempts as u64, 1, 32)?;

        let mut command = self.command.into_iter();
        let program = command
            .next()
            .filter(|program| !program.trim().is_empty())
            .ok_or(ConfigError::MissingCommand)?;

        Ok(RunConfig {
            program,
            args: command.collect(),
            base_delay_ms: self.base_delay_ms,
            max_attempts: self.max_attempts,
            verbose: self.verbose,
        })
    }
}

fn validate_range(field: &'static str, actual: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if actual < min || actual > max {
        return Err(ConfigError::OutOfRange {
            field,
            min,
            max,
            actual,
        });
    }
    Ok(())
}
