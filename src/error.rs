use std::process::ExitStatus;

use thiserror::Error;

/// Failure outcome of a retried operation.
#[derive(Debug, Error, PartialEq)]
pub enum RetryError<E> {
    /// The attempt budget was zero, so the operation never ran.
    #[error("retry budget is zero attempts; operation was never invoked")]
    NoAttempts,
    /// Every attempt failed; carries the error from the final one.
    #[error("operation failed on every attempt")]
    Exhausted(#[source] E),
}

impl<E> RetryError<E> {
    pub fn last_error(&self) -> Option<&E> {
        match self {
            Self::NoAttempts => None,
            Self::Exhausted(err) => Some(err),
        }
    }

    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::NoAttempts => None,
            Self::Exhausted(err) => Some(err),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no command given; pass it after `--`")]
    MissingCommand,
    #[error("`{field}` out of range: got {actual}, expected {min}..={max}")]
    OutOfRange {
        field: &'static str,
        min: u64,
        max: u64,
        actual: u64,
    },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with status {status}")]
    ExitStatus { program: String, status: ExitStatus },
}
