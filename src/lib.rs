pub mod cli;
pub mod error;
pub mod retry;
pub mod runner;

pub use error::RetryError;
pub use retry::{Backoff, retry, retry_async};
