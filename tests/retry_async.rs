use std::time::Duration;

use assert_matches::assert_matches;
use tokio::time::Instant;

use backoff_retry::error::RetryError;
use backoff_retry::retry::{Backoff, retry_async};

#[derive(Debug, PartialEq)]
struct Failure(u32);

// Paused timers fire on millisecond ticks, so allow sub-tick drift.
fn assert_waited(start: Instant, expected: Duration) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(10),
        "waited {elapsed:?}, expected {expected:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn waits_exponentially_between_async_attempts() {
    let start = Instant::now();
    let mut calls = 0;

    let result: Result<(), _> = retry_async(
        || {
            calls += 1;
            let failure = Failure(calls);
            async move { Err(failure) }
        },
        Duration::from_secs(2),
        4,
    )
    .await;

    assert_eq!(result, Err(RetryError::Exhausted(Failure(4))));
    assert_eq!(calls, 4);
    assert_waited(start, Duration::from_secs(14));
}

#[tokio::test(start_paused = true)]
async fn async_success_short_circuits() {
    let start = Instant::now();
    let mut calls = 0;

    let result = Backoff::new(Duration::from_secs(3), 3)
        .retry_async(|| {
            calls += 1;
            let attempt = calls;
            async move {
                if attempt < 3 {
                    Err(Failure(attempt))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

    assert_eq!(result, Ok(3));
    assert_waited(start, Duration::from_secs(3 + 9));
}

#[tokio::test(start_paused = true)]
async fn async_zero_attempts_never_polls_operation() {
    let mut calls = 0;

    let result: Result<(), RetryError<Failure>> = retry_async(
        || {
            calls += 1;
            async { Err(Failure(0)) }
        },
        Duration::from_secs(1),
        0,
    )
    .await;

    assert_matches!(result, Err(RetryError::NoAttempts));
    assert_eq!(calls, 0);
}

#[tokio::test(start_paused = true)]
async fn concurrent_async_calls_do_not_interfere() {
    let start = Instant::now();

    let fast = tokio::spawn(retry_async(
        || async { Err::<(), _>(Failure(1)) },
        Duration::from_secs(1),
        3,
    ));
    let slow = tokio::spawn(async move {
        let mut calls = 0;
        let result = Backoff::new(Duration::from_secs(2), 3)
            .retry_async(|| {
                calls += 1;
                let attempt = calls;
                async move {
                    if attempt < 2 {
                        Err(Failure(attempt))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;
        (result, calls)
    });

    let fast = fast.await.expect("fast task panicked");
    let (slow, slow_calls) = slow.await.expect("slow task panicked");

    assert_eq!(fast, Err(RetryError::Exhausted(Failure(1))));
    assert_eq!(slow, Ok(2));
    assert_eq!(slow_calls, 2);
    assert_waited(start, Duration::from_secs(2));
}
