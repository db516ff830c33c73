//! Tests for the retry executor.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use rstest::rstest;
use tokio::time::Instant;

use super::*;

#[rstest]
#[case(0, 1000)]
#[case(1, 2000)]
#[case(2, 4000)]
#[case(3, 8000)]
fn test_backoff_doubles(#[case] attempt: u32, #[case] expected_ms: u64) {
    let policy = RetryPolicy::default();
    assert_eq!(policy.backoff_for(attempt), Duration::from_millis(expected_ms));
}

#[test]
fn test_backoff_saturates() {
    let policy = RetryPolicy::new(3, Duration::from_secs(1));
    assert_eq!(policy.backoff_for(64), Duration::from_secs(1).saturating_mul(u32::MAX));
}

#[test]
fn test_zero_budget_still_attempts_once() {
    assert_eq!(RetryPolicy::immediate(0).attempts(), 1);
    assert_eq!(RetryPolicy::immediate(3).attempts(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_succeeds_on_third_attempt_after_two_backoffs() {
    let executor = RetryExecutor::new(RetryPolicy::new(3, Duration::from_millis(1000)));
    let start = Instant::now();
    let calls = RefCell::new(Vec::new());

    let result: Result<&str, RetryError<String>> = executor
        .run("get:listing-images:7/a.jpg", || {
            calls.borrow_mut().push(start.elapsed());
            let attempt = calls.borrow().len();
            async move {
                if attempt < 3 {
                    Err(format!("connection reset #{attempt}"))
                } else {
                    Ok("bytes")
                }
            }
        })
        .await;

    assert_eq!(result.unwrap(), "bytes");
    let calls = calls.into_inner();
    assert_eq!(calls.len(), 3);
    // Sleeps of base*1 then base*2.
    assert_eq!(calls[1] - calls[0], Duration::from_millis(1000));
    assert_eq!(calls[2] - calls[1], Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_wraps_last_error() {
    let executor = RetryExecutor::new(RetryPolicy::new(3, Duration::from_millis(10)));
    let counter = Cell::new(0u32);

    let result: Result<(), RetryError<String>> = executor
        .run("delete:rc:doc.pdf", || {
            counter.set(counter.get() + 1);
            let n = counter.get();
            async move { Err(format!("timeout {n}")) }
        })
        .await;

    let err = result.unwrap_err();
    assert_eq!(counter.get(), 3);
    assert_eq!(err.attempts(), 3);
    assert_eq!(err.last_error(), "timeout 3");
    assert_eq!(
        err.to_string(),
        "delete:rc:doc.pdf failed after 3 attempt(s): timeout 3"
    );
}

#[tokio::test]
async fn test_first_success_does_not_sleep() {
    let executor = RetryExecutor::default();
    let start = std::time::Instant::now();

    let result: Result<u8, RetryError<String>> = executor.run("noop", || async { Ok(1) }).await;

    assert_eq!(result.unwrap(), 1);
    assert!(start.elapsed() < Duration::from_millis(500));
}
