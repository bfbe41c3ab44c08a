use goroutines::task;
use goroutines::time::{after, sleep, sleep_until, timeout};

use std::time::{Duration, Instant};

#[goroutines::test]
async fn time_sleep_waits_at_least_duration() {
    let start = Instant::now();
    sleep(Duration::from_millis(40)).await;

    assert!(start.elapsed() >= Duration::from_millis(40));
}

#[goroutines::test]
async fn time_sleep_zero_is_fast() {
    let start = Instant::now();
    sleep(Duration::ZERO).await;

    assert!(start.elapsed() < Duration::from_millis(20));
}

#[goroutines::test]
async fn time_sleep_until_deadline() {
    let deadline = Instant::now() + Duration::from_millis(30);

    let sleep = sleep_until(deadline);
    assert_eq!(sleep.deadline(), deadline);
    sleep.await;

    assert!(Instant::now() >= deadline);
}

#[goroutines::test]
async fn time_timeout_completes_before_deadline() {
    let handle = task::spawn(async {
        sleep(Duration::from_millis(5)).await;
        123
    });

    let result = timeout(Duration::from_millis(200), handle).await;

    assert_eq!(result.ok(), Some(123));
}

#[goroutines::test]
async fn time_timeout_expires() {
    let result = timeout(Duration::from_millis(10), sleep(Duration::from_millis(200))).await;

    let err = result.expect_err("the deadline passes first");
    assert_eq!(err.to_string(), "deadline has elapsed");
}

#[goroutines::test]
async fn time_after_delivers_once_then_closes() {
    let start = Instant::now();
    let timer = after(Duration::from_millis(20));

    let fired = timer.receive_ex().await.expect("after delivers one instant");
    assert!(fired >= start + Duration::from_millis(20));

    assert_eq!(timer.receive_ex().await, None);
    assert!(!timer.is_open());
}
