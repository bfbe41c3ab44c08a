use goroutines::chan::Channel;
use goroutines::time::sleep;
use goroutines::{RuntimeBuilder, go};

use std::time::Duration;

async fn multiply(a: i32, b: i32, out: Channel<i32>) {
    out.send(a * b).await.unwrap();
}

#[goroutines::test]
async fn go_runs_concurrently() {
    let results = Channel::new();

    go({
        let results = results.clone();
        async move { results.send(6 * 7).await.unwrap() }
    });

    assert_eq!(results.receive().await, 42);
}

#[goroutines::test]
async fn go_macro_calls_function_with_arguments() {
    let results = Channel::new();

    go!(multiply, 10, 20, results.clone());

    assert_eq!(results.receive().await, 200);
}

#[goroutines::test]
async fn go_discards_output() {
    let done = Channel::buffered(1);

    go({
        let done = done.clone();
        async move {
            done.send(()).await.unwrap();
            "ignored"
        }
    });

    assert_eq!(done.receive_ex().await, Some(()));
}

#[test]
fn go_panicking_goroutine_leaves_runtime_usable() {
    let rt = RuntimeBuilder::new().worker_threads(1).build();

    let value = rt.block_on(async {
        go(async { panic!("goroutine failure") });
        sleep(Duration::from_millis(10)).await;

        let results = Channel::new();
        go!(multiply, 3, 4, results.clone());
        results.receive().await
    });

    assert_eq!(value, 12);
}

#[test]
#[should_panic(expected = "spawn must be called within the context of a runtime")]
fn go_outside_runtime_panics() {
    go(async {});
}
