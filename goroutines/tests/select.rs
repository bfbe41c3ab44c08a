use goroutines::chan::Channel;
use goroutines::select::{Select, case, case_ex, select};
use goroutines::time::{after, sleep};
use goroutines::{go, task};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[goroutines::test]
async fn select_takes_the_ready_channel() {
    let ready = Channel::buffered(1);
    let idle = Channel::<i32>::new();
    ready.send(7).await.unwrap();

    let result = Select::new()
        .case(&ready, |v| v * 2)
        .case(&idle, |v| v)
        .await;

    assert_eq!(result, Some(14));
}

#[goroutines::test]
async fn select_prefers_earlier_case_and_keeps_the_other_value() {
    let a = Channel::buffered(1);
    let b = Channel::buffered(1);
    a.send("a").await.unwrap();
    b.send("b").await.unwrap();

    let result = Select::new().case(&a, |v| v).case(&b, |v| v).await;

    assert_eq!(result, Some("a"));
    assert_eq!(b.len(), 1, "the losing channel must keep its value");
    assert_eq!(b.receive().await, "b");
}

#[goroutines::test]
async fn select_waits_for_a_later_send() {
    let numbers = Channel::<i32>::new();
    let words = Channel::<String>::new();

    go({
        let words = words.clone();
        async move {
            sleep(Duration::from_millis(20)).await;
            words.send("late".to_string()).await.unwrap();
        }
    });

    let result = Select::new()
        .case(&numbers, |n| format!("number {n}"))
        .case(&words, |w| format!("word {w}"))
        .await;

    assert_eq!(result.as_deref(), Some("word late"));
}

#[goroutines::test]
async fn select_losing_arm_does_not_swallow_values() {
    let a = Channel::new();
    let b = Channel::new();

    go({
        let a = a.clone();
        async move { a.send(1).await.unwrap() }
    });

    let result = Select::new().case(&a, |v| v).case(&b, |v| v).await;
    assert_eq!(result, Some(1));

    go({
        let b = b.clone();
        async move { b.send(9).await.unwrap() }
    });

    assert_eq!(b.receive().await, 9);
}

#[goroutines::test]
async fn select_all_closed_returns_none_without_callback() {
    let a = Channel::<u8>::new();
    let b = Channel::<u8>::new();
    a.close();
    b.close();

    let calls = Arc::new(AtomicUsize::new(0));
    let (c1, c2) = (calls.clone(), calls.clone());

    let result = Select::new()
        .case(&a, move |_| c1.fetch_add(1, Ordering::SeqCst))
        .case(&b, move |_| c2.fetch_add(1, Ordering::SeqCst))
        .await;

    assert!(result.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[goroutines::test]
async fn select_skips_closed_channel() {
    let closed = Channel::<i32>::new();
    closed.close();

    let open = Channel::buffered(1);
    open.send(3).await.unwrap();

    let result = Select::new()
        .case(&closed, |_| "closed")
        .case(&open, |_| "open")
        .await;

    assert_eq!(result, Some("open"));
}

#[goroutines::test]
async fn select_channel_closed_while_waiting_fires_with_none() {
    let channel = Channel::<i32>::new();

    go({
        let channel = channel.clone();
        async move {
            sleep(Duration::from_millis(20)).await;
            channel.close();
        }
    });

    let result = Select::new()
        .case_ex(&channel, |v: Option<i32>| v.is_none())
        .await;

    assert_eq!(result, Some(true));
}

#[goroutines::test]
async fn select_case_gets_zero_value_on_close() {
    let channel = Channel::<u64>::new();

    go({
        let channel = channel.clone();
        async move {
            sleep(Duration::from_millis(20)).await;
            channel.close();
        }
    });

    assert_eq!(Select::new().case(&channel, |v| v).await, Some(0));
}

#[goroutines::test]
async fn select_case_any_fans_in() {
    let inputs: Vec<Channel<usize>> = (0..3).map(|_| Channel::new()).collect();

    go({
        let second = inputs[1].clone();
        async move { second.send(11).await.unwrap() }
    });

    let refs: Vec<&Channel<usize>> = inputs.iter().collect();
    let result = Select::new().case_any(&refs, |v| v + 1).await;

    assert_eq!(result, Some(12));
}

#[goroutines::test]
async fn select_timeout_arm_with_after() {
    let never = Channel::<i32>::new();

    let result = Select::new()
        .case(&never, Some)
        .case_ex(&after(Duration::from_millis(20)), |_| None)
        .await;

    assert_eq!(result, Some(None));
}

#[goroutines::test]
async fn select_from_prebuilt_cases() {
    let a = Channel::<i32>::new();
    let b = Channel::buffered(1);
    b.send(5).await.unwrap();

    let result = select(vec![
        case(&a, |v| v),
        case_ex(&b, |v: Option<i32>| v.unwrap_or(-1) * 10),
    ])
    .await;

    assert_eq!(result, Some(50));
}

#[goroutines::test]
async fn select_macro_expands_to_case_ex() {
    let a = Channel::<i32>::new();
    let b = Channel::buffered(1);
    b.send(4).await.unwrap();

    let result = goroutines::select! {
        a => |v: Option<i32>| v.map(|x| x + 100),
        b => |v: Option<i32>| v.map(|x| x * 2),
    };

    assert_eq!(result, Some(Some(8)));
}

#[goroutines::test]
async fn select_exactly_one_value_per_select() {
    let a = Channel::new();
    let b = Channel::new();

    let senders: Vec<_> = (1..=5)
        .flat_map(|i| {
            let a = a.clone();
            let b = b.clone();
            [
                task::spawn(async move { a.send(i).await.unwrap() }),
                task::spawn(async move { b.send(i * 10).await.unwrap() }),
            ]
        })
        .collect();

    let mut total = 0;
    for _ in 0..10 {
        total += Select::new()
            .case(&a, |v| v)
            .case(&b, |v| v)
            .await
            .unwrap();
    }

    for sender in senders {
        sender.await;
    }

    assert_eq!(total, 15 + 150);
}
