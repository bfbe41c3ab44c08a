use goroutines::chan::Channel;
use goroutines::error::SendError;
use goroutines::go;
use goroutines::task;
use goroutines::time::{sleep, timeout};

use futures::poll;

use std::time::Duration;

#[goroutines::test]
async fn channel_send_and_receive_across_goroutines() {
    let channel = Channel::new();

    go({
        let channel = channel.clone();
        async move { channel.send(10 * 20).await.unwrap() }
    });

    assert_eq!(channel.receive().await, 200);
}

#[goroutines::test]
async fn channel_many_senders() {
    let channel = Channel::new();

    for i in 1..=5 {
        let channel = channel.clone();
        go(async move { channel.send(i).await.unwrap() });
    }

    let mut values = Vec::new();
    for _ in 0..5 {
        values.push(channel.receive().await);
    }
    values.sort();

    assert_eq!(values, vec![1, 2, 3, 4, 5]);
}

#[goroutines::test]
async fn channel_unbuffered_send_waits_for_receiver() {
    let channel = Channel::new();

    let sender = task::spawn({
        let channel = channel.clone();
        async move { channel.send("ping").await }
    });

    sleep(Duration::from_millis(30)).await;
    assert!(!sender.is_finished(), "send must not complete without a receiver");

    assert_eq!(channel.receive_ex().await, Some("ping"));
    assert!(sender.await.is_ok());
}

#[goroutines::test]
async fn channel_receive_before_send() {
    let channel = Channel::new();

    let receiver = task::spawn({
        let channel = channel.clone();
        async move { channel.receive_ex().await }
    });

    sleep(Duration::from_millis(20)).await;
    channel.send(42).await.unwrap();

    assert_eq!(receiver.await, Some(42));
}

#[goroutines::test]
async fn channel_single_sender_order_is_preserved() {
    let channel = Channel::new();

    go({
        let channel = channel.clone();
        async move {
            let _close = channel.close_on_drop();
            for i in 0..100 {
                channel.send(i).await.unwrap();
            }
        }
    });

    let mut received = Vec::new();
    while let Some(value) = channel.receive_ex().await {
        received.push(value);
    }

    assert_eq!(received, (0..100).collect::<Vec<_>>());
}

#[goroutines::test]
async fn channel_receivers_served_in_arrival_order() {
    let channel = Channel::new();

    let first = channel.receive_ex();
    let second = channel.receive_ex();
    let third = channel.receive_ex();

    go({
        let channel = channel.clone();
        async move {
            for i in 1..=3 {
                channel.send(i).await.unwrap();
            }
        }
    });

    assert_eq!(first.await, Some(1));
    assert_eq!(second.await, Some(2));
    assert_eq!(third.await, Some(3));
}

#[goroutines::test]
async fn channel_close_is_idempotent() {
    let channel = Channel::<u8>::new();
    assert!(channel.is_open());

    assert!(channel.close());
    assert!(!channel.close());
    assert!(!channel.is_open());
}

#[goroutines::test]
async fn channel_send_on_closed_returns_value() {
    let channel = Channel::new();
    channel.close();

    let err = channel.send(String::from("late")).await.unwrap_err();
    assert_eq!(err.to_string(), "send on closed channel");
    assert_eq!(err.into_inner(), "late");
}

#[goroutines::test]
async fn channel_receive_on_closed_yields_zero_value() {
    let channel = Channel::<i32>::new();
    channel.close();

    assert_eq!(channel.receive().await, 0);
    assert_eq!(channel.receive_ex().await, None);
    assert_eq!(channel.receive_ex().await, None, "closed is permanent");
}

#[goroutines::test]
async fn channel_close_releases_waiting_receivers() {
    let channel = Channel::<u32>::new();

    let receivers: Vec<_> = (0..3)
        .map(|_| {
            let channel = channel.clone();
            task::spawn(async move { channel.receive_ex().await })
        })
        .collect();

    sleep(Duration::from_millis(20)).await;
    assert!(channel.close());

    for receiver in receivers {
        assert_eq!(receiver.await, None);
    }
}

#[goroutines::test]
async fn channel_close_fails_waiting_sender() {
    let channel = Channel::new();

    let sender = task::spawn({
        let channel = channel.clone();
        async move { channel.send(7).await }
    });

    sleep(Duration::from_millis(20)).await;
    channel.close();

    assert_eq!(sender.await, Err(SendError(7)));
}

#[goroutines::test]
async fn channel_close_on_drop_ends_consumer_loop() {
    let channel = Channel::new();

    go({
        let channel = channel.clone();
        async move {
            let guard = channel.close_on_drop();
            for i in 0..3 {
                guard.channel().send(i).await.unwrap();
            }
        }
    });

    let mut seen = Vec::new();
    channel.for_each(|value| seen.push(value)).await;

    assert_eq!(seen, vec![0, 1, 2]);
    assert!(!channel.is_open());
}

#[goroutines::test]
async fn channel_abandoned_receive_does_not_lose_values() {
    let channel = Channel::new();

    let timed_out = timeout(Duration::from_millis(10), channel.receive_ex()).await;
    assert!(timed_out.is_err());

    go({
        let channel = channel.clone();
        async move { channel.send(5).await.unwrap() }
    });

    assert_eq!(channel.receive_ex().await, Some(5));
}

#[goroutines::test]
async fn channel_dropped_receive_hands_its_value_to_the_next() {
    let channel = Channel::new();

    let mut receive = channel.receive_ex();
    assert!(poll!(&mut receive).is_pending());

    // The rendezvous completes as soon as the receiver takes the value.
    channel.send(5).await.unwrap();
    drop(receive);

    assert_eq!(channel.receive_ex().await, Some(5));
}

#[goroutines::test]
async fn channel_dropped_receive_value_survives_close() {
    let channel = Channel::new();

    let mut receive = channel.receive_ex();
    assert!(poll!(&mut receive).is_pending());
    channel.send(5).await.unwrap();

    channel.close();
    drop(receive);

    assert_eq!(channel.receive_ex().await, Some(5));
    assert_eq!(channel.receive_ex().await, None);
}

#[goroutines::test]
async fn channel_dropped_receive_value_goes_to_waiting_receiver() {
    let channel = Channel::new();

    let mut first = channel.receive_ex();
    let mut second = channel.receive_ex();
    assert!(poll!(&mut first).is_pending());
    assert!(poll!(&mut second).is_pending());

    channel.send(5).await.unwrap();
    drop(first);

    assert_eq!(second.await, Some(5));
}

#[goroutines::test]
async fn channel_handles_compare_by_identity() {
    let a = Channel::<()>::new();
    let b = Channel::<()>::new();

    assert!(a.same_channel(&a.clone()));
    assert!(!a.same_channel(&b));
    assert_eq!(a.capacity(), 0);
    assert!(a.is_empty());
}
