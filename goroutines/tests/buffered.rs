use goroutines::chan::Channel;
use goroutines::error::Error;
use goroutines::select::Select;
use goroutines::task;
use goroutines::time::sleep;

use futures::poll;

use std::time::Duration;

#[goroutines::test]
async fn buffered_send_completes_without_receiver() {
    let channel = Channel::buffered(5);

    for i in 1..=5 {
        channel.send(i).await.unwrap();
    }

    assert_eq!(channel.len(), 5);
    assert_eq!(channel.capacity(), 5);

    for i in 1..=5 {
        assert_eq!(channel.receive().await, i);
    }
    assert!(channel.is_empty());
}

#[test]
fn buffered_rejects_zero_capacity() {
    assert_eq!(
        Channel::<u8>::try_buffered(0).unwrap_err(),
        Error::InvalidBufferCapacity(0)
    );
}

#[test]
#[should_panic(expected = "buffer capacity must be > 0")]
fn buffered_zero_capacity_panics() {
    let _ = Channel::<u8>::buffered(0);
}

#[goroutines::test]
async fn buffered_overflow_blocks_sender() {
    let channel = Channel::buffered(2);

    let sender = task::spawn({
        let channel = channel.clone();
        async move {
            for i in 1..=3 {
                channel.send(i).await.unwrap();
            }
        }
    });

    sleep(Duration::from_millis(30)).await;
    assert!(!sender.is_finished(), "third send must wait for room");
    assert_eq!(channel.len(), 2);

    assert_eq!(channel.receive().await, 1);
    assert_eq!(channel.receive().await, 2);
    assert_eq!(channel.receive().await, 3);

    sender.await;
}

#[goroutines::test]
async fn buffered_order_kept_with_blocked_senders() {
    let channel = Channel::buffered(1);

    let sender = task::spawn({
        let channel = channel.clone();
        async move {
            for i in 1..=4 {
                channel.send(i).await.unwrap();
            }
        }
    });

    sleep(Duration::from_millis(20)).await;

    let mut received = Vec::new();
    for _ in 0..4 {
        received.push(channel.receive().await);
    }

    assert_eq!(received, vec![1, 2, 3, 4]);
    sender.await;
}

#[goroutines::test]
async fn buffered_receive_before_send_with_overflow() {
    let channel = Channel::buffered(2);

    let receives: Vec<_> = (0..5).map(|_| channel.receive_ex()).collect();

    for i in 1..=5 {
        channel.send(i).await.unwrap();
    }
    assert!(channel.is_empty(), "every value went to a waiting receiver");

    let mut received = Vec::new();
    for receive in receives {
        received.push(receive.await.unwrap());
    }

    assert_eq!(received, vec![1, 2, 3, 4, 5]);
}

#[goroutines::test]
async fn buffered_close_drains_buffer_first() {
    let channel = Channel::buffered(3);
    channel.send(1).await.unwrap();
    channel.send(2).await.unwrap();

    assert!(channel.close());
    assert!(channel.send(3).await.is_err());

    assert_eq!(channel.receive_ex().await, Some(1));
    assert_eq!(channel.receive_ex().await, Some(2));
    assert_eq!(channel.receive_ex().await, None);
}

#[goroutines::test]
async fn buffered_close_keeps_value_evicted_by_blocked_sender() {
    let channel = Channel::buffered(1);
    channel.send('a').await.unwrap();

    let mut blocked = Box::pin(channel.send('b'));
    assert!(poll!(&mut blocked).is_pending());
    assert_eq!(channel.len(), 1);

    assert!(channel.close());
    assert_eq!(blocked.await, Ok(()));

    assert_eq!(channel.receive_ex().await, Some('a'));
    assert_eq!(channel.receive_ex().await, Some('b'));
    assert_eq!(channel.receive_ex().await, None);
}

#[goroutines::test]
async fn buffered_close_with_spawned_blocked_sender() {
    let channel = Channel::buffered(1);
    channel.send('a').await.unwrap();

    let sender = task::spawn({
        let channel = channel.clone();
        async move { channel.send('b').await }
    });

    sleep(Duration::from_millis(20)).await;
    assert!(!sender.is_finished());
    channel.close();

    assert_eq!(sender.await, Ok(()));
    assert_eq!(channel.receive_ex().await, Some('a'));
    assert_eq!(channel.receive_ex().await, Some('b'));
    assert_eq!(channel.receive_ex().await, None);
}

#[goroutines::test]
async fn buffered_keeps_order_after_select_left_a_stale_receiver() {
    let channel = Channel::buffered(1);
    let other = Channel::buffered(1);

    let mut pending = Select::new()
        .case_ex(&channel, |v| ("channel", v))
        .case_ex(&other, |v| ("other", v));
    assert!(poll!(&mut pending).is_pending());

    other.send(99).await.unwrap();
    assert_eq!(pending.await, Some(("other", Some(99))));

    channel.send(1).await.unwrap();
    let mut blocked = Box::pin(channel.send(2));
    assert!(poll!(&mut blocked).is_pending());

    assert_eq!(channel.receive_ex().await, Some(1));
    assert_eq!(blocked.await, Ok(()));
    assert_eq!(channel.receive_ex().await, Some(2));
    assert!(channel.is_empty());
}

#[goroutines::test]
async fn buffered_select_takes_oldest_value_while_sender_blocked() {
    let channel = Channel::buffered(1);
    let other = Channel::<i32>::buffered(1);

    channel.send(1).await.unwrap();
    let mut blocked = Box::pin(channel.send(2));
    assert!(poll!(&mut blocked).is_pending());

    let picked = Select::new()
        .case_ex(&other, |v| ("other", v))
        .case_ex(&channel, |v| ("channel", v))
        .await;
    assert_eq!(picked, Some(("channel", Some(1))));

    assert_eq!(blocked.await, Ok(()));
    assert_eq!(channel.receive_ex().await, Some(2));
}
