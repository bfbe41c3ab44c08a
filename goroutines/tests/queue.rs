use goroutines::chan::AwaitableQueue;
use goroutines::go;
use goroutines::time::sleep;

use std::sync::Arc;
use std::time::Duration;

#[goroutines::test]
async fn queue_buffers_values_in_fifo_order() {
    let queue = AwaitableQueue::new();

    for i in 1..=3 {
        queue.enqueue(i).unwrap();
    }

    assert_eq!(queue.len(), 3);
    assert_eq!(queue.promised_len(), 0);

    assert_eq!(queue.dequeue().await, Some(1));
    assert_eq!(queue.dequeue().await, Some(2));
    assert_eq!(queue.dequeue().await, Some(3));
    assert!(queue.is_empty());
}

#[goroutines::test]
async fn queue_dequeue_registers_before_being_polled() {
    let queue = AwaitableQueue::new();

    let pending = queue.dequeue();
    assert_eq!(queue.promised_len(), 1);

    queue.enqueue("hello").unwrap();

    assert_eq!(queue.len(), 0, "value should go to the pending dequeue");
    assert_eq!(pending.await, Some("hello"));
}

#[goroutines::test]
async fn queue_promises_fulfilled_in_registration_order() {
    let queue = AwaitableQueue::new();

    let first = queue.dequeue();
    let second = queue.dequeue();

    queue.enqueue(1).unwrap();
    queue.enqueue(2).unwrap();

    assert_eq!(second.await, Some(2));
    assert_eq!(first.await, Some(1));
}

#[goroutines::test]
async fn queue_close_releases_pending_and_returns_buffered() {
    let queue = AwaitableQueue::new();
    queue.enqueue(10).unwrap();
    queue.enqueue(20).unwrap();

    assert_eq!(queue.close(), Some(vec![10, 20]));
    assert!(queue.is_closed());
    assert_eq!(queue.close(), None, "second close should be a no-op");

    assert_eq!(queue.enqueue(30), Err(30));
    assert_eq!(queue.dequeue().await, None);
}

#[goroutines::test]
async fn queue_close_wakes_waiting_consumer() {
    let queue = Arc::new(AwaitableQueue::<u32>::new());

    let handle = goroutines::task::spawn({
        let queue = queue.clone();
        async move { queue.dequeue().await }
    });

    sleep(Duration::from_millis(20)).await;
    assert_eq!(queue.promised_len(), 1);

    queue.close();
    assert_eq!(handle.await, None);
}

#[goroutines::test]
async fn queue_dropped_dequeue_is_withdrawn() {
    let queue = AwaitableQueue::new();

    drop(queue.dequeue());
    assert_eq!(queue.promised_len(), 0);

    queue.enqueue(1).unwrap();
    assert_eq!(queue.len(), 1, "nobody is waiting, so the value is buffered");
}

#[goroutines::test]
async fn queue_dropped_fulfilled_dequeue_puts_value_back_first() {
    let queue = AwaitableQueue::new();

    let abandoned = queue.dequeue();
    queue.enqueue(1).unwrap();
    queue.enqueue(2).unwrap();

    drop(abandoned);

    assert_eq!(queue.try_dequeue(), Some(1));
    assert_eq!(queue.try_dequeue(), Some(2));
    assert_eq!(queue.try_dequeue(), None);
}

#[goroutines::test]
async fn queue_consumers_across_tasks() {
    let queue = Arc::new(AwaitableQueue::new());
    let results = Arc::new(AwaitableQueue::new());

    for _ in 0..4 {
        let queue = queue.clone();
        let results = results.clone();
        go(async move {
            if let Some(value) = queue.dequeue().await {
                results.enqueue(value * 10).unwrap();
            }
        });
    }

    for i in 1..=4 {
        queue.enqueue(i).unwrap();
    }

    let mut seen = Vec::new();
    for _ in 0..4 {
        seen.push(results.dequeue().await.unwrap());
    }
    seen.sort();

    assert_eq!(seen, vec![10, 20, 30, 40]);
}
