use goroutines::chan::{Channel, Receiver, SelectGate};

use std::sync::Arc;

#[test]
fn gate_claims_once() {
    let gate = SelectGate::new();
    assert!(!gate.is_claimed());

    assert!(gate.claim());
    assert!(!gate.claim());
    assert!(gate.is_claimed());
}

#[test]
fn receiver_accepts_at_most_once() {
    let receiver = Receiver::new();
    assert!(!receiver.is_settled());

    assert_eq!(receiver.try_receive(Some(1)), Ok(()));
    assert!(receiver.is_settled());

    assert_eq!(receiver.try_receive(Some(2)), Err(Some(2)));
    assert_eq!(receiver.try_receive(None), Err(None));
}

#[test]
fn receivers_sharing_a_gate_race() {
    let gate = Arc::new(SelectGate::new());
    let first = Receiver::with_gate(gate.clone());
    let second = Receiver::with_gate(gate.clone());

    assert_eq!(second.try_receive(Some("b")), Ok(()));
    assert_eq!(first.try_receive(Some("a")), Err(Some("a")));

    assert!(first.is_settled());
    assert!(gate.is_claimed());
}

#[goroutines::test]
async fn receive_into_resolves_with_sent_value() {
    let channel = Channel::new();
    let receiver = Arc::new(Receiver::new());

    let pending = channel.receive_into(receiver.clone());

    channel.send(11).await.unwrap();

    assert!(receiver.is_settled());
    assert_eq!(pending.await, Some(11));
}

#[goroutines::test]
async fn receive_into_closed_channel_settles_at_once() {
    let channel = Channel::<u8>::new();
    channel.close();

    let receiver = Arc::new(Receiver::new());
    let pending = channel.receive_into(receiver.clone());

    assert!(receiver.is_settled());
    assert_eq!(pending.await, None);
}

#[goroutines::test]
async fn send_skips_receiver_settled_elsewhere() {
    let channel = Channel::new();

    let stale = Arc::new(Receiver::new());
    let stale_receive = channel.receive_into(stale.clone());
    assert_eq!(stale.try_receive(Some(0)), Ok(()));

    let live = channel.receive_ex();

    channel.send(5).await.unwrap();

    assert_eq!(live.await, Some(5));
    assert_eq!(stale_receive.await, Some(0));
}
