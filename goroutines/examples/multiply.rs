//! Example: goroutines reporting results over a channel

use goroutines::chan::Channel;
use goroutines::go;
use tracing_subscriber::EnvFilter;

async fn multiply(a: i32, b: i32, results: Channel<i32>) {
    if results.send(a * b).await.is_err() {
        tracing::warn!(a, b, "results channel closed");
    }
}

#[goroutines::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let results = Channel::new();

    for i in 1..=5 {
        go!(multiply, i, i, results.clone());
    }

    let mut total = 0;
    for _ in 0..5 {
        total += results.receive().await;
    }

    println!("sum of squares: {total}");
}
