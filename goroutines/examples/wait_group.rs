//! Example: waiting for a batch of goroutines

use goroutines::go;
use goroutines::sync::WaitGroup;
use goroutines::time::sleep;

use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[goroutines::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let wg = WaitGroup::new();

    for id in 0..4u64 {
        wg.add(1);

        let wg = wg.clone();
        go(async move {
            sleep(Duration::from_millis(25 * (4 - id))).await;
            println!("worker {id} done");
            wg.done();
        });
    }

    wg.wait().await;
    println!("all workers finished");
}
