//! Example: fan-in with select and a timeout arm

use goroutines::chan::Channel;
use goroutines::go;
use goroutines::select::Select;
use goroutines::time::{after, sleep};

use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn ticker(name: &'static str, every: Duration, count: usize) -> Channel<String> {
    let channel = Channel::new();

    go({
        let channel = channel.clone();
        async move {
            let _close = channel.close_on_drop();
            for i in 0..count {
                sleep(every).await;
                if channel.send(format!("{name} #{i}")).await.is_err() {
                    return;
                }
            }
        }
    });

    channel
}

enum Event {
    Message(String),
    Closed(&'static str),
    Quiet,
}

fn message(name: &'static str) -> impl FnOnce(Option<String>) -> Event {
    move |received| match received {
        Some(m) => Event::Message(m),
        None => Event::Closed(name),
    }
}

#[goroutines::main(worker_threads = 2)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let fast = ticker("fast", Duration::from_millis(50), 6);
    let slow = ticker("slow", Duration::from_millis(120), 3);

    loop {
        let event = Select::new()
            .case_ex(&fast, message("fast"))
            .case_ex(&slow, message("slow"))
            .case_ex(&after(Duration::from_millis(300)), |_| Event::Quiet)
            .await;

        match event {
            Some(Event::Message(m)) => println!("{m}"),
            Some(Event::Closed(name)) => println!("{name} finished"),
            Some(Event::Quiet) | None => {
                println!("quiet for a while, stopping");
                break;
            }
        }
    }
}
