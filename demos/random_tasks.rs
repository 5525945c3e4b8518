//! # Example: random_tasks
//!
//! Feeds an ordered queue with jobs of random latency and random outcome,
//! one every 500ms, and logs every event.
//!
//! Shows how to:
//! - Build a [`TaskQueue`] with a closure handler.
//! - Drive the built-in [`LogWriter`] from a [`Subscription`](taskqueue::Subscription) until every outcome arrives.
//! - Observe head-of-line release in ordered mode.
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example random_tasks --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use taskqueue::{
    Event, EventKind, HandlerFn, LogWriter, QueueConfig, Subscribe, TaskError, TaskQueue,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Job {
    id: u32,
    wait: Duration,
}

const JOBS: u32 = 20;

/// Prints a compact line per event next to the `LogWriter` output.
fn print_event(ev: &Event<Job, f64>) {
    let can_admit = ev.can_admit.unwrap_or(false);
    match ev.kind {
        EventKind::TaskStart => println!("starting task {} can start {}", ev.task.id, can_admit),
        EventKind::TaskComplete => println!("\tfinished-completed {}", ev.task.id),
        EventKind::TaskFail => println!("\tfinished-failed {}", ev.task.id),
        EventKind::TaskDone => println!("\t\tdone {} can start {}", ev.task.id, can_admit),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let handler = HandlerFn::arc(|job: Arc<Job>| async move {
        tokio::time::sleep(job.wait).await;
        let roll: f64 = rand::random();
        if roll > 0.5 {
            Ok(roll)
        } else {
            Err(TaskError::fail(format!("rolled {roll:.3}")))
        }
    });

    let queue: TaskQueue<Job, f64> = TaskQueue::builder(QueueConfig {
        concurrency: 4,
        ordered: true,
    })
    .with_handler(handler)
    .build()?;

    // Consume events inline so nothing is still in flight when `main` returns.
    let mut events = queue.subscribe();
    let printer = tokio::spawn(async move {
        let log = LogWriter::new();
        let mut outcomes = 0;
        while outcomes < JOBS {
            let Some(ev) = events.recv().await else {
                break;
            };
            log.on_event(&ev).await;
            print_event(&ev);
            if ev.kind.is_outcome() {
                outcomes += 1;
            }
        }
    });

    for id in 0..JOBS {
        let wait = Duration::from_millis(rand::random_range(0..5000));
        println!("enqueue task {id} wait {wait:?}");
        queue.enqueue(Job { id, wait });
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    printer.await?;
    Ok(())
}
