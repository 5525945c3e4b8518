#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use taskqueue::{EventKind, HandlerFn, HandlerRef, QueueConfig, Subscription, TaskError, TaskQueue};

/// Test task: sleeps `wait_ms`, then succeeds with `id * 10` or fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: u32,
    pub wait_ms: u64,
    pub fail: bool,
}

impl Job {
    pub fn ok(id: u32, wait_ms: u64) -> Self {
        Self { id, wait_ms, fail: false }
    }

    pub fn failing(id: u32, wait_ms: u64) -> Self {
        Self { id, wait_ms, fail: true }
    }
}

/// Tracks how many handlers run at once and how many ran in total.
#[derive(Default)]
pub struct Gauge {
    pub current: AtomicUsize,
    pub peak: AtomicUsize,
    pub calls: AtomicUsize,
}

impl Gauge {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn sleeper(gauge: Arc<Gauge>) -> HandlerRef<Job, u32> {
    HandlerFn::arc(move |job: Arc<Job>| {
        let gauge = Arc::clone(&gauge);
        async move {
            gauge.calls.fetch_add(1, Ordering::SeqCst);
            let now = gauge.current.fetch_add(1, Ordering::SeqCst) + 1;
            gauge.peak.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(job.wait_ms)).await;

            gauge.current.fetch_sub(1, Ordering::SeqCst);
            if job.fail {
                return Err(TaskError::fail(format!("job {} failed", job.id)));
            }
            Ok(job.id * 10)
        }
    })
}

pub fn queue(concurrency: usize, ordered: bool) -> (TaskQueue<Job, u32>, Arc<Gauge>) {
    let gauge = Arc::new(Gauge::default());
    let queue = TaskQueue::builder(QueueConfig { concurrency, ordered })
        .with_handler(sleeper(Arc::clone(&gauge)))
        .build()
        .expect("valid config");
    (queue, gauge)
}

/// Drains everything already delivered to `sub` as `(kind, job id)` pairs.
pub fn drain(sub: &mut Subscription<Job, u32>) -> Vec<(EventKind, u32)> {
    std::iter::from_fn(|| sub.try_recv())
        .map(|ev| (ev.kind, ev.task.id))
        .collect()
}

/// Only `TaskComplete` / `TaskFail`, in delivery order.
pub fn outcomes(events: &[(EventKind, u32)]) -> Vec<(EventKind, u32)> {
    events.iter().copied().filter(|(k, _)| k.is_outcome()).collect()
}
