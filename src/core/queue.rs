//! # TaskQueue: bounded-concurrency dispatch with optional in-order notification.
//!
//! The [`TaskQueue`] owns a pending FIFO, an active set bounded by the
//! concurrency limit and, in ordered mode, a reorder buffer. It spawns one
//! handler invocation per dispatched task on the Tokio runtime captured at
//! build time and fans events out to subscribers.
//!
//! ## High-level architecture
//! ```text
//! enqueue(task) ──► lock ──► Core::enqueue + Core::admit ──► unlock ──► spawn handlers
//!                              │ emit TaskStart
//!                              ▼
//!                         SubscriberSet ──► workers / subscriptions
//!
//! handler settles ──► catch_unwind ──► lock ──► Core::settle + Core::admit ──► unlock ──► spawn
//!                                        │ emit TaskDone, TaskComplete | TaskFail
//! ```
//!
//! ## Rules
//! - All bookkeeping and emission happen under one lock; handlers never run under it.
//! - `start`, `pause` and `enqueue` never fail and never observe handler errors.
//! - Handler panics are captured as [`TaskError::Panicked`].
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use taskqueue::{EventKind, HandlerFn, QueueConfig, TaskError, TaskQueue};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let queue: TaskQueue<u64, u64> = TaskQueue::builder(QueueConfig { concurrency: 2, ordered: true })
//!         .with_handler(HandlerFn::arc(|n: Arc<u64>| async move {
//!             if *n == 3 {
//!                 return Err(TaskError::fail("three"));
//!             }
//!             Ok(*n * 10)
//!         }))
//!         .build()?;
//!
//!     let mut events = queue.subscribe();
//!     for n in 1..=4 {
//!         queue.enqueue(n);
//!     }
//!     queue.wait_idle().await;
//!
//!     let mut outcomes = Vec::new();
//!     while let Some(ev) = events.try_recv() {
//!         if ev.kind.is_outcome() {
//!             outcomes.push((*ev.task, ev.kind));
//!         }
//!     }
//!     assert_eq!(outcomes, vec![
//!         (1, EventKind::TaskComplete),
//!         (2, EventKind::TaskComplete),
//!         (3, EventKind::TaskFail),
//!         (4, EventKind::TaskComplete),
//!     ]);
//!     Ok(())
//! }
//! ```

use std::panic::AssertUnwindSafe;
use std::pin::pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::Notify;

use super::builder::TaskQueueBuilder;
use super::config::QueueConfig;
use super::dispatch::{Core, Dispatch};
use super::state::QueueState;
use crate::error::{ConfigError, TaskError, panic_message};
use crate::subscribers::Subscription;
use crate::tasks::HandlerRef;

/// State shared between queue handles and in-flight handler invocations.
pub(super) struct Shared<T, R> {
    core: Mutex<Core<T, R>>,
    handler: HandlerRef<T, R>,
    runtime: Handle,
    idle: Notify,
}

impl<T, R> Shared<T, R>
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    pub(super) fn new(core: Core<T, R>, handler: HandlerRef<T, R>, runtime: Handle) -> Self {
        Self {
            core: Mutex::new(core),
            handler,
            runtime,
            idle: Notify::new(),
        }
    }

    /// Locks the core; bookkeeping never panics mid-update, so a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Core<T, R>> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs admission on a held guard, releases it, then starts the admitted handlers.
    fn pump(self: &Arc<Self>, mut core: MutexGuard<'_, Core<T, R>>) {
        let admitted = core.admit();
        let idle = core.is_idle();
        drop(core);

        if idle {
            self.idle.notify_waiters();
        }
        for dispatch in admitted {
            self.spawn(dispatch);
        }
    }

    fn spawn(self: &Arc<Self>, Dispatch { ticket, task }: Dispatch<T>) {
        let shared = Arc::clone(self);
        let handler = Arc::clone(&self.handler);

        self.runtime.spawn(async move {
            let run = AssertUnwindSafe(async move { handler.handle(task).await });
            let outcome = match run.catch_unwind().await {
                Ok(outcome) => outcome,
                Err(panic_err) => {
                    let info = panic_message(&*panic_err);
                    tracing::warn!(ticket, info = %info, "task handler panicked");
                    Err(TaskError::Panicked { info })
                }
            };
            shared.settle(ticket, outcome);
        });
    }

    fn settle(self: &Arc<Self>, ticket: u64, outcome: Result<R, TaskError>) {
        let mut core = self.lock();
        core.settle(ticket, outcome);
        self.pump(core);
    }
}

/// Bounded-concurrency task queue.
///
/// Cheap to clone: every clone drives the same queue.
pub struct TaskQueue<T, R> {
    shared: Arc<Shared<T, R>>,
}

impl<T, R> Clone for TaskQueue<T, R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, R> TaskQueue<T, R>
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    /// Returns a builder for a queue with the given configuration.
    pub fn builder(cfg: QueueConfig) -> TaskQueueBuilder<T, R> {
        TaskQueueBuilder::new(cfg)
    }

    /// Creates a queue without subscribers.
    ///
    /// # Errors
    /// See [`TaskQueueBuilder::build`].
    pub fn new(handler: HandlerRef<T, R>, concurrency: usize, ordered: bool) -> Result<Self, ConfigError> {
        Self::builder(QueueConfig { concurrency, ordered })
            .with_handler(handler)
            .build()
    }

    pub(super) fn from_shared(shared: Arc<Shared<T, R>>) -> Self {
        Self { shared }
    }

    /// Resumes admission and immediately dispatches whatever fits.
    ///
    /// Idempotent: on a started queue nothing beyond normal admission happens.
    pub fn start(&self) {
        let mut core = self.shared.lock();
        core.set_state(QueueState::Started);
        self.shared.pump(core);
    }

    /// Stops admitting new tasks. In-flight handlers keep running and still notify.
    pub fn pause(&self) {
        let mut core = self.shared.lock();
        core.set_state(QueueState::Paused);
        let idle = core.is_idle();
        drop(core);

        if idle {
            self.shared.idle.notify_waiters();
        }
    }

    /// Appends a task to the pending FIFO and runs admission.
    ///
    /// Outcomes surface only through events.
    pub fn enqueue(&self, task: T) {
        self.enqueue_arc(Arc::new(task));
    }

    /// Like [`enqueue`](Self::enqueue) for a task that is already shared.
    ///
    /// The same `Arc` is handed to the handler and carried by every event for this task.
    pub fn enqueue_arc(&self, task: Arc<T>) {
        let mut core = self.shared.lock();
        core.enqueue(task);
        self.shared.pump(core);
    }

    /// Registers a receiver for every event emitted from now on.
    pub fn subscribe(&self) -> Subscription<T, R> {
        self.shared.lock().subscribe()
    }

    /// Waits until no further events can happen without caller action:
    /// nothing active, and either nothing pending or the queue is paused.
    ///
    /// Every event has been handed to subscriber channels by then, but
    /// [`Subscribe`](crate::Subscribe) workers may still be processing them.
    pub async fn wait_idle(&self) {
        loop {
            let mut notified = pin!(self.shared.idle.notified());
            notified.as_mut().enable();

            if self.shared.lock().is_idle() {
                return;
            }
            notified.await;
        }
    }

    pub fn state(&self) -> QueueState {
        self.shared.lock().state()
    }

    /// The fixed concurrency limit.
    pub fn concurrency_limit(&self) -> usize {
        self.shared.lock().limit()
    }

    /// Tasks whose handler is currently running.
    pub fn active_count(&self) -> usize {
        self.shared.lock().active_count()
    }

    /// Tasks waiting in the FIFO.
    pub fn pending_count(&self) -> usize {
        self.shared.lock().pending_count()
    }

    /// Settled results withheld behind a slower earlier task (ordered mode only).
    pub fn buffered_count(&self) -> usize {
        self.shared.lock().buffered_count()
    }

    /// `true` while fewer than `concurrency_limit()` handlers are running.
    pub fn can_admit(&self) -> bool {
        self.shared.lock().can_admit()
    }

    pub fn is_ordered(&self) -> bool {
        self.shared.lock().is_ordered()
    }
}
