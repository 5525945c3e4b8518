//! # taskqueue
//!
//! **taskqueue** is a bounded-concurrency task scheduler for Tokio.
//!
//! Callers submit opaque tasks; a single async handler processes them with at
//! most `N` invocations in flight. Completion is reported through events in one
//! of two regimes: **unordered** (as each task settles) or **ordered** (in
//! exact enqueue order, even though execution overlaps and finishes out of order).
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   enqueue(t1) enqueue(t2) enqueue(t3) ...
//!        │           │           │
//!        ▼           ▼           ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  TaskQueue (one lock around all bookkeeping)                      │
//! │  - pending FIFO        (unscheduled tasks, strict enqueue order)  │
//! │  - active set          (≤ concurrency, keyed by dispatch ticket)  │
//! │  - reorder buffer      (ordered mode: slots released head-first)  │
//! │  - SubscriberSet       (lossless fan-out of events)               │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   ┌──────────┐       ┌──────────┐       ┌──────────┐
//!   │ handler  │       │ handler  │       │ handler  │   tokio::spawn
//!   │  (t1)    │       │  (t2)    │       │  (...)   │   + catch_unwind
//!   └────┬─────┘       └────┬─────┘       └────┬─────┘
//!        └──── settle(ticket, outcome) ────────┘
//!                           │
//!                           ▼
//!          TaskDone ──► TaskComplete | TaskFail ──► admit more
//! ```
//!
//! ### Lifecycle
//! ```text
//! enqueue ──► pending ──► dispatched (TaskStart) ──► settled (TaskDone) ──► notified
//!                                                                   (TaskComplete | TaskFail)
//! ```
//!
//! ### Ordered mode and head-of-line blocking
//! ```text
//! concurrency = 2, ordered
//!   t1 (100ms ok)  t2 (10ms ok)  t3 (50ms fail)
//!
//!   0ms   TaskStart(t1) TaskStart(t2)          t3 pending
//!  10ms   TaskDone(t2)                         complete(t2) withheld
//!         TaskStart(t3)
//!  60ms   TaskDone(t3)                         fail(t3) withheld
//! 100ms   TaskDone(t1) TaskComplete(t1) TaskComplete(t2) TaskFail(t3)
//! ```
//! `TaskDone` and slot release are never withheld; only outcome events are.
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                         |
//! |-------------------|--------------------------------------------------------------|--------------------------------------------|
//! | **Queue**         | Admission, pause/start, counters.                            | [`TaskQueue`], [`QueueState`]              |
//! | **Handlers**      | The async function applied to each task.                     | [`TaskHandler`], [`HandlerFn`]             |
//! | **Events**        | Typed notifications with results and timings.               | [`Event`], [`EventKind`], [`TaskResult`]   |
//! | **Subscribers**   | Observer workers or channel subscriptions.                   | [`Subscribe`], [`Subscription`]            |
//! | **Errors**        | Typed configuration and handler errors.                      | [`ConfigError`], [`TaskError`]             |
//! | **Configuration** | Concurrency limit and ordering regime, validated at build.   | [`QueueConfig`], [`TaskQueueBuilder`]      |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use taskqueue::{HandlerFn, QueueConfig, TaskError, TaskQueue};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetch = HandlerFn::arc(|url: Arc<String>| async move {
//!         tokio::time::sleep(Duration::from_millis(5)).await;
//!         if url.is_empty() {
//!             return Err(TaskError::fail("empty url"));
//!         }
//!         Ok(url.len())
//!     });
//!
//!     let queue: TaskQueue<String, usize> = TaskQueue::builder(QueueConfig::default())
//!         .with_handler(fetch)
//!         .build()?;
//!
//!     let mut events = queue.subscribe();
//!     queue.enqueue("https://example.com".to_string());
//!     queue.enqueue(String::new());
//!     queue.wait_idle().await;
//!
//!     while let Some(ev) = events.try_recv() {
//!         println!("{} {:?}", ev.kind.as_label(), ev.task);
//!     }
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use self::core::{QueueConfig, QueueState, TaskQueue, TaskQueueBuilder};
pub use error::{ConfigError, TaskError};
pub use events::{Event, EventKind};
pub use subscribers::{Subscribe, Subscription};
pub use tasks::{BoxHandlerFuture, HandlerFn, HandlerRef, TaskHandler, TaskResult};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
