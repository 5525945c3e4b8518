//! # Event subscriber trait.
//!
//! Provides [`Subscribe`] an extension point for plugging custom event handlers into a queue.
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently of the queue)
//! - **Per-subscriber unbounded queue** (events are never dropped)
//! - **Panic isolation** (panics are caught and logged; the worker keeps going)
//!
//! ## Architecture
//! ```text
//! SubscriberSet ──► [unbounded queue] ──► worker task ──► subscriber.on_event()
//!                                      └─► panic caught → tracing::warn!
//! ```
//!
//! ## Rules
//! - A slow subscriber only grows its own queue; it never delays dispatch.
//! - Events are processed sequentially (FIFO) per subscriber, in emission order.
//! - A subscriber only sees `&Event`; calling back into the queue is allowed
//!   and cannot deadlock because delivery is asynchronous.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use taskqueue::{Event, EventKind, Subscribe};
//!
//! struct Failures;
//!
//! #[async_trait]
//! impl Subscribe<String, ()> for Failures {
//!     async fn on_event(&self, ev: &Event<String, ()>) {
//!         if matches!(ev.kind, EventKind::TaskFail) {
//!             // page someone, bump a counter, ...
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "failures" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for queue observability.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe<T, R>: Send + Sync + 'static
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, not in the publisher context.
    async fn on_event(&self, event: &Event<T, R>);

    /// Returns the subscriber name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
