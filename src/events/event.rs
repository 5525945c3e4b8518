//! # Notifications emitted by a task queue.
//!
//! The [`EventKind`] enum classifies the four notifications:
//! - **Immediate** (settlement order): `TaskStart`, `TaskDone`
//! - **Outcome** (settlement order, or enqueue order in ordered mode): `TaskComplete`, `TaskFail`
//!
//! The [`Event`] struct carries the task handle plus kind-specific metadata.
//!
//! ## Ordering guarantees
//! Each event has a per-queue sequence number (`seq`) assigned at emission time,
//! increasing monotonically. Every subscriber observes events in `seq` order.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use taskqueue::{Event, EventKind};
//!
//! let ev: Event<&str, ()> = Event::new(EventKind::TaskStart, Arc::new("job-1"))
//!     .with_can_admit(true);
//!
//! assert_eq!(ev.kind, EventKind::TaskStart);
//! assert_eq!(*ev.task, "job-1");
//! assert_eq!(ev.can_admit, Some(true));
//! ```

use std::sync::Arc;
use std::time::SystemTime;

use crate::tasks::TaskResult;

/// Classification of queue events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Task left the pending FIFO and its handler is about to run.
    ///
    /// Sets:
    /// - `task`: task handle
    /// - `can_admit`: whether another task could be admitted right now
    TaskStart,

    /// Handler settled (success or failure); the concurrency slot is already released.
    ///
    /// Never withheld by ordering.
    ///
    /// Sets:
    /// - `task`: task handle
    /// - `can_admit`: whether another task could be admitted right now
    TaskDone,

    /// Handler succeeded.
    ///
    /// Sets:
    /// - `task`: task handle
    /// - `result`: settled record with the handler output
    TaskComplete,

    /// Handler failed or panicked.
    ///
    /// Sets:
    /// - `task`: task handle
    /// - `result`: settled record with the [`TaskError`](crate::TaskError)
    TaskFail,
}

impl EventKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::TaskStart => "task_start",
            EventKind::TaskDone => "task_done",
            EventKind::TaskComplete => "task_complete",
            EventKind::TaskFail => "task_fail",
        }
    }

    /// `true` for `TaskComplete` / `TaskFail`, the kinds subject to ordering.
    #[inline]
    pub fn is_outcome(&self) -> bool {
        matches!(self, EventKind::TaskComplete | EventKind::TaskFail)
    }
}

/// Queue event with optional metadata.
///
/// - `seq`: per-queue emission sequence
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug)]
pub struct Event<T, R> {
    /// Monotonically increasing emission number (per queue).
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Task handle, identical (`Arc::ptr_eq`) to the one that was enqueued.
    pub task: Arc<T>,
    /// Capacity snapshot for `TaskStart` / `TaskDone`.
    pub can_admit: Option<bool>,
    /// Settled record for `TaskComplete` / `TaskFail`.
    pub result: Option<Arc<TaskResult<T, R>>>,
}

impl<T, R> Event<T, R> {
    /// Creates a new event of the given kind with current timestamp.
    ///
    /// `seq` is assigned by the queue when the event is emitted.
    pub fn new(kind: EventKind, task: Arc<T>) -> Self {
        Self {
            seq: 0,
            at: SystemTime::now(),
            kind,
            task,
            can_admit: None,
            result: None,
        }
    }

    /// Builds the outcome event for a settled task.
    pub fn outcome(result: TaskResult<T, R>) -> Self {
        let kind = if result.is_ok() {
            EventKind::TaskComplete
        } else {
            EventKind::TaskFail
        };
        Event::new(kind, Arc::clone(result.task())).with_result(result)
    }

    /// Attaches the capacity snapshot.
    #[inline]
    pub fn with_can_admit(mut self, can_admit: bool) -> Self {
        self.can_admit = Some(can_admit);
        self
    }

    /// Attaches a settled record.
    #[inline]
    pub fn with_result(mut self, result: TaskResult<T, R>) -> Self {
        self.result = Some(Arc::new(result));
        self
    }

    #[inline]
    pub(crate) fn with_seq(mut self, seq: u64) -> Self {
        self.seq = seq;
        self
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self.kind, EventKind::TaskComplete)
    }

    #[inline]
    pub fn is_fail(&self) -> bool {
        matches!(self.kind, EventKind::TaskFail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;

    #[test]
    fn outcome_kind_follows_result() {
        let ok = TaskResult::settle(Arc::new(1_u8), Ok("fine"), SystemTime::now());
        let ev = Event::outcome(ok);
        assert!(ev.is_complete());
        assert!(ev.kind.is_outcome());
        assert_eq!(ev.result.as_ref().and_then(|r| r.result().copied()), Some("fine"));

        let err: TaskResult<u8, &str> =
            TaskResult::settle(Arc::new(2_u8), Err(TaskError::fail("bad")), SystemTime::now());
        let ev = Event::outcome(err);
        assert!(ev.is_fail());
        assert_eq!(*ev.task, 2);
    }

    #[test]
    fn outcome_shares_task_handle() {
        let task = Arc::new("t");
        let res: TaskResult<&str, ()> = TaskResult::settle(Arc::clone(&task), Ok(()), SystemTime::now());
        let ev = Event::outcome(res);
        assert!(Arc::ptr_eq(&ev.task, &task));
        assert!(ev.can_admit.is_none());
    }

    #[test]
    fn labels() {
        assert_eq!(EventKind::TaskStart.as_label(), "task_start");
        assert_eq!(EventKind::TaskDone.as_label(), "task_done");
        assert_eq!(EventKind::TaskComplete.as_label(), "task_complete");
        assert_eq!(EventKind::TaskFail.as_label(), "task_fail");
        assert!(!EventKind::TaskDone.is_outcome());
    }
}
