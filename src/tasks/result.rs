//! # Settled outcome of one handler invocation.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::error::TaskError;

/// Immutable record built the instant a handler invocation settles.
///
/// Exactly one of [`result`](Self::result) / [`error`](Self::error) is populated.
#[derive(Debug)]
pub struct TaskResult<T, R> {
    task: Arc<T>,
    outcome: Result<R, TaskError>,
    started_at: SystemTime,
    finished_at: SystemTime,
}

impl<T, R> TaskResult<T, R> {
    /// Stamps `finished_at` with the current wall-clock time.
    pub(crate) fn settle(task: Arc<T>, outcome: Result<R, TaskError>, started_at: SystemTime) -> Self {
        Self {
            task,
            outcome,
            started_at,
            finished_at: SystemTime::now(),
        }
    }

    /// The task handle as originally enqueued.
    #[inline]
    pub fn task(&self) -> &Arc<T> {
        &self.task
    }

    /// Handler output, if it succeeded.
    #[inline]
    pub fn result(&self) -> Option<&R> {
        self.outcome.as_ref().ok()
    }

    /// Handler failure, if it failed.
    #[inline]
    pub fn error(&self) -> Option<&TaskError> {
        self.outcome.as_ref().err()
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Borrowed view of the full outcome.
    #[inline]
    pub fn outcome(&self) -> Result<&R, &TaskError> {
        self.outcome.as_ref()
    }

    /// Consumes the record and returns the outcome.
    pub fn into_outcome(self) -> Result<R, TaskError> {
        self.outcome
    }

    /// When the task was dispatched.
    #[inline]
    pub fn started_at(&self) -> SystemTime {
        self.started_at
    }

    /// When the handler settled.
    #[inline]
    pub fn finished_at(&self) -> SystemTime {
        self.finished_at
    }

    /// Handler wall-clock duration (zero if the clock went backwards).
    pub fn elapsed(&self) -> Duration {
        self.finished_at
            .duration_since(self.started_at)
            .unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_side_is_populated() {
        let ok: TaskResult<&str, u8> = TaskResult::settle(Arc::new("a"), Ok(1), SystemTime::now());
        assert!(ok.is_ok());
        assert_eq!(ok.result(), Some(&1));
        assert!(ok.error().is_none());

        let err: TaskResult<&str, u8> =
            TaskResult::settle(Arc::new("b"), Err(TaskError::fail("x")), SystemTime::now());
        assert!(!err.is_ok());
        assert!(err.result().is_none());
        assert_eq!(err.error(), Some(&TaskError::fail("x")));
        assert_eq!(err.into_outcome(), Err(TaskError::fail("x")));
    }

    #[test]
    fn finish_is_not_before_start() {
        let started = SystemTime::now();
        let r: TaskResult<(), ()> = TaskResult::settle(Arc::new(()), Ok(()), started);
        assert!(r.finished_at() >= r.started_at());
        assert_eq!(r.started_at(), started);
    }
}
