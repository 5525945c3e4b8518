/// Admission state of a queue.
///
/// Only gates new dispatches; handlers already running are never affected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum QueueState {
    /// Pending tasks are dispatched whenever capacity is free.
    #[default]
    Started,

    /// Tasks accumulate in the pending FIFO; in-flight tasks still finish and notify.
    Paused,
}

impl QueueState {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            QueueState::Started => "started",
            QueueState::Paused => "paused",
        }
    }
}
