//! # Admission and notification state machine.
//!
//! [`Core`] owns every container of a queue and is only ever touched under the
//! queue's state lock. It performs no I/O and spawns nothing: [`Core::admit`]
//! hands back the tasks to start, and the caller spawns them after releasing the lock.
//!
//! ## Flow
//! ```text
//! enqueue ──► pending.push_back ──► admit()
//!
//! admit():  while Started && active < limit && pending non-empty
//!   ├─► pop front, stamp started_at, ticket += 1
//!   ├─► ordered? reserve reorder slot
//!   ├─► active.insert(ticket)
//!   └─► emit TaskStart(task, can_admit)
//!
//! settle(ticket, outcome):
//!   ├─► active.remove(ticket), build TaskResult
//!   ├─► emit TaskDone(task, can_admit)          (never withheld)
//!   └─► unordered: emit TaskComplete | TaskFail
//!       ordered:   fill slot, release settled head slots in order
//! ```
//!
//! ## Invariants
//! - `active.len() <= limit` at all times.
//! - `pending` is strict FIFO.
//! - Exactly one outcome event per dispatched ticket.

use std::collections::{HashMap, VecDeque};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::SystemTime;

use super::{reorder::ReorderBuffer, state::QueueState};
use crate::error::TaskError;
use crate::events::{Event, EventKind};
use crate::subscribers::{SubscriberSet, Subscription};
use crate::tasks::TaskResult;

/// Bookkeeping for one dispatched task.
struct InFlight<T> {
    task: Arc<T>,
    started_at: SystemTime,
    /// Reorder slot, only in ordered mode.
    slot: Option<u64>,
}

/// A task admitted by [`Core::admit`] whose handler must now be spawned.
pub(crate) struct Dispatch<T> {
    pub ticket: u64,
    pub task: Arc<T>,
}

pub(crate) struct Core<T, R> {
    limit: NonZeroUsize,
    state: QueueState,
    pending: VecDeque<Arc<T>>,
    active: HashMap<u64, InFlight<T>>,
    next_ticket: u64,
    reorder: Option<ReorderBuffer<TaskResult<T, R>>>,
    subs: SubscriberSet<T, R>,
    next_seq: u64,
}

impl<T, R> Core<T, R>
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    pub(crate) fn new(limit: NonZeroUsize, ordered: bool, subs: SubscriberSet<T, R>) -> Self {
        Self {
            limit,
            state: QueueState::Started,
            pending: VecDeque::new(),
            active: HashMap::with_capacity(limit.get()),
            next_ticket: 0,
            reorder: ordered.then(ReorderBuffer::new),
            subs,
            next_seq: 0,
        }
    }

    #[inline]
    pub(crate) fn can_admit(&self) -> bool {
        self.active.len() < self.limit.get()
    }

    #[inline]
    pub(crate) fn limit(&self) -> usize {
        self.limit.get()
    }

    #[inline]
    pub(crate) fn state(&self) -> QueueState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: QueueState) {
        if self.state != state {
            tracing::debug!(from = self.state.as_label(), to = state.as_label(), "queue state changed");
        }
        self.state = state;
    }

    #[inline]
    pub(crate) fn is_ordered(&self) -> bool {
        self.reorder.is_some()
    }

    #[inline]
    pub(crate) fn active_count(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub(crate) fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn buffered_count(&self) -> usize {
        self.reorder.as_ref().map_or(0, ReorderBuffer::settled)
    }

    /// Nothing can produce further events without caller action.
    pub(crate) fn is_idle(&self) -> bool {
        self.active.is_empty() && (self.pending.is_empty() || self.state == QueueState::Paused)
    }

    pub(crate) fn subscribe(&mut self) -> Subscription<T, R> {
        self.subs.subscribe()
    }

    pub(crate) fn enqueue(&mut self, task: Arc<T>) {
        self.pending.push_back(task);
    }

    /// Greedily moves pending tasks into the active set.
    ///
    /// Returns the admitted tasks in dispatch order; the caller must start a
    /// handler for each and later report back through [`Core::settle`].
    pub(crate) fn admit(&mut self) -> Vec<Dispatch<T>> {
        let mut admitted = Vec::new();

        while self.state == QueueState::Started && self.can_admit() {
            let Some(task) = self.pending.pop_front() else {
                break;
            };
            let ticket = self.next_ticket;
            self.next_ticket += 1;

            let slot = self.reorder.as_mut().map(ReorderBuffer::reserve);
            self.active.insert(
                ticket,
                InFlight {
                    task: Arc::clone(&task),
                    started_at: SystemTime::now(),
                    slot,
                },
            );

            let can_admit = self.can_admit();
            tracing::debug!(
                ticket,
                active = self.active.len(),
                pending = self.pending.len(),
                "task dispatched"
            );
            self.emit(Event::new(EventKind::TaskStart, Arc::clone(&task)).with_can_admit(can_admit));
            admitted.push(Dispatch { ticket, task });
        }
        admitted
    }

    /// Records the outcome of a handler invocation.
    pub(crate) fn settle(&mut self, ticket: u64, outcome: Result<R, TaskError>) {
        let Some(flight) = self.active.remove(&ticket) else {
            tracing::error!(ticket, "settlement for unknown ticket ignored");
            return;
        };
        let result = TaskResult::settle(Arc::clone(&flight.task), outcome, flight.started_at);
        tracing::debug!(
            ticket,
            ok = result.is_ok(),
            elapsed = ?result.elapsed(),
            "task settled"
        );

        let can_admit = self.can_admit();
        self.emit(Event::new(EventKind::TaskDone, flight.task).with_can_admit(can_admit));
        self.notify(flight.slot, result);
    }

    /// Routes a settled result to `TaskComplete` / `TaskFail`, honouring the ordering regime.
    fn notify(&mut self, slot: Option<u64>, result: TaskResult<T, R>) {
        let Some((buffer, slot)) = self.reorder.as_mut().zip(slot) else {
            self.emit(Event::outcome(result));
            return;
        };

        if let Err(result) = buffer.fill(slot, result) {
            tracing::error!(slot, "reorder slot unavailable; notifying out of order");
            self.emit(Event::outcome(result));
            return;
        }

        let ready: Vec<_> = std::iter::from_fn(|| buffer.pop_ready()).collect();
        if ready.is_empty() {
            tracing::debug!(slot, withheld = buffer.settled(), "outcome withheld behind pending head");
        }
        for result in ready {
            self.emit(Event::outcome(result));
        }
    }

    fn emit(&mut self, event: Event<T, R>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.subs.emit(event.with_seq(seq));
    }
}
