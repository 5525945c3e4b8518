//! # Lossless event fan-out to multiple subscribers.
//!
//! Provides `SubscriberSet`, which distributes queue events to every registered
//! [`Subscribe`] worker and every live [`Subscription`] without blocking the queue.
//!
//! ## Architecture
//! ```text
//! emit(event)                                     (called under the queue lock)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► subscriber1.on_event()
//!     │    (unbounded)       └──────► panic → tracing::warn!, keep going
//!     ├──► [queue 2] ──► worker 2 ──► subscriber2.on_event()
//!     └──► [queue N] ──► Subscription::recv()     (caller-owned receiver)
//! ```
//!
//! ## Rules
//! - **Total order**: `emit` runs while the queue state lock is held, so every
//!   channel receives events in the same order they were produced.
//! - **Lossless**: channels are unbounded; `emit` never drops for a live receiver.
//! - **Non-blocking**: `emit()` returns immediately.
//! - **Pruning**: channels whose receiver is gone are removed on the next `emit`.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a subscriber uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::{FutureExt, Stream};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::error::panic_message;
use crate::events::Event;
use crate::subscribers::Subscribe;

/// Name reported for channel-based subscriptions.
const SUBSCRIPTION_NAME: &str = "subscription";

/// Per-subscriber channel metadata.
struct SubscriberChannel<T, R> {
    name: &'static str,
    sender: mpsc::UnboundedSender<Arc<Event<T, R>>>,
}

/// Fan-out coordinator for queue events.
pub(crate) struct SubscriberSet<T, R> {
    channels: Vec<SubscriberChannel<T, R>>,
}

impl<T, R> SubscriberSet<T, R>
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    /// Creates a new set and spawns one worker task per subscriber on `runtime`.
    ///
    /// Workers run until the set (and with it every sender) is dropped.
    #[must_use]
    pub(crate) fn new(subs: Vec<Arc<dyn Subscribe<T, R>>>, runtime: &Handle) -> Self {
        let mut channels = Vec::with_capacity(subs.len());

        for sub in subs {
            let name = sub.name();
            let (tx, mut rx) = mpsc::unbounded_channel::<Arc<Event<T, R>>>();

            runtime.spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());

                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        tracing::warn!(
                            subscriber = sub.name(),
                            event = ev.kind.as_label(),
                            seq = ev.seq,
                            info = %panic_message(&*panic_err),
                            "subscriber panicked"
                        );
                    }
                }
            });
            channels.push(SubscriberChannel { name, sender: tx });
        }
        Self { channels }
    }

    /// Registers a caller-owned receiver that observes every event emitted from now on.
    pub(crate) fn subscribe(&mut self) -> Subscription<T, R> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.channels.push(SubscriberChannel {
            name: SUBSCRIPTION_NAME,
            sender: tx,
        });
        Subscription { rx }
    }

    /// Emits an event to all subscribers.
    ///
    /// Channels whose receiving side has gone away are pruned.
    pub(crate) fn emit(&mut self, event: Event<T, R>) {
        let event = Arc::new(event);
        self.channels.retain(|channel| {
            match channel.sender.send(Arc::clone(&event)) {
                Ok(()) => true,
                Err(_) => {
                    tracing::debug!(subscriber = channel.name, "subscriber channel closed; pruning");
                    false
                }
            }
        });
    }

    /// Number of live channels (workers plus subscriptions).
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.channels.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Caller-owned stream of queue events, created by [`TaskQueue::subscribe`](crate::TaskQueue::subscribe).
///
/// Yields events in emission order. Ends (`None`) once the queue and every
/// in-flight handler have been dropped.
pub struct Subscription<T, R> {
    rx: mpsc::UnboundedReceiver<Arc<Event<T, R>>>,
}

impl<T, R> Subscription<T, R> {
    /// Waits for the next event.
    pub async fn recv(&mut self) -> Option<Arc<Event<T, R>>> {
        self.rx.recv().await
    }

    /// Returns the next event if one is already buffered.
    pub fn try_recv(&mut self) -> Option<Arc<Event<T, R>>> {
        self.rx.try_recv().ok()
    }
}

impl<T, R> Stream for Subscription<T, R> {
    type Item = Arc<Event<T, R>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    use async_trait::async_trait;
    use std::time::Duration;

    struct Forward(mpsc::UnboundedSender<u64>);

    #[async_trait]
    impl Subscribe<u32, ()> for Forward {
        async fn on_event(&self, ev: &Event<u32, ()>) {
            let _ = self.0.send(ev.seq);
        }
        fn name(&self) -> &'static str {
            "forward"
        }
    }

    struct Panicky(mpsc::UnboundedSender<u64>);

    #[async_trait]
    impl Subscribe<u32, ()> for Panicky {
        async fn on_event(&self, ev: &Event<u32, ()>) {
            if ev.seq == 1 {
                panic!("boom");
            }
            let _ = self.0.send(ev.seq);
        }
    }

    fn start(seq: u64) -> Event<u32, ()> {
        Event::new(EventKind::TaskStart, Arc::new(7)).with_seq(seq)
    }

    #[tokio::test]
    async fn workers_receive_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut set = SubscriberSet::new(vec![Arc::new(Forward(tx))], &Handle::current());

        for seq in 0..5 {
            set.emit(start(seq));
        }
        for expected in 0..5 {
            assert_eq!(rx.recv().await, Some(expected));
        }
    }

    #[tokio::test]
    async fn panicking_subscriber_keeps_receiving() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut set = SubscriberSet::new(vec![Arc::new(Panicky(tx))], &Handle::current());

        set.emit(start(0));
        set.emit(start(1));
        set.emit(start(2));

        assert_eq!(rx.recv().await, Some(0));
        assert_eq!(rx.recv().await, Some(2));
    }

    #[tokio::test]
    async fn dropped_subscription_is_pruned() {
        let mut set: SubscriberSet<u32, ()> = SubscriberSet::new(Vec::new(), &Handle::current());
        let keep = set.subscribe();
        let gone = set.subscribe();
        assert_eq!(set.len(), 2);

        drop(gone);
        set.emit(start(0));
        assert_eq!(set.len(), 1);
        drop(keep);
        set.emit(start(1));
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn subscription_sees_only_later_events() {
        let mut set: SubscriberSet<u32, ()> = SubscriberSet::new(Vec::new(), &Handle::current());
        set.emit(start(0));

        let mut sub = set.subscribe();
        set.emit(start(1));

        let ev = tokio::time::timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("event within timeout")
            .expect("channel open");
        assert_eq!(ev.seq, 1);
        assert!(sub.try_recv().is_none());
    }
}
