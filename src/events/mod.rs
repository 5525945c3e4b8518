//! Queue events: types emitted to subscribers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publisher**: the queue core, while it holds its state lock.
//! - **Consumers**: [`Subscribe`](crate::Subscribe) implementations and
//!   [`Subscription`](crate::Subscription) receivers, via the fan-out in `subscribers`.

mod event;

pub use event::{Event, EventKind};
