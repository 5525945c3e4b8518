//! # Event subscribers for task queues.
//!
//! This module provides the [`Subscribe`] trait, the internal `SubscriberSet`
//! fan-out and the channel-based [`Subscription`].
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   TaskQueue core ── emit(Event) ──► SubscriberSet
//!                                        │
//!                                        ├──► worker ──► Subscribe::on_event(&Event)
//!                                        │                   ┌────┴────┬─────────┐
//!                                        │                   ▼         ▼         ▼
//!                                        │               LogWriter  Metrics   Custom
//!                                        │
//!                                        └──► Subscription::recv()  (caller-owned)
//! ```

#[cfg(feature = "logging")]
mod embedded;
mod subscriber;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use subscriber::Subscribe;
pub(crate) use subscriber_set::SubscriberSet;
pub use subscriber_set::Subscription;
