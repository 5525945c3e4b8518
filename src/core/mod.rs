//! Queue core: configuration, admission and ordering.
//!
//! The public API from this module is [`TaskQueue`] with its builder and
//! configuration. Internal modules:
//! - [`dispatch`]: admission loop, active-set accounting and notification routing;
//! - [`reorder`]: sequence-addressed buffer that releases results in enqueue order;
//! - [`queue`]: the shared handle, locking and handler spawning;
//! - [`builder`]: validated construction.

mod builder;
mod config;
mod dispatch;
mod queue;
mod reorder;
mod state;

pub use builder::TaskQueueBuilder;
pub use config::QueueConfig;
pub use queue::TaskQueue;
pub use state::QueueState;
