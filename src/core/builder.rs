use std::sync::Arc;

use tokio::runtime::Handle;

use super::{
    config::QueueConfig,
    dispatch::Core,
    queue::{Shared, TaskQueue},
};
use crate::{
    error::ConfigError,
    subscribers::{Subscribe, SubscriberSet},
    tasks::HandlerRef,
};

/// Builder for constructing a [`TaskQueue`] with optional features.
pub struct TaskQueueBuilder<T, R> {
    cfg: QueueConfig,
    handler: Option<HandlerRef<T, R>>,
    subscribers: Vec<Arc<dyn Subscribe<T, R>>>,
}

impl<T, R> TaskQueueBuilder<T, R>
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: QueueConfig) -> Self {
        Self {
            cfg,
            handler: None,
            subscribers: Vec::new(),
        }
    }

    /// Sets the handler applied to every task (required).
    pub fn with_handler(mut self, handler: HandlerRef<T, R>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Sets event subscribers.
    ///
    /// Each subscriber gets a dedicated worker and an unbounded queue.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe<T, R>>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Validates the configuration and builds the queue in the `Started` state.
    ///
    /// Must be called from within a Tokio runtime; handlers and subscriber
    /// workers are spawned on it.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidConcurrency`] when `concurrency < 1`
    /// - [`ConfigError::MissingHandler`] when no handler was set
    /// - [`ConfigError::NoRuntime`] outside a Tokio runtime
    pub fn build(self) -> Result<TaskQueue<T, R>, ConfigError> {
        let limit = self.cfg.concurrency_limit()?;
        let handler = self.handler.ok_or(ConfigError::MissingHandler)?;
        let runtime = Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;

        let subs = SubscriberSet::new(self.subscribers, &runtime);
        let core = Core::new(limit, self.cfg.ordered, subs);

        tracing::debug!(
            concurrency = limit.get(),
            ordered = self.cfg.ordered,
            "task queue built"
        );
        Ok(TaskQueue::from_shared(Arc::new(Shared::new(core, handler, runtime))))
    }
}
