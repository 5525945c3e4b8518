//! Error types used by the task queue and by task handlers.
//!
//! This module defines two main error enums:
//!
//! - [`ConfigError`]: invalid construction arguments, raised by [`TaskQueueBuilder::build`](crate::TaskQueueBuilder::build).
//! - [`TaskError`]: failures of individual handler invocations, delivered through `TaskFail` events.
//!
//! Both types provide `as_label` for logging.

use std::fmt::Display;

use thiserror::Error;

/// # Errors produced while constructing a queue.
///
/// These are fatal and synchronous: an invalid configuration is never coerced
/// into a fallback value.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Concurrency limit below 1.
    #[error("concurrency must be at least 1, got {value}")]
    InvalidConcurrency {
        /// The rejected value.
        value: usize,
    },

    /// No task handler was supplied to the builder.
    #[error("task handler is required")]
    MissingHandler,

    /// The queue was built outside a Tokio runtime, so there is nowhere to run handlers.
    #[error("no tokio runtime available to run task handlers")]
    NoRuntime,
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskqueue::ConfigError;
    ///
    /// let err = ConfigError::InvalidConcurrency { value: 0 };
    /// assert_eq!(err.as_label(), "config_invalid_concurrency");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::InvalidConcurrency { .. } => "config_invalid_concurrency",
            ConfigError::MissingHandler => "config_missing_handler",
            ConfigError::NoRuntime => "config_no_runtime",
        }
    }
}

/// # Errors produced by handler invocations.
///
/// A failed task is terminal: the queue never retries it. The error travels
/// inside the [`TaskResult`](crate::TaskResult) of the matching `TaskFail` event.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Handler returned an error.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Handler panicked; the panic was caught by the queue.
    #[error("handler panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use taskqueue::TaskError;
    ///
    /// let err = TaskError::fail("connection refused");
    /// assert_eq!(err.to_string(), "execution failed: connection refused");
    /// ```
    pub fn fail(error: impl Display) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
        }
    }

    /// Returns the inner message without the variant prefix.
    pub fn as_message(&self) -> &str {
        match self {
            TaskError::Fail { error } => error,
            TaskError::Panicked { info } => info,
        }
    }
}

/// Renders a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(ConfigError::MissingHandler.as_label(), "config_missing_handler");
        assert_eq!(ConfigError::NoRuntime.as_label(), "config_no_runtime");
        assert_eq!(TaskError::fail("x").as_label(), "task_failed");
        assert_eq!(
            TaskError::Panicked { info: "boom".into() }.as_label(),
            "task_panicked"
        );
    }

    #[test]
    fn message_strips_variant_prefix() {
        let err = TaskError::fail(42);
        assert_eq!(err.as_message(), "42");
        assert_eq!(err.to_string(), "execution failed: 42");
    }

    #[test]
    fn panic_payloads_render() {
        let s: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_message(&*s), "static");

        let s: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*s), "owned");

        let s: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(&*s), "unknown panic");
    }

    #[test]
    fn invalid_concurrency_display() {
        let err = ConfigError::InvalidConcurrency { value: 0 };
        assert_eq!(err.to_string(), "concurrency must be at least 1, got 0");
    }
}
