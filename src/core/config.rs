//! # Queue configuration.
//!
//! Provides [`QueueConfig`] centralized construction settings for a [`TaskQueue`](crate::TaskQueue).
//!
//! Defaults apply only to fields the caller leaves out:
//! ```rust
//! use taskqueue::QueueConfig;
//!
//! let cfg = QueueConfig { ordered: true, ..QueueConfig::default() };
//! assert_eq!(cfg.concurrency, 4);
//! ```
//!
//! ## Validation
//! Values are checked once, at build time. `concurrency = 0` is rejected with
//! [`ConfigError::InvalidConcurrency`]; it is never treated as "unlimited" or
//! silently replaced by the default.

use std::num::NonZeroUsize;

use crate::error::ConfigError;

/// Construction settings for a task queue.
///
/// ## Field semantics
/// - `concurrency`: maximum handlers in flight at once (must be ≥ 1, fixed for the queue's lifetime)
/// - `ordered`: deliver `TaskComplete`/`TaskFail` in enqueue order instead of settlement order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueConfig {
    /// Maximum number of tasks whose handler may run simultaneously.
    pub concurrency: usize,

    /// Selects the notification regime.
    ///
    /// - `false`: outcome events follow settlement order (first to finish, first notified)
    /// - `true`: outcome events follow enqueue order; a slow head task withholds later outcomes
    pub ordered: bool,
}

impl QueueConfig {
    /// Concurrency used when the caller does not set one.
    pub const DEFAULT_CONCURRENCY: usize = 4;

    /// Returns the validated concurrency limit.
    ///
    /// # Errors
    /// [`ConfigError::InvalidConcurrency`] when `concurrency < 1`.
    pub fn concurrency_limit(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.concurrency).ok_or(ConfigError::InvalidConcurrency {
            value: self.concurrency,
        })
    }
}

impl Default for QueueConfig {
    /// Default configuration:
    ///
    /// - `concurrency = 4`
    /// - `ordered = false`
    fn default() -> Self {
        Self {
            concurrency: Self::DEFAULT_CONCURRENCY,
            ordered: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = QueueConfig::default();
        assert_eq!(cfg.concurrency, 4);
        assert!(!cfg.ordered);
        assert_eq!(cfg.concurrency_limit().map(NonZeroUsize::get), Ok(4));
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let cfg = QueueConfig {
            concurrency: 0,
            ..QueueConfig::default()
        };
        assert_eq!(
            cfg.concurrency_limit(),
            Err(ConfigError::InvalidConcurrency { value: 0 })
        );
    }

    #[test]
    fn one_is_the_smallest_valid_limit() {
        let cfg = QueueConfig {
            concurrency: 1,
            ordered: true,
        };
        assert_eq!(cfg.concurrency_limit().map(NonZeroUsize::get), Ok(1));
    }
}
