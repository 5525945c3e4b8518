//! # Task handler abstraction and function-backed implementation.
//!
//! This module defines the [`TaskHandler`] trait and a convenient closure-backed
//! implementation [`HandlerFn`]. The common handle type is [`HandlerRef`], an
//! `Arc<dyn TaskHandler<T, R>>` shared between the queue and its spawned invocations.
//!
//! A handler is invoked **exactly once** per dispatched task and produces a fresh
//! `'static` future per invocation, so no state leaks between tasks unless the
//! closure captures it explicitly (e.g. via `Arc<...>`).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use taskqueue::{HandlerFn, HandlerRef, TaskError};
//!
//! let double: HandlerRef<u32, u32> = HandlerFn::arc(|n: Arc<u32>| async move {
//!     if *n == 0 {
//!         return Err(TaskError::fail("zero"));
//!     }
//!     Ok(*n * 2)
//! });
//! # let _ = double;
//! ```

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::TaskError;

/// Boxed future returned by [`TaskHandler::handle`].
pub type BoxHandlerFuture<R> = BoxFuture<'static, Result<R, TaskError>>;

/// # Shared handle to a task handler.
pub type HandlerRef<T, R> = Arc<dyn TaskHandler<T, R>>;

/// # Asynchronous unit of work applied to every task.
///
/// The queue never inspects `T`; it only hands the task to the handler and
/// records what the returned future settles with.
///
/// ### Rules
/// - `Err(..)` and panics are both captured and surface as a `TaskFail` event.
/// - The returned future is spawned on the queue's runtime and must be `Send + 'static`.
pub trait TaskHandler<T, R>: Send + Sync + 'static {
    /// Creates the future that processes `task`.
    fn handle(&self, task: Arc<T>) -> BoxHandlerFuture<R>;
}

/// Closure-backed handler.
///
/// Wraps `F: Fn(Arc<T>) -> Fut`, producing a new future per task.
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new closure-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a [`HandlerRef`].
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<T, R, F, Fut> TaskHandler<T, R> for HandlerFn<F>
where
    F: Fn(Arc<T>) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<R, TaskError>> + Send + 'static,
    T: Send + Sync + 'static,
    R: Send + 'static,
{
    fn handle(&self, task: Arc<T>) -> BoxHandlerFuture<R> {
        Box::pin((self.f)(task))
    }
}
