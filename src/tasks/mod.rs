//! # Task handler contract and settled results.
//!
//! This module provides the task-related types:
//! - [`TaskHandler`] - trait for the async function applied to each task
//! - [`HandlerFn`] - closure-based handler implementation
//! - [`HandlerRef`] - shared reference to a handler (`Arc<dyn TaskHandler<T, R>>`)
//! - [`TaskResult`] - outcome of one handler invocation with timings

mod handler;
mod result;

pub use handler::{BoxHandlerFuture, HandlerFn, HandlerRef, TaskHandler};
pub use result::TaskResult;
