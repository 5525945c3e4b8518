//! # Built-in subscribers
//!
//! Small, self-contained implementations useful for demos.
//!
//! - [`LogWriter`]: writes events through `tracing` in a human-readable form (demo/debug).

mod log;

pub use log::LogWriter;
