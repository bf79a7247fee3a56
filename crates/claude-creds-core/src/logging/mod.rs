//! Diagnostic logging
//!
//! Two layers:
//! - `Logger` implementations carried by each resolver, switched on by the `verbose` flag
//! - `file_logger`, a process-wide trace file for the store backends, off unless
//!   `CLAUDE_CREDS_DEBUG` is set

mod traits;
mod noop;
mod console;
pub mod file_logger;

pub use traits::{Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;

pub use file_logger::{log_file_path, LogLevel};
