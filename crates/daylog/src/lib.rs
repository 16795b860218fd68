//! Structured logging with daily file rotation.
//!
//! Development loggers print colorized text to stderr. Production loggers
//! write JSON lines to stdout and to `<dir>/<YYYY-MM-DD>.txt`, switching to a
//! new file when the local date changes.

pub mod config;
pub mod error;
pub mod file_sink;
mod global;
pub mod logger;
mod macros;
pub mod registry;
pub mod sink;
pub mod watcher;

#[doc(hidden)]
pub mod testing;

pub use config::{Category, LoggerConfig, Mode};
pub use error::{LoggerError, Result};
pub use logger::{Logger, LoggerBuilder};
pub use registry::{create_dev_logger, create_prod_logger, create_request_logger, get, init, set};
pub use sink::ConsoleWriter;
pub use watcher::RotationWatcher;

#[doc(hidden)]
pub use tracing as __tracing;
