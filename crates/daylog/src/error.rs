//! Error types for logger construction and rotation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring, building or rotating a logger.
///
/// Emitting records never produces one of these; only the administrative
/// operations (construction, rotation, watcher start) can fail.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// `LOGGER_MOD` or a parsed mode was neither prod nor dev.
    #[error("unrecognized logger mode `{0}` (expected `prod` or `dev`)")]
    InvalidMode(String),

    /// `LOGGER_TYPE` was neither service nor request.
    #[error("unrecognized logger type `{0}` (expected `service` or `request`)")]
    InvalidCategory(String),

    /// The log directory could not be created.
    #[error("failed to create log directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The dated file could not be opened for appending.
    #[error("failed to open log file {}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The watcher thread or its runtime could not be started.
    #[error("failed to start rotation watcher")]
    Watcher(#[source] io::Error),
}

/// Result alias for logger operations.
pub type Result<T> = std::result::Result<T, LoggerError>;
