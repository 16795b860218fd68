//! Process-wide default logger.
//!
//! A thin facade over explicitly built [`Logger`] values. Installing one
//! also makes it the global `tracing` default, so plain `tracing::info!`
//! calls and instrumented libraries log through it.

use arc_swap::ArcSwap;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::Event;

use crate::config::{Category, LoggerConfig, Mode};
use crate::error::Result;
use crate::global;
use crate::logger::Logger;

static CURRENT: OnceLock<ArcSwap<Logger>> = OnceLock::new();

/// The current default logger.
///
/// If nothing has been installed yet, one is built from `LOGGER_MOD`,
/// `LOGGER_TYPE` and `LOGGER_SERVICE_PATH`.
///
/// # Panics
/// Panics if that implicit initialization fails: an invalid configuration
/// value or a log directory that cannot be opened.
pub fn get() -> Arc<Logger> {
    CURRENT
        .get_or_init(|| {
            let logger = from_env_or_panic();
            global::install();
            ArcSwap::from_pointee(logger)
        })
        .load_full()
}

fn from_env_or_panic() -> Logger {
    match LoggerConfig::from_env().and_then(|config| Logger::from_config(&config)) {
        Ok(logger) => logger,
        Err(e) => panic!("daylog: cannot initialize logger from environment: {e}"),
    }
}

/// Build the default logger from the environment and install it.
pub fn init() -> Result<Arc<Logger>> {
    let config = LoggerConfig::from_env()?;
    Ok(set(Logger::from_config(&config)?))
}

/// Install `logger` as the default, returning the shared handle.
///
/// The previous default is torn down once its last handle is dropped.
pub fn set(logger: Logger) -> Arc<Logger> {
    let logger = Arc::new(logger);
    CURRENT
        .get_or_init(|| ArcSwap::new(Arc::clone(&logger)))
        .store(Arc::clone(&logger));
    global::install();
    logger
}

/// Emit `event` through the current default, if one is installed.
pub(crate) fn forward_event(event: &Event<'_>) {
    if let Some(current) = CURRENT.get() {
        current.load().dispatch_event(event);
    }
}

/// Install a production service logger writing under `path`.
///
/// `None` or an empty path selects `./logs/service_logs/`.
pub fn create_prod_logger(path: Option<&Path>) -> Result<Arc<Logger>> {
    let mut builder = Logger::builder()
        .mode(Mode::Production)
        .category(Category::Service);
    if let Some(path) = path {
        builder = builder.path(path);
    }
    Ok(set(builder.build()?))
}

/// Install a development service logger.
pub fn create_dev_logger() -> Arc<Logger> {
    let logger = Logger::builder()
        .category(Category::Service)
        .build_development();
    set(logger)
}

/// Build an independent request logger; the default is left alone.
///
/// `None` or an empty path selects `./logs/request_logs/`.
pub fn create_request_logger(mode: Mode, path: Option<&Path>) -> Result<Logger> {
    let mut builder = Logger::builder().mode(mode).category(Category::Request);
    if let Some(path) = path {
        builder = builder.path(path);
    }
    builder.build()
}
