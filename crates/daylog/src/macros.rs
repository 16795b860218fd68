//! Emit macros.
//!
//! Each takes a logger (anything that derefs to [`Logger`](crate::Logger))
//! followed by ordinary `tracing` event arguments:
//!
//! ```no_run
//! let logger = daylog::create_dev_logger();
//! daylog::info!(logger, user = "ada", attempts = 3, "signed in");
//! daylog::error!(daylog::get(), "boom");
//! ```

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.in_scope(|| $crate::__tracing::debug!($($arg)+))
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.in_scope(|| $crate::__tracing::info!($($arg)+))
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.in_scope(|| $crate::__tracing::warn!($($arg)+))
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.in_scope(|| $crate::__tracing::error!($($arg)+))
    };
}
