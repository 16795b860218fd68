//! Logger instances.
//!
//! A [`Logger`] owns exactly one active [`Sink`]. Emitting runs under a
//! shared lock, so any number of threads can log at once; rotation takes the
//! exclusive lock only for the moment it swaps the sink and the date. The
//! replacement file is always opened before that lock is taken.

use chrono::{Local, NaiveDate};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{dispatcher, Event};

use crate::config::{resolve_path, Category, LoggerConfig, Mode};
use crate::error::Result;
use crate::sink::{self, ConsoleWriter, Sink};
use crate::watcher::{RotationWatcher, DEFAULT_CHECK_INTERVAL};

struct State {
    sink: Sink,
    last_rotation: NaiveDate,
}

/// State shared between a logger and its rotation watcher.
pub(crate) struct Shared {
    state: RwLock<State>,
    mode: Mode,
    category: Category,
    path: PathBuf,
    console: ConsoleWriter,
}

impl Shared {
    pub(crate) fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        // recursive so that logging from inside `f` cannot deadlock behind a
        // queued rotation
        let state = self.state.read_recursive();
        dispatcher::with_default(state.sink.dispatch(), f)
    }

    /// Hand an event from another dispatcher to the active sink.
    fn dispatch_event(&self, event: &Event<'_>) {
        let state = self.state.read_recursive();
        let dispatch = state.sink.dispatch();
        if dispatch.enabled(event.metadata()) {
            dispatch.event(event);
        }
    }

    pub(crate) fn category(&self) -> Category {
        self.category
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn last_rotation(&self) -> NaiveDate {
        self.state.read_recursive().last_rotation
    }

    fn current_file(&self) -> Option<PathBuf> {
        self.state
            .read_recursive()
            .sink
            .file_path()
            .map(Path::to_path_buf)
    }

    /// Swap in the file for `today` if the active one belongs to another day.
    ///
    /// On error the active sink and date are left untouched.
    pub(crate) fn rotate_if_needed(&self, today: NaiveDate) -> Result<bool> {
        if self.mode != Mode::Production || self.last_rotation() == today {
            return Ok(false);
        }

        let fresh = sink::production_sink(&self.path, today, &self.console)?;

        let (stale, rotated) = {
            let mut state = self.state.write();
            if state.last_rotation == today {
                // lost a race with a concurrent rotation
                (fresh, false)
            } else {
                state.last_rotation = today;
                (mem::replace(&mut state.sink, fresh), true)
            }
        };

        let previous = stale.file_path().map(Path::to_path_buf);
        if let Err(e) = stale.close() {
            self.in_scope(|| {
                tracing::warn!(file = ?previous, error = %e, "failed to close previous log file")
            });
        }

        if rotated {
            let current = self.current_file();
            self.in_scope(|| {
                tracing::info!(previous = ?previous, current = ?current, "rotated log file")
            });
        }

        Ok(rotated)
    }
}

/// A structured logger with an active sink and optional daily rotation.
///
/// Production loggers own a [`RotationWatcher`] which is stopped when the
/// logger is dropped or [`Logger::stop_rotation`] is called.
pub struct Logger {
    shared: Arc<Shared>,
    watcher: Mutex<Option<RotationWatcher>>,
}

impl Logger {
    /// Start configuring a logger; see [`LoggerBuilder`] for the defaults.
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Build a logger from a resolved configuration.
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        Self::builder()
            .mode(config.mode)
            .category(config.category)
            .path(&config.path)
            .build()
    }

    /// Run `f` with this logger's active sink as the current dispatcher.
    ///
    /// Every `tracing` event emitted inside `f` on this thread goes through
    /// the sink. The `daylog::info!` family of macros wraps this.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        self.shared.in_scope(f)
    }

    pub(crate) fn dispatch_event(&self, event: &Event<'_>) {
        self.shared.dispatch_event(event);
    }

    /// Output mode chosen at construction.
    pub fn mode(&self) -> Mode {
        self.shared.mode
    }

    /// Stream this logger was built for.
    pub fn category(&self) -> Category {
        self.shared.category
    }

    /// Directory holding the dated files.
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// Day the active sink was opened.
    pub fn last_rotation(&self) -> NaiveDate {
        self.shared.last_rotation()
    }

    /// File the active sink appends to; `None` in development.
    pub fn current_file(&self) -> Option<PathBuf> {
        self.shared.current_file()
    }

    /// Rotate to `today`'s file if the active one is from another day.
    ///
    /// Returns whether a rotation happened. Development loggers never
    /// rotate. Must not be called from inside [`Logger::in_scope`].
    pub fn rotate_if_needed(&self, today: NaiveDate) -> Result<bool> {
        self.shared.rotate_if_needed(today)
    }

    /// [`Logger::rotate_if_needed`] against the local calendar date.
    pub fn check_rotation(&self) -> Result<bool> {
        self.rotate_if_needed(Local::now().date_naive())
    }

    /// Whether a rotation watcher is running for this logger.
    pub fn is_rotating(&self) -> bool {
        self.watcher.lock().is_some()
    }

    /// Stop the rotation watcher and wait for it to exit.
    pub fn stop_rotation(&self) {
        let watcher = self.watcher.lock().take();
        if let Some(watcher) = watcher {
            watcher.stop();
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("mode", &self.mode())
            .field("category", &self.category())
            .field("path", &self.path())
            .field("last_rotation", &self.last_rotation())
            .field("current_file", &self.current_file())
            .field("rotating", &self.is_rotating())
            .finish()
    }
}

/// Builder for [`Logger`].
///
/// Defaults: development mode, service category, the category's default
/// directory, the standard console, today's date, hourly rotation checks.
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    mode: Mode,
    category: Category,
    path: Option<PathBuf>,
    console: ConsoleWriter,
    start_date: Option<NaiveDate>,
    check_interval: Duration,
    rotation_watcher: bool,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            category: Category::default(),
            path: None,
            console: ConsoleWriter::standard(),
            start_date: None,
            check_interval: DEFAULT_CHECK_INTERVAL,
            rotation_watcher: true,
        }
    }
}

impl LoggerBuilder {
    /// Output mode (default development).
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Stream tag, which also picks the default directory.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Log directory. An empty path means the category default.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Console destination (default stdout/stderr by mode).
    pub fn console(mut self, console: ConsoleWriter) -> Self {
        self.console = console;
        self
    }

    /// Day the first file is opened for, instead of today.
    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// How often the rotation watcher checks the date.
    pub fn check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    /// Whether production loggers start a rotation watcher (default `true`).
    ///
    /// Without one, rotation only happens through
    /// [`Logger::rotate_if_needed`] or [`Logger::check_rotation`].
    pub fn rotation_watcher(mut self, enabled: bool) -> Self {
        self.rotation_watcher = enabled;
        self
    }

    /// Open the initial sink and, for production, start the watcher.
    pub fn build(self) -> Result<Logger> {
        let path = resolve_path(self.path.as_deref(), self.category);
        let today = self.today();
        let sink = sink::select_sink(self.mode, &path, today, &self.console)?;
        let start_watcher = self.mode == Mode::Production && self.rotation_watcher;
        let check_interval = self.check_interval;
        let shared = self.into_shared(sink, path, today);

        let watcher = if start_watcher {
            Some(RotationWatcher::spawn(Arc::clone(&shared), check_interval)?)
        } else {
            None
        };

        Ok(Logger {
            shared,
            watcher: Mutex::new(watcher),
        })
    }

    /// Build in development mode whatever mode was set. Opens nothing, so it
    /// cannot fail.
    pub fn build_development(mut self) -> Logger {
        self.mode = Mode::Development;
        let path = resolve_path(self.path.as_deref(), self.category);
        let today = self.today();
        let sink = sink::development_sink(&self.console);

        Logger {
            shared: self.into_shared(sink, path, today),
            watcher: Mutex::new(None),
        }
    }

    fn today(&self) -> NaiveDate {
        self.start_date.unwrap_or_else(|| Local::now().date_naive())
    }

    fn into_shared(self, sink: Sink, path: PathBuf, today: NaiveDate) -> Arc<Shared> {
        Arc::new(Shared {
            state: RwLock::new(State {
                sink,
                last_rotation: today,
            }),
            mode: self.mode,
            category: self.category,
            path,
            console: self.console,
        })
    }
}
