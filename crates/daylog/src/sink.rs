//! Sink selection.
//!
//! A sink is a fully built `tracing` dispatcher plus, in production, the
//! dated file it writes to. Production sinks write flattened JSON to the
//! console and the file; development sinks write colorized text to stderr.

use chrono::NaiveDate;
use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriter, MakeWriterExt};

use crate::config::Mode;
use crate::error::Result;
use crate::file_sink::DailyFile;

/// Lowest severity every sink records.
pub const MIN_LEVEL: LevelFilter = LevelFilter::DEBUG;

/// Human-readable clock used by development sinks, e.g. `3:04:05PM`.
pub const DEV_TIME_FORMAT: &str = "%-I:%M:%S%p";

type MakeConsole = dyn Fn() -> BoxMakeWriter + Send + Sync;

/// Console destination for sinks.
///
/// The standard console is stdout in production and stderr in development.
/// A custom writer replaces both, which is how tests capture output.
#[derive(Clone, Default)]
pub struct ConsoleWriter {
    custom: Option<Arc<MakeConsole>>,
}

impl ConsoleWriter {
    /// stdout in production, stderr in development.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Send console output of every mode to `make_writer`.
    pub fn custom<M>(make_writer: M) -> Self
    where
        M: for<'a> MakeWriter<'a> + Clone + Send + Sync + 'static,
    {
        Self {
            custom: Some(Arc::new(move || BoxMakeWriter::new(make_writer.clone()))),
        }
    }

    fn make_writer(&self, mode: Mode) -> BoxMakeWriter {
        match (&self.custom, mode) {
            (Some(make), _) => make(),
            (None, Mode::Production) => BoxMakeWriter::new(io::stdout),
            (None, Mode::Development) => BoxMakeWriter::new(io::stderr),
        }
    }
}

impl fmt::Debug for ConsoleWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.custom.is_some() { "custom" } else { "standard" };
        f.debug_tuple("ConsoleWriter").field(&kind).finish()
    }
}

/// The active destination and formatter of a logger.
pub struct Sink {
    dispatch: Dispatch,
    file: Option<DailyFile>,
}

impl Sink {
    /// Dispatcher that formats and writes this sink's records.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// File this sink appends to, if any.
    pub fn file_path(&self) -> Option<&Path> {
        self.file.as_ref().map(DailyFile::path)
    }

    /// Tear the sink down and close its file.
    ///
    /// The file is closed even while spans created under this sink still
    /// hold clones of its dispatcher; their late writes are discarded.
    pub(crate) fn close(self) -> io::Result<()> {
        let Sink { dispatch, file } = self;
        drop(dispatch);

        match file {
            Some(file) => file.close(),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("file_path", &self.file_path())
            .finish_non_exhaustive()
    }
}

/// Build the sink for `mode`.
///
/// # Arguments
/// * `mode` - Output mode
/// * `dir` - Directory for dated files (ignored in development)
/// * `date` - Day naming the production file
/// * `console` - Console destination
pub fn select_sink(
    mode: Mode,
    dir: &Path,
    date: NaiveDate,
    console: &ConsoleWriter,
) -> Result<Sink> {
    match mode {
        Mode::Production => production_sink(dir, date, console),
        Mode::Development => Ok(development_sink(console)),
    }
}

/// JSON records to the console and to `<dir>/<date>.txt`.
pub fn production_sink(dir: &Path, date: NaiveDate, console: &ConsoleWriter) -> Result<Sink> {
    let file = DailyFile::open(dir, date)?;
    let writer = console.make_writer(Mode::Production).and(file.clone());

    let subscriber = tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_timer(ChronoLocal::rfc_3339())
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_max_level(MIN_LEVEL)
        .with_writer(writer)
        .finish();

    Ok(Sink {
        dispatch: Dispatch::new(subscriber),
        file: Some(file),
    })
}

/// Colorized text records to the console only.
pub fn development_sink(console: &ConsoleWriter) -> Sink {
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(true)
        .with_timer(ChronoLocal::new(DEV_TIME_FORMAT.to_string()))
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_max_level(MIN_LEVEL)
        .with_writer(console.make_writer(Mode::Development))
        .finish();

    Sink {
        dispatch: Dispatch::new(subscriber),
        file: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Captured;
    use std::fs;
    use tracing::dispatcher;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_production_writes_json_to_console_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let captured = Captured::default();
        let sink = select_sink(Mode::Production, tmp.path(), today(), &captured.console())
            .unwrap();

        dispatcher::with_default(sink.dispatch(), || {
            tracing::info!(k = "v", "hello");
            tracing::debug!("verbose");
            tracing::trace!("dropped");
        });
        let path = sink.file_path().unwrap().to_path_buf();
        sink.close().unwrap();

        assert_eq!(path, tmp.path().join("2024-05-01.txt"));
        let file = fs::read_to_string(&path).unwrap();
        assert_eq!(file, captured.contents());

        let lines: Vec<serde_json::Value> = file
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["level"], "INFO");
        assert_eq!(lines[0]["message"], "hello");
        assert_eq!(lines[0]["k"], "v");
        assert!(lines[0]["filename"].as_str().unwrap().ends_with("sink.rs"));
        assert!(lines[0]["line_number"].is_u64());
        assert!(lines[0]["timestamp"].is_string());
        assert_eq!(lines[1]["level"], "DEBUG");
    }

    #[test]
    fn test_development_writes_text_to_console_only() {
        let tmp = tempfile::tempdir().unwrap();
        let captured = Captured::default();
        let sink = select_sink(Mode::Development, tmp.path(), today(), &captured.console())
            .unwrap();

        dispatcher::with_default(sink.dispatch(), || tracing::warn!(attempt = 3, "retrying"));

        assert!(sink.file_path().is_none());
        let out = captured.contents();
        assert!(out.contains("retrying"));
        assert!(out.contains("attempt"));
        assert!(out.contains("sink.rs"));
        assert!(out.contains('\u{1b}'), "expected ANSI colors in {out:?}");
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_close_releases_file() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = production_sink(tmp.path(), today(), &Captured::default().console()).unwrap();
        let file = sink.file.clone().unwrap();
        assert!(file.is_open());

        sink.close().unwrap();
        assert!(!file.is_open());
    }

    #[test]
    fn test_close_with_live_span_still_closes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = production_sink(tmp.path(), today(), &Captured::default().console()).unwrap();
        let file = sink.file.clone().unwrap();

        // the span keeps its own clone of the dispatcher
        let span = dispatcher::with_default(sink.dispatch(), || {
            tracing::info_span!("long_lived")
        });
        sink.close().unwrap();
        assert!(!file.is_open());

        drop(span);
        assert!(!file.is_open());
    }
}
