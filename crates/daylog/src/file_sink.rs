//! Dated, append-only log files.

use chrono::NaiveDate;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::writer::MakeWriter;

use crate::error::{LoggerError, Result};

/// Path of the log file for `date` inside `dir`: `<dir>/<YYYY-MM-DD>.txt`.
pub fn log_file_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.txt", date.format("%Y-%m-%d")))
}

/// Open (creating if needed) the log file for `date` inside `dir`.
///
/// Missing directories are created. The file is opened for appending, so
/// opening the same day twice keeps what is already there.
///
/// # Arguments
/// * `dir` - Directory holding the daily files
/// * `date` - Calendar day naming the file
pub fn open_log_file(dir: &Path, date: NaiveDate) -> Result<File> {
    fs::create_dir_all(dir).map_err(|source| LoggerError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = log_file_path(dir, date);
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    options
        .open(&path)
        .map_err(|source| LoggerError::OpenFile { path, source })
}

/// Shared handle to one day's log file that can be closed from outside.
///
/// Every clone writes to the same file. After [`DailyFile::close`] the
/// descriptor is released and further writes are discarded, no matter how
/// many clones (held by dispatchers or lingering spans) are still alive.
#[derive(Debug, Clone)]
pub struct DailyFile {
    inner: Arc<Mutex<Option<File>>>,
    path: PathBuf,
}

impl DailyFile {
    /// Open the file for `date` inside `dir`, see [`open_log_file`].
    pub fn open(dir: &Path, date: NaiveDate) -> Result<Self> {
        let file = open_log_file(dir, date)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Some(file))),
            path: log_file_path(dir, date),
        })
    }

    /// Path the handle was opened at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the descriptor is still held.
    pub fn is_open(&self) -> bool {
        self.inner.lock().is_some()
    }

    /// Sync and release the descriptor. Closing twice is a no-op.
    pub fn close(&self) -> io::Result<()> {
        let file = self.inner.lock().take();
        match file {
            Some(file) => file.sync_all(),
            None => Ok(()),
        }
    }
}

impl Write for &DailyFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.inner.lock().as_mut() {
            Some(file) => file.write(buf),
            // closed by rotation
            None => Ok(buf.len()),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self.inner.lock().as_mut() {
            Some(file) => file.write_all(buf),
            None => Ok(()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.inner.lock().as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for DailyFile {
    type Writer = &'a DailyFile;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}
